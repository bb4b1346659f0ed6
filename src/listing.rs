//! Per-section fetch lifecycle: phase, windowing, genre filter, selection and
//! request tags that keep late completions from overwriting newer state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::carousel::Carousel;
use crate::error::FetchError;
use crate::genres::GenreDirectory;
use crate::media::{Genre, MediaId, MediaKind, TitleSummary};

pub const PAGE_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Trending,
    TopRatedMovies,
    PopularMovies,
    TopRatedSeries,
    PopularSeries,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Trending,
        SectionKind::TopRatedMovies,
        SectionKind::PopularMovies,
        SectionKind::TopRatedSeries,
        SectionKind::PopularSeries,
    ];

    pub fn default_enabled() -> Vec<SectionKind> {
        vec![
            SectionKind::Trending,
            SectionKind::TopRatedMovies,
            SectionKind::PopularMovies,
        ]
    }

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Trending => "Trending Movies",
            SectionKind::TopRatedMovies => "Top Rated Movies",
            SectionKind::PopularMovies => "Popular Movies",
            SectionKind::TopRatedSeries => "Top Rated Series",
            SectionKind::PopularSeries => "Popular Series",
        }
    }

    pub fn subtitle(self) -> Option<&'static str> {
        match self {
            SectionKind::PopularMovies => Some("Discover the most popular movies right now."),
            _ => None,
        }
    }

    pub fn media_kind(self) -> MediaKind {
        match self {
            SectionKind::TopRatedSeries | SectionKind::PopularSeries => MediaKind::Series,
            _ => MediaKind::Movie,
        }
    }

    pub fn windowing(self) -> Windowing {
        match self {
            SectionKind::PopularMovies => Windowing::Paged {
                page_size: PAGE_SIZE,
            },
            _ => Windowing::Carousel,
        }
    }

    pub fn has_genre_filter(self) -> bool {
        self == SectionKind::TopRatedMovies
    }

    pub fn shows_genre_labels(self) -> bool {
        matches!(self, SectionKind::Trending | SectionKind::TopRatedMovies)
    }

    pub fn has_time_window(self) -> bool {
        self == SectionKind::Trending
    }

    /// Sections that label or filter by genre fetch their own directory.
    pub fn needs_genres(self) -> bool {
        self.has_genre_filter() || self.shows_genre_labels()
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            SectionKind::Trending => "Failed to fetch trending movies.",
            SectionKind::TopRatedMovies => "Failed to fetch top-rated movies.",
            SectionKind::PopularMovies => "Failed to fetch popular movies.",
            SectionKind::TopRatedSeries => "Failed to fetch top-rated series.",
            SectionKind::PopularSeries => "Failed to fetch popular series.",
        }
    }

    pub fn empty_message(self) -> &'static str {
        match self.media_kind() {
            MediaKind::Movie => "No movies available to display.",
            MediaKind::Series => "No series available to display.",
        }
    }

    pub fn scroll_id(self) -> &'static str {
        match self {
            SectionKind::Trending => "scroll-trending",
            SectionKind::TopRatedMovies => "scroll-top-rated-movies",
            SectionKind::PopularMovies => "scroll-popular-movies",
            SectionKind::TopRatedSeries => "scroll-top-rated-series",
            SectionKind::PopularSeries => "scroll-popular-series",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
}

impl TimeWindow {
    pub fn path(self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeWindow::Day => "Today",
            TimeWindow::Week => "This Week",
        })
    }
}

/// Genre picker entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenreChoice {
    All,
    Genre(u64, String),
}

impl GenreChoice {
    pub fn id(&self) -> Option<u64> {
        match self {
            GenreChoice::All => None,
            GenreChoice::Genre(id, _) => Some(*id),
        }
    }
}

impl From<&Genre> for GenreChoice {
    fn from(genre: &Genre) -> Self {
        GenreChoice::Genre(genre.id, genre.name.clone())
    }
}

impl fmt::Display for GenreChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenreChoice::All => f.write_str("All Genres"),
            GenreChoice::Genre(_, name) => f.write_str(name),
        }
    }
}

/// Identity of one dispatched list fetch. Only the completion carrying the
/// current tag is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTag {
    pub generation: u64,
    pub window: Option<TimeWindow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Windowing {
    Paged { page_size: usize },
    Carousel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Failed(String),
    Ready,
}

/// What the section renders, derived from state in one place.
#[derive(Debug, PartialEq)]
pub enum ListingContent<'a> {
    Loading,
    Failed(&'a str),
    Empty,
    Ready(Vec<&'a TitleSummary>),
}

#[derive(Debug, Clone)]
pub struct ListingState {
    kind: SectionKind,
    phase: Phase,
    items: Vec<TitleSummary>,
    page: usize,
    selected_genre: Option<u64>,
    selected: Option<MediaId>,
    genres: GenreDirectory,
    time_window: TimeWindow,
    generation: u64,
    pub carousel: Carousel,
}

impl ListingState {
    pub fn new(kind: SectionKind, viewport_width: f32) -> Self {
        Self {
            kind,
            phase: Phase::Loading,
            items: Vec::new(),
            page: 1,
            selected_genre: None,
            selected: None,
            genres: GenreDirectory::default(),
            time_window: TimeWindow::default(),
            generation: 0,
            carousel: Carousel::new(viewport_width),
        }
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn items(&self) -> &[TitleSummary] {
        &self.items
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn time_window(&self) -> TimeWindow {
        self.time_window
    }

    pub fn genres(&self) -> &GenreDirectory {
        &self.genres
    }

    pub fn current_tag(&self) -> RequestTag {
        RequestTag {
            generation: self.generation,
            window: self.kind.has_time_window().then_some(self.time_window),
        }
    }

    /// Enters `Loading` and issues the tag the dispatched fetch must carry.
    /// Previously fetched items are discarded.
    pub fn begin_fetch(&mut self) -> RequestTag {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.items.clear();
        self.page = 1;
        self.carousel.reset();
        self.current_tag()
    }

    /// Applies a completed list fetch. Returns false when the completion is
    /// stale and was dropped.
    pub fn apply_result(
        &mut self,
        tag: RequestTag,
        result: Result<Vec<TitleSummary>, FetchError>,
    ) -> bool {
        if tag != self.current_tag() {
            tracing::debug!(
                section = %self.kind,
                stale = tag.generation,
                current = self.generation,
                "dropping stale listing result"
            );
            return false;
        }

        match result {
            Ok(items) => {
                tracing::debug!(section = %self.kind, count = items.len(), "listing loaded");
                self.items = items;
                self.phase = Phase::Ready;
            }
            Err(e) => {
                tracing::warn!(section = %self.kind, error = %e, "listing fetch failed");
                self.items.clear();
                self.phase = Phase::Failed(String::from(self.kind.failure_message()));
            }
        }
        true
    }

    /// A failed genre fetch leaves the directory empty; labels just vanish.
    pub fn apply_genres(&mut self, result: Result<Vec<Genre>, FetchError>) {
        match result {
            Ok(genres) => self.genres = GenreDirectory::new(genres),
            Err(e) => {
                tracing::warn!(section = %self.kind, error = %e, "genre fetch failed");
                self.genres = GenreDirectory::default();
            }
        }
    }

    pub fn retry(&mut self) -> RequestTag {
        self.begin_fetch()
    }

    /// Changing the window changes the remote query, so it re-fetches.
    /// Returns `None` when nothing changed or the section has no window.
    pub fn set_time_window(&mut self, window: TimeWindow) -> Option<RequestTag> {
        if !self.kind.has_time_window() || window == self.time_window {
            return None;
        }
        self.time_window = window;
        Some(self.begin_fetch())
    }

    fn page_size(&self) -> Option<usize> {
        match self.kind.windowing() {
            Windowing::Paged { page_size } => Some(page_size),
            Windowing::Carousel => None,
        }
    }

    pub fn can_next(&self) -> bool {
        self.page_size()
            .is_some_and(|size| self.page * size < self.items.len())
    }

    pub fn can_prev(&self) -> bool {
        self.page_size().is_some() && self.page > 1
    }

    pub fn shows_pager(&self) -> bool {
        self.page_size()
            .is_some_and(|size| self.items.len() > size)
    }

    pub fn next_page(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.can_prev() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// The window over the full fetched set, before any genre filter.
    pub fn visible_window(&self) -> &[TitleSummary] {
        match self.page_size() {
            Some(size) => {
                let start = ((self.page - 1) * size).min(self.items.len());
                let end = (self.page * size).min(self.items.len());
                &self.items[start..end]
            }
            None => &self.items,
        }
    }

    /// Window first, then filter: the filter narrows what is shown and
    /// leaves page bookkeeping alone.
    pub fn visible_items(&self) -> Vec<&TitleSummary> {
        let window = self.visible_window();
        match self.selected_genre {
            Some(genre_id) => window.iter().filter(|t| t.has_genre(genre_id)).collect(),
            None => window.iter().collect(),
        }
    }

    pub fn select_genre(&mut self, choice: GenreChoice) {
        if !self.kind.has_genre_filter() {
            return;
        }
        self.selected_genre = choice.id();
    }

    pub fn selected_genre(&self) -> GenreChoice {
        self.selected_genre
            .map(|id| {
                let name = self.genres.name(id).unwrap_or_default();
                GenreChoice::Genre(id, String::from(name))
            })
            .unwrap_or(GenreChoice::All)
    }

    pub fn genre_choices(&self) -> Vec<GenreChoice> {
        std::iter::once(GenreChoice::All)
            .chain(self.genres.genres().iter().map(GenreChoice::from))
            .collect()
    }

    pub fn select(&mut self, id: MediaId) -> Option<&TitleSummary> {
        let index = self.items.iter().position(|t| t.id == id)?;
        self.selected = Some(id);
        self.items.get(index)
    }

    pub fn selected(&self) -> Option<&TitleSummary> {
        let id = self.selected?;
        self.items.iter().find(|t| t.id == id)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn content(&self) -> ListingContent<'_> {
        match &self.phase {
            Phase::Loading => ListingContent::Loading,
            Phase::Failed(message) => ListingContent::Failed(message),
            Phase::Ready => {
                let visible = self.visible_items();
                if visible.is_empty() {
                    ListingContent::Empty
                } else {
                    ListingContent::Ready(visible)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(id: u64, genre_ids: Vec<u64>) -> TitleSummary {
        TitleSummary {
            id,
            kind: MediaKind::Movie,
            title: format!("Movie {id}"),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            release_date: String::new(),
            vote_average: 0.0,
            genre_ids,
        }
    }

    fn titles(count: u64) -> Vec<TitleSummary> {
        (1..=count)
            .map(|id| title(id, if id % 2 == 0 { vec![28] } else { vec![18] }))
            .collect()
    }

    fn loaded(kind: SectionKind, items: Vec<TitleSummary>) -> ListingState {
        let mut state = ListingState::new(kind, 1280.0);
        let tag = state.begin_fetch();
        assert!(state.apply_result(tag, Ok(items)));
        state
    }

    fn ids(items: &[&TitleSummary]) -> Vec<u64> {
        items.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_new_state_starts_loading_on_page_one() {
        let state = ListingState::new(SectionKind::PopularMovies, 1280.0);
        assert_eq!(state.phase(), &Phase::Loading);
        assert_eq!(state.page(), 1);
        assert_eq!(state.content(), ListingContent::Loading);
    }

    #[test]
    fn test_page_two_of_twenty_shows_items_six_to_twelve() {
        // Arrange
        let mut state = loaded(SectionKind::PopularMovies, titles(20));

        // Act
        assert!(state.next_page());

        // Assert
        let window: Vec<u64> = state.visible_window().iter().map(|t| t.id).collect();
        assert_eq!(window, (7..=12).collect::<Vec<_>>());
        assert!(state.can_prev());
        assert!(state.can_next());
    }

    #[test]
    fn test_window_matches_slice_for_every_page() {
        for len in [0_u64, 1, 5, 6, 7, 12, 13, 20] {
            // Arrange
            let mut state = loaded(SectionKind::PopularMovies, titles(len));
            let all = titles(len);

            loop {
                // Act
                let k = state.page();
                let start = ((k - 1) * PAGE_SIZE).min(all.len());
                let end = (k * PAGE_SIZE).min(all.len());

                // Assert
                assert_eq!(state.visible_window(), &all[start..end], "len={len} page={k}");
                assert_eq!(state.can_next(), k * PAGE_SIZE < all.len());
                assert_eq!(state.can_prev(), k != 1);

                if !state.next_page() {
                    break;
                }
            }
        }
    }

    #[test]
    fn test_paging_past_either_end_is_a_no_op() {
        let mut state = loaded(SectionKind::PopularMovies, titles(6));
        assert!(!state.prev_page());
        assert!(!state.next_page());
        assert_eq!(state.page(), 1);
        assert!(!state.shows_pager());
    }

    #[test]
    fn test_carousel_shows_every_item() {
        let state = loaded(SectionKind::Trending, titles(20));
        assert_eq!(state.visible_window().len(), 20);
        assert!(!state.can_next());
        assert!(!state.shows_pager());
    }

    #[test]
    fn test_genre_filter_is_subset_of_window_and_keeps_state() {
        // Arrange
        let mut state = loaded(SectionKind::TopRatedMovies, titles(20));
        state.apply_genres(Ok(vec![Genre {
            id: 28,
            name: String::from("Action"),
        }]));
        let before: Vec<TitleSummary> = state.items().to_vec();

        // Act
        state.select_genre(GenreChoice::Genre(28, String::from("Action")));

        // Assert
        let visible = state.visible_items();
        assert!(visible.iter().all(|t| t.genre_ids.contains(&28)));
        assert_eq!(visible.len(), 10);
        assert_eq!(state.items(), before.as_slice());
        assert_eq!(state.page(), 1);
        assert_eq!(
            state.selected_genre(),
            GenreChoice::Genre(28, String::from("Action"))
        );
    }

    #[test]
    fn test_genre_filter_ignored_without_picker() {
        // Arrange
        let mut state = loaded(SectionKind::PopularMovies, titles(20));
        state.next_page();

        // Act
        state.select_genre(GenreChoice::Genre(28, String::from("Action")));

        // Assert
        assert_eq!(ids(&state.visible_items()), (7..=12).collect::<Vec<_>>());
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_filter_with_no_matches_renders_empty() {
        let mut state = loaded(SectionKind::TopRatedMovies, titles(4));
        state.select_genre(GenreChoice::Genre(99, String::from("Western")));
        assert_eq!(state.content(), ListingContent::Empty);
        state.select_genre(GenreChoice::All);
        assert!(matches!(state.content(), ListingContent::Ready(items) if items.len() == 4));
    }

    #[test]
    fn test_failure_stores_static_message() {
        // Arrange
        let mut state = ListingState::new(SectionKind::Trending, 1280.0);
        let tag = state.begin_fetch();

        // Act
        state.apply_result(tag, Err(FetchError::Network(String::from("dns"))));

        // Assert
        assert_eq!(
            state.content(),
            ListingContent::Failed("Failed to fetch trending movies.")
        );
    }

    #[test]
    fn test_retry_reenters_loading_with_new_tag() {
        // Arrange
        let mut state = ListingState::new(SectionKind::PopularMovies, 1280.0);
        let first = state.begin_fetch();
        state.apply_result(first, Err(FetchError::DataShape(String::from("x"))));

        // Act
        let second = state.retry();

        // Assert
        assert_ne!(first, second);
        assert_eq!(state.phase(), &Phase::Loading);
        assert!(state.apply_result(second, Ok(titles(3))));
        assert_eq!(state.phase(), &Phase::Ready);
    }

    #[test]
    fn test_empty_success_is_empty_not_failed() {
        let state = loaded(SectionKind::TopRatedSeries, Vec::new());
        assert_eq!(state.content(), ListingContent::Empty);
        assert_eq!(state.kind().empty_message(), "No series available to display.");
    }

    #[test]
    fn test_time_window_change_discards_older_result() {
        // Arrange
        let mut state = ListingState::new(SectionKind::Trending, 1280.0);
        let week_tag = state.begin_fetch();

        // Act
        let day_tag = state
            .set_time_window(TimeWindow::Day)
            .expect("window change re-fetches");
        let day_applied = state.apply_result(day_tag, Ok(vec![title(2, vec![])]));
        let week_applied = state.apply_result(week_tag, Ok(vec![title(1, vec![])]));

        // Assert
        assert!(day_applied);
        assert!(!week_applied);
        assert_eq!(day_tag.window, Some(TimeWindow::Day));
        assert_eq!(state.items()[0].id, 2);
    }

    #[test]
    fn test_same_time_window_does_not_refetch() {
        let mut state = ListingState::new(SectionKind::Trending, 1280.0);
        state.begin_fetch();
        assert!(state.set_time_window(TimeWindow::Week).is_none());
    }

    #[test]
    fn test_time_window_ignored_for_other_sections() {
        let mut state = ListingState::new(SectionKind::PopularMovies, 1280.0);
        assert!(state.set_time_window(TimeWindow::Day).is_none());
        assert_eq!(state.current_tag().window, None);
    }

    #[test]
    fn test_selection_does_not_touch_listing_state() {
        // Arrange
        let mut state = loaded(SectionKind::PopularMovies, titles(20));
        state.next_page();

        // Act
        let picked = state.select(3).map(|t| t.id);

        // Assert
        assert_eq!(picked, Some(3));
        assert_eq!(state.selected().map(|t| t.id), Some(3));
        assert_eq!(state.page(), 2);
        assert_eq!(state.items().len(), 20);
        state.clear_selection();
        assert!(state.selected().is_none());
    }

    #[test]
    fn test_select_unknown_id_leaves_selection_empty() {
        let mut state = loaded(SectionKind::Trending, titles(2));
        assert!(state.select(404).is_none());
        assert!(state.selected().is_none());
    }

    #[test]
    fn test_failed_genres_leave_directory_empty() {
        let mut state = loaded(SectionKind::TopRatedMovies, titles(2));
        state.apply_genres(Err(FetchError::Network(String::from("down"))));
        assert!(state.genres().is_empty());
        assert_eq!(state.genre_choices(), vec![GenreChoice::All]);
        assert_eq!(state.phase(), &Phase::Ready);
    }

    #[test]
    fn test_genres_arriving_before_items_are_kept() {
        // Arrange
        let mut state = ListingState::new(SectionKind::Trending, 1280.0);
        let tag = state.begin_fetch();

        // Act
        state.apply_genres(Ok(vec![Genre {
            id: 18,
            name: String::from("Drama"),
        }]));
        state.apply_result(tag, Ok(titles(1)));

        // Assert
        assert_eq!(state.genres().joined_labels(&state.items()[0].genre_ids), "Drama");
    }

    #[test]
    fn test_section_settings_round_trip_as_snake_case() {
        let json = serde_json::to_string(&SectionKind::TopRatedSeries).unwrap();
        assert_eq!(json, "\"top_rated_series\"");
    }
}
