use iced::widget::operation::scroll_to;
use iced::widget::scrollable::AbsoluteOffset;
use iced::Task;

use crate::cards::{carousel_content_width, SECTION_PADDING};
use crate::carousel::{Frame, ScrollDirection, ScrollMetrics, FRAME_INTERVAL};
use crate::detail_handlers;
use crate::error::FetchError;
use crate::images;
use crate::listing::{GenreChoice, ListingState, Phase, RequestTag, SectionKind, TimeWindow};
use crate::media::{Genre, Message, TitleSummary};
use crate::tmdb::{image_url, load_genres, load_section, ImageSize, TmdbClient};
use crate::Marquee;

pub fn handle_message(app: &mut Marquee, message: Message) -> Task<Message> {
    match message {
        Message::Setup(_) => Task::none(),
        Message::WindowResized(width) => handle_window_resized(app, width),
        Message::ListingLoaded(kind, tag, result) => handle_listing_loaded(app, kind, tag, result),
        Message::GenresLoaded(kind, result) => handle_genres_loaded(app, kind, result),
        Message::RetrySection(kind) => handle_retry_section(app, kind),
        Message::NextPage(kind) => handle_change_page(app, kind, true),
        Message::PreviousPage(kind) => handle_change_page(app, kind, false),
        Message::SelectGenre(kind, choice) => handle_select_genre(app, kind, choice),
        Message::SetTimeWindow(kind, window) => handle_set_time_window(app, kind, window),
        Message::ScrollSection(kind, direction) => handle_scroll_section(app, kind, direction),
        Message::AnimateScroll(kind) => handle_animate_scroll(app, kind),
        Message::SectionScrolled(kind, metrics) => handle_section_scrolled(app, kind, metrics),
        Message::SelectTitle(kind, id) => detail_handlers::handle_select_title(app, kind, id),
        Message::CloseDetail => detail_handlers::handle_close_detail(app),
        Message::DetailLoaded(ticket, result) => {
            detail_handlers::handle_detail_loaded(app, ticket, result)
        }
        Message::VideosLoaded(ticket, result) => {
            detail_handlers::handle_videos_loaded(app, ticket, result)
        }
        Message::OpenTrailer(url) => detail_handlers::handle_open_trailer(url),
        Message::LoadImage(url) => images::load_image(&mut app.image_cache, url),
        Message::ImageLoaded(url, result) => {
            images::image_loaded(&mut app.image_cache, url, result);
            Task::none()
        }
    }
}

pub fn fetch_listing(client: &TmdbClient, kind: SectionKind, tag: RequestTag) -> Task<Message> {
    let client = client.clone();
    Task::perform(load_section(client, kind, tag.window), move |result| {
        Message::ListingLoaded(kind, tag, result)
    })
}

pub fn fetch_genres(client: &TmdbClient, kind: SectionKind) -> Task<Message> {
    let client = client.clone();
    Task::perform(load_genres(client), move |result| {
        Message::GenresLoaded(kind, result)
    })
}

/// Creates a fresh state for every enabled section and dispatches its list
/// fetch, plus its own genre fetch where the section uses genres.
pub fn mount_sections(app: &mut Marquee) -> Task<Message> {
    let Some(client) = app.tmdb_client.clone() else {
        return Task::none();
    };

    let viewport = carousel_viewport(app.window_width);
    let mut tasks = Vec::new();
    app.listings = app
        .enabled_sections
        .iter()
        .map(|&kind| {
            let mut state = ListingState::new(kind, viewport);
            let tag = state.begin_fetch();
            tasks.push(fetch_listing(&client, kind, tag));
            if kind.needs_genres() {
                tasks.push(fetch_genres(&client, kind));
            }
            tracing::info!(section = %kind, "section mounted");
            state
        })
        .collect();

    Task::batch(tasks)
}

fn carousel_viewport(window_width: f32) -> f32 {
    (window_width - 2.0 * SECTION_PADDING).max(0.0)
}

fn poster_urls<'a>(items: impl IntoIterator<Item = &'a TitleSummary>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|item| {
            item.poster_path
                .as_deref()
                .map(|path| image_url(Some(path), ImageSize::Poster))
        })
        .collect()
}

fn handle_window_resized(app: &mut Marquee, width: f32) -> Task<Message> {
    app.window_width = width;
    let viewport = carousel_viewport(width);
    for listing in &mut app.listings {
        listing.carousel.set_viewport_width(viewport);
    }
    Task::none()
}

fn handle_listing_loaded(
    app: &mut Marquee,
    kind: SectionKind,
    tag: RequestTag,
    result: Result<Vec<TitleSummary>, FetchError>,
) -> Task<Message> {
    let Some(listing) = app.listing_mut(kind) else {
        tracing::debug!(section = %kind, "result for unmounted section dropped");
        return Task::none();
    };
    if !listing.apply_result(tag, result) || listing.phase() != &Phase::Ready {
        return Task::none();
    }

    let urls = poster_urls(listing.visible_window());
    fit_carousel_to_visible(listing);
    app.image_cache.request(urls)
}

fn handle_genres_loaded(
    app: &mut Marquee,
    kind: SectionKind,
    result: Result<Vec<Genre>, FetchError>,
) -> Task<Message> {
    if let Some(listing) = app.listing_mut(kind) {
        listing.apply_genres(result);
    }
    Task::none()
}

fn handle_retry_section(app: &mut Marquee, kind: SectionKind) -> Task<Message> {
    let Some(client) = app.tmdb_client.clone() else {
        return Task::none();
    };
    let Some(listing) = app.listing_mut(kind) else {
        return Task::none();
    };
    let tag = listing.retry();
    tracing::info!(section = %kind, "retrying section");
    fetch_listing(&client, kind, tag)
}

fn handle_change_page(app: &mut Marquee, kind: SectionKind, forward: bool) -> Task<Message> {
    let Some(listing) = app.listing_mut(kind) else {
        return Task::none();
    };
    let moved = if forward {
        listing.next_page()
    } else {
        listing.prev_page()
    };
    if !moved {
        return Task::none();
    }
    let urls = poster_urls(listing.visible_window());
    app.image_cache.request(urls)
}

/// The row width tracks the filtered cards, not the full result set.
fn fit_carousel_to_visible(listing: &mut ListingState) {
    let width = carousel_content_width(listing.visible_items().len());
    listing.carousel.set_content_width(width);
}

fn handle_select_genre(app: &mut Marquee, kind: SectionKind, choice: GenreChoice) -> Task<Message> {
    let Some(listing) = app.listing_mut(kind) else {
        return Task::none();
    };
    listing.select_genre(choice);
    listing.carousel.reset();
    fit_carousel_to_visible(listing);
    scroll_to(
        iced::widget::Id::new(kind.scroll_id()),
        AbsoluteOffset { x: 0.0, y: 0.0 },
    )
}

fn handle_set_time_window(
    app: &mut Marquee,
    kind: SectionKind,
    window: TimeWindow,
) -> Task<Message> {
    let Some(client) = app.tmdb_client.clone() else {
        return Task::none();
    };
    let Some(listing) = app.listing_mut(kind) else {
        return Task::none();
    };
    match listing.set_time_window(window) {
        Some(tag) => {
            tracing::debug!(section = %kind, window = window.path(), "time window changed");
            fetch_listing(&client, kind, tag)
        }
        None => Task::none(),
    }
}

fn handle_scroll_section(
    app: &mut Marquee,
    kind: SectionKind,
    direction: ScrollDirection,
) -> Task<Message> {
    let Some(listing) = app.listing_mut(kind) else {
        return Task::none();
    };
    let already_animating = listing.carousel.is_animating();
    listing.carousel.scroll(direction);
    if already_animating {
        return Task::none();
    }
    Task::done(Message::AnimateScroll(kind))
}

fn handle_animate_scroll(app: &mut Marquee, kind: SectionKind) -> Task<Message> {
    let Some(listing) = app.listing_mut(kind) else {
        return Task::none();
    };

    let frame = listing.carousel.tick();
    let id = iced::widget::Id::new(kind.scroll_id());
    let offset = AbsoluteOffset {
        x: frame.offset(),
        y: 0.0,
    };

    match frame {
        Frame::Settled(_) => scroll_to(id, offset),
        Frame::Moving(_) => Task::batch([
            scroll_to(id, offset),
            Task::perform(tokio::time::sleep(FRAME_INTERVAL), move |_| {
                Message::AnimateScroll(kind)
            }),
        ]),
    }
}

fn handle_section_scrolled(
    app: &mut Marquee,
    kind: SectionKind,
    metrics: ScrollMetrics,
) -> Task<Message> {
    if let Some(listing) = app.listing_mut(kind) {
        listing.carousel.observe(metrics);
    }
    Task::none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;

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

    fn app_with_top_rated(items: Vec<TitleSummary>) -> Marquee {
        let mut app = Marquee::default();
        let mut listing =
            ListingState::new(SectionKind::TopRatedMovies, carousel_viewport(app.window_width));
        let tag = listing.begin_fetch();
        app.listings.push(listing);
        let _ = handle_listing_loaded(&mut app, SectionKind::TopRatedMovies, tag, Ok(items));
        app
    }

    #[test]
    fn test_genre_filter_shrinks_carousel_to_visible_cards() {
        // Arrange
        let items = (1..=20)
            .map(|id| title(id, if id <= 2 { vec![28] } else { vec![18] }))
            .collect();
        let mut app = app_with_top_rated(items);
        assert!(app.listing(SectionKind::TopRatedMovies).unwrap().carousel.can_scroll_right());

        // Act
        let _ = handle_select_genre(
            &mut app,
            SectionKind::TopRatedMovies,
            GenreChoice::Genre(28, String::from("Action")),
        );

        // Assert
        let listing = app.listing_mut(SectionKind::TopRatedMovies).unwrap();
        assert_eq!(listing.visible_items().len(), 2);
        assert!(!listing.carousel.can_scroll_right());
        assert!(!listing.carousel.can_scroll_left());
        assert_eq!(listing.carousel.scroll(ScrollDirection::Right), 0.0);
    }

    #[test]
    fn test_clearing_genre_filter_restores_full_width() {
        // Arrange
        let items = (1..=20).map(|id| title(id, vec![18])).collect();
        let mut app = app_with_top_rated(items);
        let _ = handle_select_genre(
            &mut app,
            SectionKind::TopRatedMovies,
            GenreChoice::Genre(28, String::from("Action")),
        );

        // Act
        let _ = handle_select_genre(&mut app, SectionKind::TopRatedMovies, GenreChoice::All);

        // Assert
        let listing = app.listing(SectionKind::TopRatedMovies).unwrap();
        assert!(listing.carousel.can_scroll_right());
        assert!(!listing.carousel.can_scroll_left());
    }
}
