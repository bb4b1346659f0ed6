use iced::widget::image::Handle;
use iced::Color;
use serde::Deserialize;

use crate::carousel::{ScrollDirection, ScrollMetrics};
use crate::detail::DetailTicket;
use crate::error::FetchError;
use crate::listing::{GenreChoice, RequestTag, SectionKind, TimeWindow};
use crate::settings::SetupMessage;

pub const BACKGROUND_BLACK: Color = Color::from_rgb(0.0, 0.0, 0.0);
pub const SURFACE_DARK_GRAY: Color = Color::from_rgb(0.078, 0.078, 0.078);
pub const SKELETON_GRAY: Color = Color::from_rgb(0.216, 0.255, 0.318);
pub const ACCENT_BLUE: Color = Color::from_rgb(0.231, 0.510, 0.965);
pub const ACCENT_PURPLE: Color = Color::from_rgb(0.576, 0.200, 0.918);
pub const ERROR_RED: Color = Color::from_rgb(0.937, 0.267, 0.267);
pub const RATING_YELLOW: Color = Color::from_rgb(0.918, 0.702, 0.031);
pub const TEXT_WHITE: Color = Color::from_rgb(1.0, 1.0, 1.0);
pub const TEXT_GRAY: Color = Color::from_rgb(0.612, 0.639, 0.686);

pub type MediaId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    pub fn path(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// One entry of a list endpoint. Immutable once fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleSummary {
    pub id: MediaId,
    pub kind: MediaKind,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: String,
    pub vote_average: f32,
    pub genre_ids: Vec<u64>,
}

impl TitleSummary {
    pub fn has_genre(&self, genre_id: u64) -> bool {
        self.genre_ids.contains(&genre_id)
    }
}

/// Full record of a selected title, fetched by the detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleDetail {
    pub id: MediaId,
    pub kind: MediaKind,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: String,
    pub vote_average: f32,
    pub genres: Vec<Genre>,
    pub is_adult: bool,
}

impl TitleDetail {
    /// Detail view before enrichment arrives: the summary with no genres.
    pub fn from_summary(summary: &TitleSummary) -> Self {
        Self {
            id: summary.id,
            kind: summary.kind,
            title: summary.title.clone(),
            overview: summary.overview.clone(),
            poster_path: summary.poster_path.clone(),
            backdrop_path: summary.backdrop_path.clone(),
            release_date: summary.release_date.clone(),
            vote_average: summary.vote_average,
            genres: Vec::new(),
            is_adult: false,
        }
    }

    pub fn release_year(&self) -> Option<u32> {
        self.release_date
            .get(..4)
            .and_then(|year| year.parse::<u32>().ok())
    }

    pub fn age_badge(&self) -> &'static str {
        if self.is_adult {
            "18+"
        } else {
            "PG"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Video {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

#[derive(Debug, Clone)]
pub enum Message {
    Setup(SetupMessage),
    WindowResized(f32),
    ListingLoaded(SectionKind, RequestTag, Result<Vec<TitleSummary>, FetchError>),
    GenresLoaded(SectionKind, Result<Vec<Genre>, FetchError>),
    RetrySection(SectionKind),
    NextPage(SectionKind),
    PreviousPage(SectionKind),
    SelectGenre(SectionKind, GenreChoice),
    SetTimeWindow(SectionKind, TimeWindow),
    ScrollSection(SectionKind, ScrollDirection),
    AnimateScroll(SectionKind),
    SectionScrolled(SectionKind, ScrollMetrics),
    SelectTitle(SectionKind, MediaId),
    CloseDetail,
    DetailLoaded(DetailTicket, Result<TitleDetail, FetchError>),
    VideosLoaded(DetailTicket, Result<Vec<Video>, FetchError>),
    OpenTrailer(String),
    LoadImage(String),
    ImageLoaded(String, Result<Handle, String>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTitleResult {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub genre_ids: Option<Vec<u64>>,
}

impl TmdbTitleResult {
    pub fn into_summary(self, kind: MediaKind) -> TitleSummary {
        TitleSummary {
            id: self.id,
            kind,
            title: self.title.or(self.name).unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            release_date: self
                .release_date
                .or(self.first_air_date)
                .unwrap_or_default(),
            vote_average: self.vote_average,
            genre_ids: self.genre_ids.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTitleDetail {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub genres: Option<Vec<Genre>>,
    #[serde(default)]
    pub adult: Option<bool>,
}

impl TmdbTitleDetail {
    pub fn into_detail(self, kind: MediaKind) -> TitleDetail {
        TitleDetail {
            id: self.id,
            kind,
            title: self.title.or(self.name).unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            release_date: self
                .release_date
                .or(self.first_air_date)
                .unwrap_or_default(),
            vote_average: self.vote_average,
            genres: self.genres.unwrap_or_default(),
            is_adult: self.adult.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_result_uses_name_and_first_air_date() {
        // Arrange
        let json = r#"{"id": 1396, "name": "Breaking Bad", "first_air_date": "2008-01-20", "vote_average": 8.9}"#;

        // Act
        let result: TmdbTitleResult = serde_json::from_str(json).unwrap();
        let summary = result.into_summary(MediaKind::Series);

        // Assert
        assert_eq!(summary.title, "Breaking Bad");
        assert_eq!(summary.release_date, "2008-01-20");
        assert!(summary.genre_ids.is_empty());
        assert_eq!(summary.kind, MediaKind::Series);
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        // Arrange
        let json = r#"{"id": 7, "title": "X", "poster_path": null, "backdrop_path": null, "overview": null, "release_date": null, "genre_ids": null}"#;

        // Act
        let summary = serde_json::from_str::<TmdbTitleResult>(json)
            .unwrap()
            .into_summary(MediaKind::Movie);

        // Assert
        assert_eq!(summary.poster_path, None);
        assert_eq!(summary.overview, "");
        assert_eq!(summary.release_date, "");
        assert!(summary.genre_ids.is_empty());
    }

    #[test]
    fn test_detail_release_year_and_badge() {
        // Arrange
        let json = r#"{"id": 550, "title": "Fight Club", "release_date": "1999-10-15", "adult": false, "genres": [{"id": 18, "name": "Drama"}]}"#;

        // Act
        let detail = serde_json::from_str::<TmdbTitleDetail>(json)
            .unwrap()
            .into_detail(MediaKind::Movie);

        // Assert
        assert_eq!(detail.release_year(), Some(1999));
        assert_eq!(detail.age_badge(), "PG");
        assert_eq!(detail.genres.len(), 1);
    }

    #[test]
    fn test_empty_release_date_has_no_year() {
        let summary = TitleSummary {
            id: 1,
            kind: MediaKind::Movie,
            title: String::from("X"),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            release_date: String::new(),
            vote_average: 0.0,
            genre_ids: vec![28],
        };
        assert_eq!(TitleDetail::from_summary(&summary).release_year(), None);
        assert!(summary.has_genre(28));
        assert!(!summary.has_genre(12));
    }
}
