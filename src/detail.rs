use std::borrow::Cow;

use crate::error::FetchError;
use crate::listing::SectionKind;
use crate::media::{MediaId, TitleDetail, TitleSummary, Video};
use crate::tmdb::{image_url, ImageSize};

const TRAILER_TYPE: &str = "Trailer";
const TRAILER_SITE: &str = "YouTube";

/// Identity of one modal opening. Enrichment results carry it back so a
/// late answer for an earlier title is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailTicket {
    pub media_id: MediaId,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrailerState {
    Pending,
    Found(String),
    Missing,
}

/// The top of the modal: a trailer when one was found, the backdrop
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderPanel {
    Trailer {
        watch_url: String,
        thumbnail_url: String,
    },
    Backdrop(String),
}

pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|v| v.video_type == TRAILER_TYPE && v.site == TRAILER_SITE)
}

pub fn youtube_watch_url(key: &str) -> String {
    format!("https://www.youtube.com/watch?v={key}")
}

pub fn youtube_thumbnail_url(key: &str) -> String {
    format!("https://img.youtube.com/vi/{key}/hqdefault.jpg")
}

#[derive(Debug, Clone)]
pub struct DetailState {
    source: SectionKind,
    summary: TitleSummary,
    ticket: DetailTicket,
    detail: Option<TitleDetail>,
    trailer: TrailerState,
}

impl DetailState {
    pub fn trailer(&self) -> &TrailerState {
        &self.trailer
    }

    pub fn is_enriched(&self) -> bool {
        self.detail.is_some()
    }

    /// Full record once fetched, the summary's own fields until then.
    pub fn record(&self) -> Cow<'_, TitleDetail> {
        match &self.detail {
            Some(detail) => Cow::Borrowed(detail),
            None => Cow::Owned(TitleDetail::from_summary(&self.summary)),
        }
    }

    pub fn header(&self) -> HeaderPanel {
        if let TrailerState::Found(key) = &self.trailer {
            return HeaderPanel::Trailer {
                watch_url: youtube_watch_url(key),
                thumbnail_url: youtube_thumbnail_url(key),
            };
        }
        let backdrop = self
            .detail
            .as_ref()
            .and_then(|d| d.backdrop_path.as_deref())
            .or(self.summary.backdrop_path.as_deref());
        HeaderPanel::Backdrop(image_url(backdrop, ImageSize::Backdrop))
    }
}

/// Owns at most one open modal. Every open and close bumps the generation.
#[derive(Debug, Clone, Default)]
pub struct DetailSession {
    generation: u64,
    open: Option<DetailState>,
}

impl DetailSession {
    pub fn current(&self) -> Option<&DetailState> {
        self.open.as_ref()
    }

    /// Opens the modal for `summary`, discarding whatever an earlier opening
    /// fetched.
    pub fn open(&mut self, source: SectionKind, summary: TitleSummary) -> DetailTicket {
        self.generation += 1;
        let ticket = DetailTicket {
            media_id: summary.id,
            generation: self.generation,
        };
        self.open = Some(DetailState {
            source,
            summary,
            ticket,
            detail: None,
            trailer: TrailerState::Pending,
        });
        ticket
    }

    pub fn close(&mut self) -> Option<SectionKind> {
        self.generation += 1;
        self.open.take().map(|state| state.source)
    }

    fn matching(&mut self, ticket: DetailTicket) -> Option<&mut DetailState> {
        match self.open.as_mut() {
            Some(state) if state.ticket == ticket => Some(state),
            _ => {
                tracing::debug!(media_id = ticket.media_id, "dropping stale detail result");
                None
            }
        }
    }

    /// A failed call keeps the modal open on the summary fields.
    pub fn apply_detail(
        &mut self,
        ticket: DetailTicket,
        result: Result<TitleDetail, FetchError>,
    ) -> bool {
        let Some(state) = self.matching(ticket) else {
            return false;
        };
        match result {
            Ok(detail) => state.detail = Some(detail),
            Err(e) => {
                tracing::warn!(media_id = ticket.media_id, error = %e, "detail fetch failed");
            }
        }
        true
    }

    pub fn apply_videos(
        &mut self,
        ticket: DetailTicket,
        result: Result<Vec<Video>, FetchError>,
    ) -> bool {
        let Some(state) = self.matching(ticket) else {
            return false;
        };
        state.trailer = match result {
            Ok(videos) => match select_trailer(&videos) {
                Some(video) => TrailerState::Found(video.key.clone()),
                None => TrailerState::Missing,
            },
            Err(e) => {
                tracing::warn!(media_id = ticket.media_id, error = %e, "video fetch failed");
                TrailerState::Missing
            }
        };
        true
    }
}
