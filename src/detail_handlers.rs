use iced::Task;

use crate::detail::{DetailTicket, HeaderPanel};
use crate::error::FetchError;
use crate::listing::SectionKind;
use crate::media::{MediaId, Message, TitleDetail, Video};
use crate::tmdb::{image_url, ImageSize};
use crate::Marquee;

pub fn handle_select_title(app: &mut Marquee, kind: SectionKind, media_id: MediaId) -> Task<Message> {
    let Some(client) = app.tmdb_client.clone() else {
        return Task::none();
    };
    let Some(listing) = app.listing_mut(kind) else {
        return Task::none();
    };
    let Some(summary) = listing.select(media_id).cloned() else {
        return Task::none();
    };

    let media_kind = summary.kind;
    let backdrop = image_url(summary.backdrop_path.as_deref(), ImageSize::Backdrop);
    let ticket = app.detail.open(kind, summary);
    tracing::debug!(section = %kind, media_id, "detail opened");

    let details_client = client.clone();
    let fetch_details = Task::perform(
        async move { details_client.details(media_id, media_kind).await },
        move |result| Message::DetailLoaded(ticket, result),
    );
    let fetch_videos = Task::perform(
        async move { client.videos(media_id, media_kind).await },
        move |result| Message::VideosLoaded(ticket, result),
    );

    Task::batch([
        fetch_details,
        fetch_videos,
        app.image_cache.request([backdrop]),
    ])
}

pub fn handle_close_detail(app: &mut Marquee) -> Task<Message> {
    if let Some(kind) = app.detail.close() {
        if let Some(listing) = app.listing_mut(kind) {
            listing.clear_selection();
        }
    }
    Task::none()
}

pub fn handle_detail_loaded(
    app: &mut Marquee,
    ticket: DetailTicket,
    result: Result<TitleDetail, FetchError>,
) -> Task<Message> {
    if !app.detail.apply_detail(ticket, result) {
        return Task::none();
    }
    header_image(app)
}

pub fn handle_videos_loaded(
    app: &mut Marquee,
    ticket: DetailTicket,
    result: Result<Vec<Video>, FetchError>,
) -> Task<Message> {
    if !app.detail.apply_videos(ticket, result) {
        return Task::none();
    }
    header_image(app)
}

/// The header may have switched to a trailer thumbnail or to the detail
/// record's own backdrop.
fn header_image(app: &Marquee) -> Task<Message> {
    let Some(state) = app.detail.current() else {
        return Task::none();
    };
    let url = match state.header() {
        HeaderPanel::Trailer { thumbnail_url, .. } => thumbnail_url,
        HeaderPanel::Backdrop(url) => url,
    };
    app.image_cache.request([url])
}

pub fn handle_open_trailer(watch_url: String) -> Task<Message> {
    if let Err(e) = open::that(&watch_url) {
        tracing::warn!(url = %watch_url, error = %e, "failed to open trailer in browser");
    }
    Task::none()
}
