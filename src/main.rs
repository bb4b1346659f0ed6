mod boundary;
mod cards;
mod carousel;
mod components;
mod detail;
mod detail_handlers;
mod detail_popup;
mod error;
mod genres;
mod handlers;
mod images;
mod listing;
mod media;
mod settings;
mod tmdb;

use iced::widget::container;
use iced::{Element, Font, Length, Size, Subscription, Task, Theme};
use tracing_subscriber::EnvFilter;

use boundary::ErrorBoundary;
use detail::DetailSession;
use images::ImageCache;
use listing::{ListingState, SectionKind};
use media::{Message, BACKGROUND_BLACK};
use settings::{AppSettings, SetupPage};
use tmdb::TmdbClient;

const WINDOW_WIDTH: f32 = 1280.0;
const WINDOW_HEIGHT: f32 = 720.0;

pub struct Marquee {
    pub setup_page: Option<SetupPage>,
    pub tmdb_client: Option<TmdbClient>,
    pub enabled_sections: Vec<SectionKind>,
    pub listings: Vec<ListingState>,
    pub detail: DetailSession,
    pub image_cache: ImageCache,
    pub window_width: f32,
    pub boundary: ErrorBoundary,
}

impl Default for Marquee {
    fn default() -> Self {
        Self {
            setup_page: None,
            tmdb_client: None,
            enabled_sections: SectionKind::default_enabled(),
            listings: Vec::new(),
            detail: DetailSession::default(),
            image_cache: ImageCache::new(),
            window_width: WINDOW_WIDTH,
            boundary: ErrorBoundary::new(),
        }
    }
}

impl Marquee {
    fn new() -> (Self, Task<Message>) {
        let settings = AppSettings::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read settings, using defaults");
            AppSettings::default()
        });

        let mut app = Self::default();
        let task = app.initialize_with_settings(settings);
        (app, task)
    }

    /// Builds the client and mounts the enabled sections, or parks the app
    /// on the setup screen when the client cannot be built.
    fn initialize_with_settings(&mut self, settings: AppSettings) -> Task<Message> {
        let client = match TmdbClient::from_settings(&settings) {
            Ok(client) => client,
            Err(e) => {
                tracing::error!(error = %e, "TMDB client not configured");
                self.setup_page = Some(SetupPage::new(settings, &e));
                return Task::none();
            }
        };

        tracing::info!(?client, sections = settings.sections.len(), "starting catalog");
        self.tmdb_client = Some(client);
        self.setup_page = None;
        self.enabled_sections = settings.enabled_sections();
        handlers::mount_sections(self)
    }

    pub fn listing(&self, kind: SectionKind) -> Option<&ListingState> {
        self.listings.iter().find(|l| l.kind() == kind)
    }

    pub fn listing_mut(&mut self, kind: SectionKind) -> Option<&mut ListingState> {
        self.listings.iter_mut().find(|l| l.kind() == kind)
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        if let Message::Setup(setup_msg) = message {
            if let Some(ref mut setup) = self.setup_page {
                if let Some(settings) = setup.update(setup_msg) {
                    return self.initialize_with_settings(settings);
                }
            }
            return Task::none();
        }
        handlers::handle_message(self, message)
    }

    fn view(&self) -> Element<'_, Message> {
        if let Some(ref setup) = self.setup_page {
            return setup.view().map(Message::Setup);
        }

        let main_content = container(self.view_catalog())
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(iced::Background::Color(BACKGROUND_BLACK)),
                ..Default::default()
            });

        match self.view_detail_overlay() {
            Some(overlay) => iced::widget::stack![main_content, overlay]
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => main_content.into(),
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        iced::window::resize_events().map(|(_id, size)| Message::WindowResized(size.width))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("marquee=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> iced::Result {
    init_tracing();

    iced::application(Marquee::new, Marquee::update, Marquee::view)
        .title("Marquee")
        .theme(Marquee::theme)
        .window_size(Size::new(WINDOW_WIDTH, WINDOW_HEIGHT))
        .font(iced_fonts::BOOTSTRAP_FONT_BYTES)
        .default_font(Font::DEFAULT)
        .subscription(Marquee::subscription)
        .run()
}
