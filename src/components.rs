use iced::widget::{button, column, container, row, scrollable, text, Space};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::boundary::FALLBACK_MESSAGE;
use crate::listing::SectionKind;
use crate::media::{
    Message, ACCENT_BLUE, ACCENT_PURPLE, BACKGROUND_BLACK, ERROR_RED, SKELETON_GRAY,
    SURFACE_DARK_GRAY, TEXT_GRAY, TEXT_WHITE,
};
use crate::Marquee;

pub const ICON_CHEVRON_LEFT: char = '\u{F284}';
pub const ICON_CHEVRON_RIGHT: char = '\u{F285}';
pub const ICON_FILM: char = '\u{F3A9}';
pub const ICON_X_LG: char = '\u{F659}';
pub const ICON_PLAY_FILL: char = '\u{F4F4}';
pub const ICON_STAR_FILL: char = '\u{F586}';
const ICON_EXCLAMATION: char = '\u{F33A}';

pub fn icon(icon_char: char) -> iced::widget::Text<'static> {
    text(icon_char.to_string()).font(iced::Font {
        family: iced::font::Family::Name("bootstrap-icons"),
        ..Default::default()
    })
}

pub fn bold() -> iced::Font {
    iced::Font {
        weight: iced::font::Weight::Bold,
        ..Default::default()
    }
}

pub fn hidden_scrollbar_style(
    _theme: &iced::Theme,
    _status: scrollable::Status,
) -> scrollable::Style {
    let transparent_rail = scrollable::Rail {
        background: None,
        border: Border::default(),
        scroller: scrollable::Scroller {
            background: iced::Background::Color(Color::TRANSPARENT),
            border: Border::default(),
        },
    };
    scrollable::Style {
        container: container::Style::default(),
        vertical_rail: transparent_rail.clone(),
        horizontal_rail: transparent_rail,
        gap: None,
        auto_scroll: scrollable::AutoScroll {
            background: iced::Background::Color(Color::TRANSPARENT),
            border: Border::default(),
            shadow: Shadow::default(),
            icon: Color::TRANSPARENT,
        },
    }
}

pub fn skeleton_style(radius: f32) -> impl Fn(&iced::Theme) -> container::Style {
    move |_theme| container::Style {
        background: Some(iced::Background::Color(Color {
            a: 0.6,
            ..SKELETON_GRAY
        })),
        border: Border {
            radius: radius.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Rounded pill used by the pager and the time-window toggle. Active pills
/// get the accent gradient.
pub fn pill_style(active: bool) -> impl Fn(&iced::Theme, button::Status) -> button::Style {
    move |_theme, status| {
        let background = if active {
            iced::Background::Gradient(iced::Gradient::Linear(
                iced::gradient::Linear::new(std::f32::consts::FRAC_PI_2)
                    .add_stop(0.0, ACCENT_PURPLE)
                    .add_stop(1.0, ACCENT_BLUE),
            ))
        } else {
            let alpha = match status {
                button::Status::Hovered => 1.0,
                button::Status::Disabled => 0.4,
                _ => 0.8,
            };
            iced::Background::Color(Color {
                a: alpha,
                ..SURFACE_DARK_GRAY
            })
        };
        let text_color = match status {
            button::Status::Disabled => Color { a: 0.5, ..TEXT_GRAY },
            _ if active => TEXT_WHITE,
            button::Status::Hovered => TEXT_WHITE,
            _ => TEXT_GRAY,
        };
        button::Style {
            background: Some(background),
            text_color,
            border: Border {
                color: Color::TRANSPARENT,
                width: 0.0,
                radius: 999.0.into(),
            },
            shadow: Shadow::default(),
            snap: false,
        }
    }
}

pub fn view_skeleton_card<'a>(width: f32, height: f32) -> Element<'a, Message> {
    let poster = container(Space::new().width(width).height(height)).style(skeleton_style(8.0));
    let title_line = container(Space::new().width(width * 0.8).height(14.0)).style(skeleton_style(4.0));
    let meta_line = container(Space::new().width(width * 0.5).height(12.0)).style(skeleton_style(4.0));

    column![poster, title_line, meta_line]
        .spacing(8)
        .width(Length::Fixed(width))
        .into()
}

pub fn view_loading_block<'a>() -> Element<'a, Message> {
    container(text("Loading...").size(20).color(TEXT_GRAY))
        .width(Length::Fill)
        .padding(Padding::new(48.0))
        .center_x(Length::Fill)
        .into()
}

pub fn view_empty_state<'a>(message: &'a str) -> Element<'a, Message> {
    container(text(message).size(16).color(TEXT_GRAY))
        .width(Length::Fill)
        .padding(Padding::new(32.0))
        .center_x(Length::Fill)
        .into()
}

/// Inline failure for one section. Other sections keep working.
pub fn view_error_state<'a>(kind: SectionKind, message: &'a str) -> Element<'a, Message> {
    let error_text = row![
        icon(ICON_EXCLAMATION).size(18).color(ERROR_RED),
        text(message).size(18).color(ERROR_RED)
    ]
    .spacing(8)
    .align_y(iced::Alignment::Center);

    let retry_button = button(text("Retry").size(16).color(TEXT_WHITE))
        .padding(Padding::new(10.0).left(24.0).right(24.0))
        .style(|_theme, status| {
            let bg = match status {
                button::Status::Hovered => Color::from_rgb(0.8, 0.2, 0.2),
                _ => ERROR_RED,
            };
            button::Style {
                background: Some(iced::Background::Color(bg)),
                text_color: TEXT_WHITE,
                border: Border {
                    color: Color::TRANSPARENT,
                    width: 0.0,
                    radius: 4.0.into(),
                },
                shadow: Shadow::default(),
                snap: false,
            }
        })
        .on_press(Message::RetrySection(kind));

    container(
        column![error_text, retry_button]
            .spacing(16)
            .align_x(iced::Alignment::Center),
    )
    .width(Length::Fill)
    .padding(Padding::new(32.0))
    .center_x(Length::Fill)
    .into()
}

impl Marquee {
    pub fn view_header(&self) -> Element<'_, Message> {
        let logo = text("Marquee").size(28).color(TEXT_WHITE).font(bold());
        let tagline = text("Trending, top rated and popular titles")
            .size(14)
            .color(TEXT_GRAY);

        let header_content = row![logo, Space::new().width(Length::Fill), tagline]
            .padding(Padding::new(16.0).left(32.0).right(32.0))
            .align_y(iced::Alignment::Center);

        container(header_content)
            .width(Length::Fill)
            .height(Length::Fixed(72.0))
            .style(|_theme| container::Style {
                background: Some(iced::Background::Gradient(iced::Gradient::Linear(
                    iced::gradient::Linear::new(std::f32::consts::PI)
                        .add_stop(0.0, Color::from_rgba(0.0, 0.0, 0.0, 0.95))
                        .add_stop(1.0, Color::from_rgba(0.0, 0.0, 0.0, 0.6)),
                ))),
                ..Default::default()
            })
            .into()
    }

    pub fn view_footer(&self) -> Element<'_, Message> {
        container(
            text("Movie and series data provided by TMDB.")
                .size(12)
                .color(TEXT_GRAY),
        )
        .width(Length::Fill)
        .padding(Padding::new(24.0))
        .center_x(Length::Fill)
        .into()
    }

    pub fn view_boundary_fallback(&self) -> Element<'_, Message> {
        container(text(FALLBACK_MESSAGE).size(20).color(TEXT_WHITE))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    /// Header, the boundary-guarded section tree and footer in one vertical
    /// scroll.
    pub fn view_catalog(&self) -> Element<'_, Message> {
        if self.boundary.is_tripped() {
            return self.view_boundary_fallback();
        }

        let sections = self.boundary.guard(
            || self.view_sections(),
            || self.view_boundary_fallback(),
        );
        if self.boundary.is_tripped() {
            return sections;
        }

        let page = column![self.view_header(), sections, self.view_footer()].width(Length::Fill);

        container(
            scrollable(page)
                .direction(scrollable::Direction::Vertical(
                    scrollable::Scrollbar::new().width(0).scroller_width(0),
                ))
                .width(Length::Fill)
                .height(Length::Fill)
                .style(hidden_scrollbar_style),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(iced::Background::Color(BACKGROUND_BLACK)),
            ..Default::default()
        })
        .into()
    }
}
