use iced::widget::{button, column, container, row, scrollable, text, Row, Space};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::components::{bold, hidden_scrollbar_style, icon, skeleton_style, ICON_PLAY_FILL, ICON_X_LG};
use crate::detail::{DetailState, HeaderPanel, TrailerState};
use crate::media::{
    Genre, Message, TitleDetail, ACCENT_BLUE, ACCENT_PURPLE, RATING_YELLOW, SURFACE_DARK_GRAY,
    TEXT_GRAY, TEXT_WHITE,
};
use crate::Marquee;

const POPUP_WIDTH: f32 = 860.0;
const HEADER_HEIGHT: f32 = 420.0;

fn popup_container_style(_theme: &iced::Theme) -> container::Style {
    container::Style {
        background: Some(iced::Background::Color(SURFACE_DARK_GRAY)),
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: 16.0.into(),
        },
        shadow: Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.5),
            offset: iced::Vector::new(0.0, 25.0),
            blur_radius: 50.0,
        },
        ..Default::default()
    }
}

fn badge<'a>(label: String, color: Color) -> Element<'a, Message> {
    container(text(label).size(13).color(TEXT_WHITE).font(bold()))
        .padding(Padding::new(4.0).left(10.0).right(10.0))
        .style(move |_theme| container::Style {
            background: Some(iced::Background::Color(color)),
            border: Border {
                radius: 6.0.into(),
                ..Default::default()
            },
            ..Default::default()
        })
        .into()
}

fn genre_chip<'a>(genre: &Genre) -> Element<'a, Message> {
    container(text(genre.name.clone()).size(13).color(TEXT_WHITE))
        .padding(Padding::new(4.0).left(12.0).right(12.0))
        .style(|_theme| container::Style {
            background: Some(iced::Background::Color(Color::from_rgba(1.0, 1.0, 1.0, 0.1))),
            border: Border {
                color: Color::from_rgba(1.0, 1.0, 1.0, 0.25),
                width: 1.0,
                radius: 999.0.into(),
            },
            ..Default::default()
        })
        .into()
}

impl Marquee {
    pub fn view_detail_overlay(&self) -> Option<Element<'_, Message>> {
        let state = self.detail.current()?;

        let popup_with_close = iced::widget::stack![
            self.view_detail_content(state),
            self.view_detail_close_button()
        ]
        .width(Length::Fixed(POPUP_WIDTH));

        let popup = container(popup_with_close)
            .max_width(POPUP_WIDTH)
            .clip(true)
            .style(popup_container_style);

        let overlay_bg = iced::widget::mouse_area(
            container(Space::new().width(Length::Fill).height(Length::Fill))
                .width(Length::Fill)
                .height(Length::Fill)
                .style(|_theme| container::Style {
                    background: Some(iced::Background::Color(Color::from_rgba(
                        0.0, 0.0, 0.0, 0.85,
                    ))),
                    ..Default::default()
                }),
        )
        .on_press(Message::CloseDetail);

        let centered_popup = container(iced::widget::mouse_area(popup))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .padding(Padding::new(40.0));

        Some(
            iced::widget::stack![overlay_bg, centered_popup]
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
        )
    }

    fn view_detail_close_button(&self) -> Element<'_, Message> {
        let btn = button(
            container(icon(ICON_X_LG).size(20).color(TEXT_WHITE))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill),
        )
        .width(Length::Fixed(36.0))
        .height(Length::Fixed(36.0))
        .padding(0)
        .style(|_theme, status| {
            let alpha = if matches!(status, button::Status::Hovered) {
                0.8
            } else {
                0.6
            };
            button::Style {
                background: Some(iced::Background::Color(Color::from_rgba(
                    0.0, 0.0, 0.0, alpha,
                ))),
                text_color: TEXT_WHITE,
                border: Border {
                    radius: 18.0.into(),
                    ..Default::default()
                },
                shadow: Shadow::default(),
                snap: false,
            }
        })
        .on_press(Message::CloseDetail);

        container(btn)
            .width(Length::Fill)
            .align_x(iced::alignment::Horizontal::Right)
            .padding(Padding::new(20.0))
            .into()
    }

    fn view_detail_content<'a>(&'a self, state: &'a DetailState) -> Element<'a, Message> {
        let record = state.record().into_owned();

        let mut body = column![
            text(record.title.clone()).size(32).color(TEXT_WHITE).font(bold()),
            self.view_detail_badges(&record),
            self.view_detail_genres(state, &record),
            text(record.overview.clone())
                .size(15)
                .color(TEXT_GRAY)
                .wrapping(text::Wrapping::Word),
        ];
        match state.trailer() {
            TrailerState::Pending => {
                body = body.push(text("Looking for a trailer...").size(12).color(TEXT_GRAY));
            }
            TrailerState::Missing => {
                body = body.push(text("No trailer available").size(12).color(TEXT_GRAY));
            }
            TrailerState::Found(_) => {}
        }
        let body = body
            .spacing(16)
            .padding(Padding::new(32.0))
            .width(Length::Fill);

        scrollable(column![self.view_detail_header(state), body])
            .direction(scrollable::Direction::Vertical(
                scrollable::Scrollbar::new().width(0).scroller_width(0),
            ))
            .width(Length::Fill)
            .style(hidden_scrollbar_style)
            .into()
    }

    fn view_detail_header(&self, state: &DetailState) -> Element<'_, Message> {
        match state.header() {
            HeaderPanel::Trailer {
                watch_url,
                thumbnail_url,
            } => {
                let thumbnail = self.view_detail_image(&thumbnail_url);
                let play = button(
                    row![
                        icon(ICON_PLAY_FILL).size(18).color(TEXT_WHITE),
                        text("Watch Trailer").size(16).color(TEXT_WHITE),
                    ]
                    .spacing(8)
                    .align_y(iced::Alignment::Center),
                )
                .padding(Padding::new(12.0).left(24.0).right(24.0))
                .style(|_theme, status| {
                    let color = match status {
                        button::Status::Hovered => ACCENT_PURPLE,
                        _ => ACCENT_BLUE,
                    };
                    button::Style {
                        background: Some(iced::Background::Color(color)),
                        text_color: TEXT_WHITE,
                        border: Border {
                            radius: 999.0.into(),
                            ..Default::default()
                        },
                        shadow: Shadow::default(),
                        snap: false,
                    }
                })
                .on_press(Message::OpenTrailer(watch_url));

                let play_overlay = container(play)
                    .width(Length::Fill)
                    .height(Length::Fixed(HEADER_HEIGHT))
                    .center_x(Length::Fill)
                    .center_y(Length::Fixed(HEADER_HEIGHT));

                iced::widget::stack![thumbnail, play_overlay]
                    .width(Length::Fill)
                    .height(Length::Fixed(HEADER_HEIGHT))
                    .into()
            }
            HeaderPanel::Backdrop(url) => self.view_detail_image(&url),
        }
    }

    /// Cached image for `url`, or the built-in tile while it loads or when
    /// it failed.
    fn view_detail_image(&self, url: &str) -> Element<'_, Message> {
        match self.image_cache.get(url) {
            Some(handle) => iced::widget::image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fixed(HEADER_HEIGHT))
                .content_fit(iced::ContentFit::Cover)
                .into(),
            None => container(Space::new().width(Length::Fill).height(HEADER_HEIGHT))
                .width(Length::Fill)
                .height(Length::Fixed(HEADER_HEIGHT))
                .style(|_theme| container::Style {
                    background: Some(iced::Background::Color(Color::from_rgb(
                        0.12, 0.12, 0.12,
                    ))),
                    ..Default::default()
                })
                .into(),
        }
    }

    fn view_detail_badges(&self, record: &TitleDetail) -> Element<'_, Message> {
        let mut badges: Vec<Element<'_, Message>> = Vec::new();
        if let Some(year) = record.release_year() {
            badges.push(badge(year.to_string(), ACCENT_BLUE));
        }
        badges.push(badge(String::from(record.age_badge()), ACCENT_PURPLE));
        badges.push(
            text(format!("{:.1}", record.vote_average))
                .size(14)
                .color(RATING_YELLOW)
                .into(),
        );

        Row::with_children(badges)
            .spacing(10)
            .align_y(iced::Alignment::Center)
            .into()
    }

    fn view_detail_genres(&self, state: &DetailState, record: &TitleDetail) -> Element<'_, Message> {
        if !state.is_enriched() {
            return container(Space::new().width(220.0).height(24.0))
                .style(skeleton_style(12.0))
                .into();
        }
        Row::with_children(record.genres.iter().map(genre_chip))
            .spacing(8)
            .wrap()
            .into()
    }
}
