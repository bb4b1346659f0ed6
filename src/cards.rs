use iced::widget::{
    button, column, container, pick_list, row, scrollable, text, Column, Row, Space,
};
use iced::{Border, Color, Element, Length, Padding, Shadow};

use crate::carousel::{ScrollDirection, ScrollMetrics};
use crate::components::{
    bold, hidden_scrollbar_style, icon, pill_style, view_empty_state, view_error_state,
    view_loading_block, view_skeleton_card, ICON_CHEVRON_LEFT, ICON_CHEVRON_RIGHT, ICON_FILM,
    ICON_STAR_FILL,
};
use crate::error::RenderError;
use crate::genres::GenreDirectory;
use crate::listing::{ListingContent, ListingState, SectionKind, TimeWindow, Windowing};
use crate::media::{
    Message, TitleSummary, ACCENT_BLUE, RATING_YELLOW, SURFACE_DARK_GRAY, TEXT_GRAY, TEXT_WHITE,
};
use crate::tmdb::{image_url, ImageSize};
use crate::Marquee;

pub const SECTION_PADDING: f32 = 32.0;

const CARD_WIDTH: f32 = 180.0;
const POSTER_HEIGHT: f32 = 270.0;
const CARD_HEIGHT: f32 = 380.0;
const CARD_SPACING: f32 = 16.0;
const SKELETON_CARDS: usize = 8;
const GRID_COLUMNS: usize = 3;

/// Width of a carousel row before the widget reports its real bounds.
pub fn carousel_content_width(card_count: usize) -> f32 {
    if card_count == 0 {
        return 0.0;
    }
    card_count as f32 * (CARD_WIDTH + CARD_SPACING) - CARD_SPACING
}

fn format_rating(rating: f32) -> String {
    format!("Rating: {rating:.1}")
}

fn format_genre_labels(directory: &GenreDirectory, ids: &[u64]) -> Option<String> {
    let labels = directory.joined_labels(ids);
    (!labels.is_empty()).then(|| format!("Genres: {labels}"))
}

impl Marquee {
    /// Every enabled section must have been mounted; a missing one is a
    /// render failure for the whole tree.
    pub fn view_sections(&self) -> Result<Element<'_, Message>, RenderError> {
        let sections = self
            .enabled_sections
            .iter()
            .map(|&kind| {
                let listing = self
                    .listing(kind)
                    .ok_or_else(|| RenderError::MissingSection(kind.title().to_string()))?;
                Ok(self.view_section(listing))
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        Ok(Column::with_children(sections)
            .spacing(48)
            .padding(Padding::new(24.0).left(0.0).right(0.0))
            .width(Length::Fill)
            .into())
    }

    fn view_section<'a>(&'a self, listing: &'a ListingState) -> Element<'a, Message> {
        let kind = listing.kind();
        let body: Element<'a, Message> = match listing.content() {
            ListingContent::Loading => match kind.windowing() {
                Windowing::Carousel => self.view_skeleton_row(),
                Windowing::Paged { .. } => view_loading_block(),
            },
            ListingContent::Failed(message) => view_error_state(kind, message),
            ListingContent::Empty => view_empty_state(kind.empty_message()),
            ListingContent::Ready(items) => match kind.windowing() {
                Windowing::Carousel => self.view_carousel(listing, items),
                Windowing::Paged { .. } => self.view_paged(listing, items),
            },
        };

        let mut content = column![self.view_section_header(listing), body]
            .spacing(20)
            .width(Length::Fill);
        if listing.shows_pager() {
            content = content.push(self.view_pager(listing));
        }

        container(content)
            .width(Length::Fill)
            .padding(Padding::new(0.0).left(SECTION_PADDING).right(SECTION_PADDING))
            .into()
    }

    fn view_section_header<'a>(&'a self, listing: &'a ListingState) -> Element<'a, Message> {
        let kind = listing.kind();
        let title = text(kind.title()).size(28).color(TEXT_WHITE).font(bold());

        let mut heading = column![title].spacing(6);
        if let Some(subtitle) = kind.subtitle() {
            heading = heading.push(text(subtitle).size(14).color(TEXT_GRAY));
        }
        if kind.has_time_window() {
            heading = heading.push(self.view_time_window_toggle(kind, listing.time_window()));
        }

        let mut header = row![heading, Space::new().width(Length::Fill)]
            .align_y(iced::Alignment::End)
            .width(Length::Fill);
        if kind.has_genre_filter() {
            header = header.push(
                pick_list(listing.genre_choices(), Some(listing.selected_genre()), move |choice| {
                    Message::SelectGenre(kind, choice)
                })
                .padding(Padding::new(8.0).left(14.0).right(14.0))
                .text_size(14),
            );
        }
        header.into()
    }

    fn view_time_window_toggle(&self, kind: SectionKind, current: TimeWindow) -> Element<'_, Message> {
        let pills: Vec<Element<Message>> = [TimeWindow::Day, TimeWindow::Week]
            .into_iter()
            .map(|window| {
                button(
                    container(text(window.to_string()).size(15))
                        .width(Length::Fill)
                        .center_x(Length::Fill),
                )
                .width(Length::Fixed(132.0))
                .padding(Padding::new(8.0))
                .style(pill_style(window == current))
                .on_press(Message::SetTimeWindow(kind, window))
                .into()
            })
            .collect();

        container(Row::with_children(pills).spacing(4))
            .padding(4)
            .style(|_theme| iced::widget::container::Style {
                background: Some(iced::Background::Color(SURFACE_DARK_GRAY)),
                border: Border {
                    radius: 999.0.into(),
                    ..Default::default()
                },
                ..Default::default()
            })
            .into()
    }

    fn view_skeleton_row(&self) -> Element<'_, Message> {
        let cards: Vec<Element<Message>> = (0..SKELETON_CARDS)
            .map(|_| view_skeleton_card(CARD_WIDTH, POSTER_HEIGHT))
            .collect();

        scrollable(Row::with_children(cards).spacing(CARD_SPACING))
            .direction(scrollable::Direction::Horizontal(
                scrollable::Scrollbar::new().width(0).scroller_width(0),
            ))
            .width(Length::Fill)
            .style(hidden_scrollbar_style)
            .into()
    }

    fn view_carousel<'a>(
        &'a self,
        listing: &'a ListingState,
        items: Vec<&'a TitleSummary>,
    ) -> Element<'a, Message> {
        let kind = listing.kind();
        let labels = kind.shows_genre_labels().then(|| listing.genres());
        let selected = listing.selected().map(|t| t.id);

        let cards: Vec<Element<Message>> = items
            .into_iter()
            .map(|item| self.view_title_card(kind, item, labels, selected == Some(item.id)))
            .collect();

        let scrollable_cards = scrollable(
            Row::with_children(cards)
                .spacing(CARD_SPACING)
                .align_y(iced::Alignment::Start),
        )
        .id(iced::widget::Id::new(kind.scroll_id()))
        .on_scroll(move |viewport| {
            Message::SectionScrolled(
                kind,
                ScrollMetrics {
                    offset: viewport.absolute_offset().x,
                    viewport_width: viewport.bounds().width,
                    content_width: viewport.content_bounds().width,
                },
            )
        })
        .direction(scrollable::Direction::Horizontal(
            scrollable::Scrollbar::new().width(0).scroller_width(0),
        ))
        .width(Length::Fill)
        .style(hidden_scrollbar_style);

        let left_arrow = self.view_scroll_arrow(
            kind,
            ScrollDirection::Left,
            listing.carousel.can_scroll_left(),
        );
        let right_arrow = self.view_scroll_arrow(
            kind,
            ScrollDirection::Right,
            listing.carousel.can_scroll_right(),
        );

        let left_overlay = container(left_arrow)
            .width(Length::Fill)
            .height(Length::Fixed(POSTER_HEIGHT))
            .align_x(iced::alignment::Horizontal::Left)
            .align_y(iced::alignment::Vertical::Center);
        let right_overlay = container(right_arrow)
            .width(Length::Fill)
            .height(Length::Fixed(POSTER_HEIGHT))
            .align_x(iced::alignment::Horizontal::Right)
            .align_y(iced::alignment::Vertical::Center);

        iced::widget::stack![scrollable_cards, left_overlay, right_overlay]
            .width(Length::Fill)
            .height(Length::Fixed(CARD_HEIGHT))
            .into()
    }

    fn view_scroll_arrow(
        &self,
        kind: SectionKind,
        direction: ScrollDirection,
        visible: bool,
    ) -> Element<'_, Message> {
        if !visible {
            return Space::new().width(0).height(0).into();
        }

        let icon_char = match direction {
            ScrollDirection::Left => ICON_CHEVRON_LEFT,
            ScrollDirection::Right => ICON_CHEVRON_RIGHT,
        };

        button(
            container(icon(icon_char).size(24).color(TEXT_WHITE))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill),
        )
        .width(Length::Fixed(48.0))
        .height(Length::Fixed(48.0))
        .padding(0)
        .style(|_theme, status| {
            let bg_alpha = match status {
                button::Status::Hovered => 0.9,
                _ => 0.6,
            };
            button::Style {
                background: Some(iced::Background::Color(Color::from_rgba(
                    0.0, 0.0, 0.0, bg_alpha,
                ))),
                text_color: TEXT_WHITE,
                border: Border {
                    color: Color::TRANSPARENT,
                    width: 0.0,
                    radius: 24.0.into(),
                },
                shadow: Shadow {
                    color: Color::from_rgba(0.0, 0.0, 0.0, 0.5),
                    offset: iced::Vector::new(0.0, 2.0),
                    blur_radius: 8.0,
                },
                snap: false,
            }
        })
        .on_press(Message::ScrollSection(kind, direction))
        .into()
    }

    /// Paged sections lay the current window out as a grid, three per row.
    fn view_paged<'a>(
        &'a self,
        listing: &'a ListingState,
        items: Vec<&'a TitleSummary>,
    ) -> Element<'a, Message> {
        let kind = listing.kind();
        let labels = kind.shows_genre_labels().then(|| listing.genres());
        let selected = listing.selected().map(|t| t.id);

        let rows: Vec<Element<Message>> = items
            .chunks(GRID_COLUMNS)
            .map(|chunk| {
                let cards: Vec<Element<Message>> = chunk
                    .iter()
                    .map(|&item| {
                        self.view_title_card(kind, item, labels, selected == Some(item.id))
                    })
                    .collect();
                Row::with_children(cards).spacing(24).into()
            })
            .collect();

        container(Column::with_children(rows).spacing(24))
            .width(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    fn view_pager<'a>(&'a self, listing: &'a ListingState) -> Element<'a, Message> {
        let kind = listing.kind();
        let previous = button(text("Previous").size(14))
            .padding(Padding::new(8.0).left(18.0).right(18.0))
            .style(pill_style(false))
            .on_press_maybe(listing.can_prev().then_some(Message::PreviousPage(kind)));
        let next = button(text("Next").size(14))
            .padding(Padding::new(8.0).left(18.0).right(18.0))
            .style(pill_style(false))
            .on_press_maybe(listing.can_next().then_some(Message::NextPage(kind)));
        let label = text(format!("Page {}", listing.page()))
            .size(14)
            .color(TEXT_GRAY);

        container(
            row![previous, label, next]
                .spacing(16)
                .align_y(iced::Alignment::Center),
        )
        .width(Length::Fill)
        .center_x(Length::Fill)
        .into()
    }

    fn view_title_card<'a>(
        &'a self,
        kind: SectionKind,
        item: &'a TitleSummary,
        genres: Option<&'a GenreDirectory>,
        highlighted: bool,
    ) -> Element<'a, Message> {
        let poster = self.view_card_poster(item);

        let mut details = column![
            text(&item.title)
                .size(15)
                .color(TEXT_WHITE)
                .font(bold())
                .wrapping(text::Wrapping::Word),
            text(&item.release_date).size(12).color(TEXT_GRAY),
            row![
                icon(ICON_STAR_FILL).size(12).color(RATING_YELLOW),
                text(format_rating(item.vote_average))
                    .size(12)
                    .color(RATING_YELLOW),
            ]
            .spacing(4)
            .align_y(iced::Alignment::Center),
        ]
        .spacing(4);
        if let Some(labels) = genres.and_then(|g| format_genre_labels(g, &item.genre_ids)) {
            details = details.push(text(labels).size(12).color(TEXT_GRAY));
        }

        let card = container(column![poster, details.padding(Padding::new(8.0))])
            .width(Length::Fixed(CARD_WIDTH))
            .style(move |_theme| iced::widget::container::Style {
                background: Some(iced::Background::Color(SURFACE_DARK_GRAY)),
                border: Border {
                    color: if highlighted { ACCENT_BLUE } else { Color::TRANSPARENT },
                    width: if highlighted { 2.0 } else { 0.0 },
                    radius: 8.0.into(),
                },
                shadow: Shadow {
                    color: Color::from_rgba(0.0, 0.0, 0.0, 0.3),
                    offset: iced::Vector::new(0.0, 4.0),
                    blur_radius: 8.0,
                },
                ..Default::default()
            });

        iced::widget::mouse_area(card)
            .on_press(Message::SelectTitle(kind, item.id))
            .interaction(iced::mouse::Interaction::Pointer)
            .into()
    }

    fn view_card_poster(&self, item: &TitleSummary) -> Element<'_, Message> {
        let url = image_url(item.poster_path.as_deref(), ImageSize::Poster);
        match self.image_cache.get(&url) {
            Some(handle) => iced::widget::image(handle.clone())
                .width(Length::Fixed(CARD_WIDTH))
                .height(Length::Fixed(POSTER_HEIGHT))
                .content_fit(iced::ContentFit::Cover)
                .border_radius(8.0)
                .into(),
            None => self.view_card_placeholder(CARD_WIDTH, POSTER_HEIGHT),
        }
    }

    pub fn view_card_placeholder(&self, width: f32, height: f32) -> Element<'_, Message> {
        container(icon(ICON_FILM).size(48).color(TEXT_GRAY))
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(|_theme| iced::widget::container::Style {
                background: Some(iced::Background::Color(SURFACE_DARK_GRAY)),
                border: Border {
                    radius: 8.0.into(),
                    ..Default::default()
                },
                ..Default::default()
            })
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::Genre;

    #[test]
    fn test_content_width_counts_spacing_between_cards() {
        assert_eq!(carousel_content_width(0), 0.0);
        assert_eq!(carousel_content_width(1), CARD_WIDTH);
        assert_eq!(carousel_content_width(3), 3.0 * CARD_WIDTH + 2.0 * CARD_SPACING);
    }

    #[test]
    fn test_rating_label_has_one_decimal() {
        assert_eq!(format_rating(8.456), "Rating: 8.5");
        assert_eq!(format_rating(0.0), "Rating: 0.0");
    }

    #[test]
    fn test_genre_label_omitted_when_nothing_resolves() {
        // Arrange
        let directory = GenreDirectory::new(vec![Genre {
            id: 35,
            name: String::from("Comedy"),
        }]);

        // Act & Assert
        assert_eq!(
            format_genre_labels(&directory, &[35, 1]),
            Some(String::from("Genres: Comedy"))
        );
        assert_eq!(format_genre_labels(&directory, &[1]), None);
        assert_eq!(format_genre_labels(&GenreDirectory::default(), &[35]), None);
    }
}
