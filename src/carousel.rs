//! Horizontal scroll model for carousel sections.
//!
//! Scrolling is pure presentation: nothing here touches the fetched items.

use std::time::Duration;

/// A scroll click moves by `ceil(viewport / 1.5)`, two thirds of the width.
const VIEWPORT_DIVISOR: f32 = 1.5;
const EASING: f32 = 0.15;
const SNAP_DISTANCE: f32 = 1.0;

pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Left,
    Right,
}

/// Geometry reported by the scrollable widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub offset: f32,
    pub viewport_width: f32,
    pub content_width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    Moving(f32),
    Settled(f32),
}

impl Frame {
    pub fn offset(self) -> f32 {
        match self {
            Frame::Moving(offset) | Frame::Settled(offset) => offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Carousel {
    offset: f32,
    target: f32,
    viewport_width: f32,
    content_width: f32,
}

impl Carousel {
    pub fn new(viewport_width: f32) -> Self {
        Self {
            offset: 0.0,
            target: 0.0,
            viewport_width: viewport_width.max(0.0),
            content_width: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        (self.viewport_width / VIEWPORT_DIVISOR).ceil()
    }

    pub fn max_offset(&self) -> f32 {
        (self.content_width - self.viewport_width).max(0.0)
    }

    pub fn is_animating(&self) -> bool {
        (self.target - self.offset).abs() >= SNAP_DISTANCE
    }

    pub fn can_scroll_left(&self) -> bool {
        self.target > 0.0
    }

    pub fn can_scroll_right(&self) -> bool {
        self.target < self.max_offset()
    }

    /// Moves the target one step and returns it. The caller drives the
    /// animation with `tick`.
    pub fn scroll(&mut self, direction: ScrollDirection) -> f32 {
        let step = self.step();
        let next = match direction {
            ScrollDirection::Left => self.target - step,
            ScrollDirection::Right => self.target + step,
        };
        self.target = next.clamp(0.0, self.max_offset());
        self.target
    }

    /// Advances one animation frame toward the target.
    pub fn tick(&mut self) -> Frame {
        let distance = self.target - self.offset;
        if distance.abs() < SNAP_DISTANCE {
            self.offset = self.target;
            return Frame::Settled(self.offset);
        }
        self.offset += distance * EASING;
        Frame::Moving(self.offset)
    }

    /// Syncs with the widget after a user or programmatic scroll.
    pub fn observe(&mut self, metrics: ScrollMetrics) {
        self.viewport_width = metrics.viewport_width.max(0.0);
        self.content_width = metrics.content_width.max(0.0);
        let animating = self.is_animating();
        self.offset = metrics.offset.clamp(0.0, self.max_offset());
        if !animating {
            self.target = self.offset;
        }
    }

    pub fn set_viewport_width(&mut self, width: f32) {
        self.viewport_width = width.max(0.0);
        self.target = self.target.min(self.max_offset());
    }

    /// Estimated content width, used until the widget reports real bounds.
    pub fn set_content_width(&mut self, width: f32) {
        self.content_width = width.max(0.0);
        self.target = self.target.min(self.max_offset());
    }

    /// Back to the start, e.g. after a new result set replaced the items.
    pub fn reset(&mut self) {
        self.offset = 0.0;
        self.target = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel(viewport: f32, content: f32) -> Carousel {
        let mut carousel = Carousel::new(viewport);
        carousel.set_content_width(content);
        carousel
    }

    #[test]
    fn test_step_is_two_thirds_of_viewport_rounded_up() {
        assert_eq!(Carousel::new(1200.0).step(), 800.0);
        assert_eq!(Carousel::new(1000.0).step(), 667.0);
    }

    #[test]
    fn test_scroll_right_then_left_returns_to_start() {
        // Arrange
        let mut carousel = carousel(900.0, 5000.0);

        // Act
        let right = carousel.scroll(ScrollDirection::Right);
        let left = carousel.scroll(ScrollDirection::Left);

        // Assert
        assert_eq!(right, 600.0);
        assert_eq!(left, 0.0);
    }

    #[test]
    fn test_scroll_clamps_to_content_bounds() {
        // Arrange
        let mut carousel = carousel(900.0, 1200.0);

        // Act
        let target = carousel.scroll(ScrollDirection::Right);

        // Assert
        assert_eq!(target, 300.0);
        assert!(!carousel.can_scroll_right());
        assert!(carousel.can_scroll_left());
        assert_eq!(carousel.scroll(ScrollDirection::Left), 0.0);
        assert_eq!(carousel.scroll(ScrollDirection::Left), 0.0);
    }

    #[test]
    fn test_tick_eases_then_settles_on_target() {
        // Arrange
        let mut carousel = carousel(900.0, 5000.0);
        carousel.scroll(ScrollDirection::Right);

        // Act
        let first = carousel.tick();
        let mut frames = 1;
        while let Frame::Moving(_) = carousel.tick() {
            frames += 1;
            assert!(frames < 500, "animation never settled");
        }

        // Assert
        assert_eq!(first, Frame::Moving(90.0));
        assert_eq!(carousel.offset, 600.0);
        assert!(!carousel.is_animating());
    }

    #[test]
    fn test_observe_during_animation_keeps_target() {
        // Arrange
        let mut carousel = carousel(900.0, 5000.0);
        carousel.scroll(ScrollDirection::Right);

        // Act
        carousel.observe(ScrollMetrics {
            offset: 90.0,
            viewport_width: 900.0,
            content_width: 5000.0,
        });

        // Assert
        assert_eq!(carousel.offset, 90.0);
        assert_eq!(carousel.target, 600.0);
    }

    #[test]
    fn test_observe_when_idle_adopts_user_offset() {
        let mut carousel = carousel(900.0, 5000.0);

        carousel.observe(ScrollMetrics {
            offset: 250.0,
            viewport_width: 900.0,
            content_width: 5000.0,
        });

        assert_eq!(carousel.target, 250.0);
        assert!(carousel.can_scroll_left());
    }

    #[test]
    fn test_short_content_cannot_scroll() {
        let carousel = carousel(900.0, 600.0);
        assert!(!carousel.can_scroll_left());
        assert!(!carousel.can_scroll_right());
    }
}
