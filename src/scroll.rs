//! Scroll-to-depth mapping.
//!
//! The page's vertical scroll position drives the camera along the hall. In
//! the browser the offset is the top of the document body's bounding rect;
//! natively there is no page, so [`PageScroll`] turns mouse-wheel input into
//! the same kind of offset.

use winit::event::MouseScrollDelta;

/// Hall units travelled per pixel scrolled.
pub const SCROLL_RATIO: f64 = 0.01;
/// Camera depth at scroll offset zero.
pub const CAMERA_STANDOFF: f64 = 15.0;

/// Maps the body's top offset (zero or negative once scrolled) to camera z.
///
/// Unclamped: scrolling far enough leaves the hall.
pub fn scroll_depth(top: f64) -> f32 {
    (top * SCROLL_RATIO - CAMERA_STANDOFF) as f32
}

/// Emulated page scroll position for the native window.
#[derive(Clone, Debug, PartialEq)]
pub struct PageScroll {
    top: f64,
    pixels_per_line: f64,
}

impl PageScroll {
    pub fn new() -> Self {
        Self {
            top: 0.0,
            pixels_per_line: 40.0,
        }
    }

    /// The body's top offset in pixels, never above zero.
    pub fn top(&self) -> f64 {
        self.top
    }

    /// Applies a wheel delta and returns the new top offset.
    ///
    /// Wheel down scrolls the page down, which moves the body's top upwards
    /// out of the viewport.
    pub fn wheel(&mut self, delta: MouseScrollDelta) -> f64 {
        let pixels = match delta {
            MouseScrollDelta::LineDelta(_, lines) => f64::from(lines) * self.pixels_per_line,
            MouseScrollDelta::PixelDelta(position) => position.y,
        };
        self.top = (self.top + pixels).min(0.0);
        self.top
    }
}

impl Default for PageScroll {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn depth_is_linear_in_offset() {
        assert_eq!(scroll_depth(0.0), -15.0);
        assert_eq!(scroll_depth(-500.0), -20.0);
        assert_eq!(scroll_depth(-4500.0), -60.0);
    }

    #[test]
    fn page_cannot_scroll_above_top() {
        let mut page = PageScroll::new();
        assert_eq!(page.wheel(MouseScrollDelta::LineDelta(0.0, 3.0)), 0.0);
        assert_eq!(page.wheel(MouseScrollDelta::LineDelta(0.0, -3.0)), -120.0);
        assert_eq!(page.wheel(MouseScrollDelta::LineDelta(0.0, 10.0)), 0.0);
    }

    #[test]
    fn pixel_deltas_are_taken_as_is() {
        let mut page = PageScroll::new();
        page.wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -250.0)));
        page.wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 50.0)));
        assert_eq!(page.top(), -200.0);
    }
}
