//! Container size tracking for the resize observer.

use super::constants::MAX_PIXEL_RATIO;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportChange {
    pub aspect: f32,
    pub width_px: u32,
    pub height_px: u32,
}

#[derive(Clone, Debug)]
pub struct Viewport {
    css_width: f64,
    css_height: f64,
    pixel_ratio: f64,
}

impl Viewport {
    /// `device_pixel_ratio` is capped at 2; low-power mode renders at 1x.
    pub fn new(css_width: f64, css_height: f64, device_pixel_ratio: f64, low_power: bool) -> Self {
        let pixel_ratio = if low_power || !device_pixel_ratio.is_finite() {
            1.0
        } else {
            device_pixel_ratio.clamp(1.0, MAX_PIXEL_RATIO)
        };
        Self {
            css_width: css_width.max(1.0),
            css_height: css_height.max(1.0),
            pixel_ratio,
        }
    }

    pub fn aspect(&self) -> f32 {
        (self.css_width / self.css_height) as f32
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (
            ((self.css_width * self.pixel_ratio) as u32).max(1),
            ((self.css_height * self.pixel_ratio) as u32).max(1),
        )
    }

    pub fn current(&self) -> ViewportChange {
        let (width_px, height_px) = self.pixel_size();
        ViewportChange {
            aspect: self.aspect(),
            width_px,
            height_px,
        }
    }

    /// Record an observed container size. Collapsed or unchanged sizes are
    /// ignored so a hidden container never produces a zero-sized surface.
    pub fn observe(&mut self, css_width: f64, css_height: f64) -> Option<ViewportChange> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(css_width) || !valid(css_height) {
            return None;
        }
        if css_width == self.css_width && css_height == self.css_height {
            return None;
        }
        self.css_width = css_width;
        self.css_height = css_height;
        Some(self.current())
    }
}
