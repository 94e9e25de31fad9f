pub const DEFAULT_NEAR_BOTTOM_THRESHOLD_PX: f64 = 80.0;

/// Scroll metrics of a list viewport, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPosition {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollPosition {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    pub fn remaining(&self) -> f64 {
        (self.scroll_height - self.scroll_top - self.client_height).max(0.0)
    }

    pub fn is_near_bottom(&self, threshold_px: f64) -> bool {
        self.remaining() <= threshold_px
    }
}

#[cfg(test)]
#[path = "tests/scroll_tests.rs"]
mod tests;
