//! Two-segment horizontally tiling ground band.

use crate::config::SimConfig;
use serde::{Deserialize, Serialize};

/// Scroll offsets of the two ground segments.
///
/// The segments leapfrog each other as they scroll left so the band appears
/// continuous. The termination bound itself is `SimConfig::ground_y`; this
/// struct only maintains screen-wrap continuity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ground {
    pub x1: f32,
    pub x2: f32,
    pub segment_width: f32,
}

impl Ground {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            x1: 0.0,
            x2: config.ground_segment_width,
            segment_width: config.ground_segment_width,
        }
    }

    /// Scrolls both segments left by one tick, wrapping whichever has fully
    /// left the screen to the right edge of the other.
    pub fn advance(&mut self, config: &SimConfig) {
        self.x1 -= config.scroll_velocity;
        self.x2 -= config.scroll_velocity;

        if self.x1 + self.segment_width < 0.0 {
            self.x1 = self.x2 + self.segment_width;
        }
        if self.x2 + self.segment_width < 0.0 {
            self.x2 = self.x1 + self.segment_width;
        }
    }
}
