//! Procedurally generated paired barrier with a gap.

use crate::config::SimConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One obstacle: a top and bottom barrier separated by a fixed-size gap.
///
/// `gap_y` is the height of the gap's upper edge; the top barrier's visible
/// extent ends there (its sprite is anchored `barrier_height` above it) and
/// the bottom barrier begins `gap_size` below it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pipe {
    pub x: f32,
    pub gap_y: f32,
    /// Anchor of the top barrier sprite (usually negative, off-screen).
    pub top: f32,
    /// Anchor of the bottom barrier sprite.
    pub bottom: f32,
    /// Set at most once, when an agent's x first exceeds this pipe's x.
    pub passed: bool,
}

impl Pipe {
    /// Creates a pipe with a gap height drawn uniformly from the configured
    /// integer range.
    pub fn new(x: f32, rng: &mut impl Rng, config: &SimConfig) -> Self {
        let (lo, hi) = config.obstacle_height_range;
        let gap_y = rng.gen_range(lo..hi) as f32;
        Self::with_gap(x, gap_y, config)
    }

    /// Creates a pipe with an explicit gap height. Scripted scenarios use
    /// this directly; `new` delegates here.
    pub fn with_gap(x: f32, gap_y: f32, config: &SimConfig) -> Self {
        Self {
            x,
            gap_y,
            top: gap_y - config.barrier_height as f32,
            bottom: gap_y + config.gap_size,
            passed: false,
        }
    }

    /// Scrolls the pipe left by one tick. Expiry is the caller's concern.
    pub fn advance(&mut self, config: &SimConfig) {
        self.x -= config.scroll_velocity;
    }

    /// True once the pipe has fully scrolled past the left edge.
    pub fn expired(&self, config: &SimConfig) -> bool {
        self.x + (config.barrier_width as f32) < 0.0
    }
}
