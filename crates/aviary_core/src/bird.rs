//! Per-agent flight body: vertical physics state and the motion law.

use crate::config::SimConfig;
use serde::{Deserialize, Serialize};

/// Distance above the launch height within which the body keeps its nose up.
const TILT_HOLD_MARGIN: f32 = 50.0;
/// Lowest tilt a falling body can reach (straight nose-dive).
const TILT_FLOOR: f32 = -90.0;

/// Vertical physics state of one agent.
///
/// The horizontal position is fixed for the whole episode; only the world
/// scrolls. The motion law is a discrete approximation of constant-
/// acceleration projectile motion, evaluated once per tick: with the default
/// coefficient of 1.5 on t^2, effective gravity is 3.0 units per tick
/// squared.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bird {
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
    /// Ticks elapsed since the last impulse; the `t` of the motion law.
    pub ticks_since_impulse: u32,
    /// Vertical position recorded at the moment of the last impulse.
    pub launch_height: f32,
    /// Orientation in degrees, consumed only by presentation layers.
    pub tilt: f32,
}

impl Bird {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            ticks_since_impulse: 0,
            launch_height: y,
            tilt: 0.0,
        }
    }

    /// Applies an upward impulse.
    ///
    /// Velocity and the tick counter are reset together; the current height
    /// becomes the launch reference for the tilt rule.
    pub fn impulse(&mut self, config: &SimConfig) {
        self.velocity = config.impulse_velocity;
        self.ticks_since_impulse = 0;
        self.launch_height = self.y;
    }

    /// Advances the body by one tick.
    ///
    /// Displacement is v*t + c*t^2 for t ticks since the last impulse,
    /// clamped to the terminal displacement on the way down and biased by an
    /// extra `lift_bias` on the way up.
    pub fn advance(&mut self, config: &SimConfig) {
        self.ticks_since_impulse += 1;
        let t = self.ticks_since_impulse as f32;

        let mut displacement = self.velocity * t + config.gravity_coefficient * t * t;
        if displacement >= config.terminal_displacement {
            displacement = config.terminal_displacement;
        }
        if displacement < 0.0 {
            displacement -= config.lift_bias;
        }

        self.y += displacement;

        if displacement < 0.0 || self.y < self.launch_height + TILT_HOLD_MARGIN {
            if self.tilt < config.max_tilt {
                self.tilt = config.max_tilt;
            }
        } else if self.tilt > TILT_FLOOR {
            self.tilt -= config.tilt_fall_rate;
        }
    }
}
