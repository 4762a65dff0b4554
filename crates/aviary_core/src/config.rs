//! Configuration for the simulation constants.
//!
//! Provides a strongly-typed structure that maps to the `[sim]` section of
//! `config.toml`. Every tunable of the playfield lives here so an episode is
//! fully determined by one `SimConfig` value plus a seed.
//!
//! ## Example `config.toml` section
//!
//! ```toml
//! [sim]
//! gap_size = 200.0
//! scroll_velocity = 5.0
//! gravity_coefficient = 1.5
//! impulse_velocity = -10.5
//! ground_y = 730.0
//! agent_start = [230.0, 350.0]
//! obstacle_height_range = [50, 450]
//! tick_rate_hz = 30
//! ```

use serde::{Deserialize, Serialize};

/// Simulation-level configuration.
///
/// Units are playfield pixels; velocities are pixels per tick. The defaults
/// describe a 500x800 playfield with the ground line at 730.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SimConfig {
    /// Vertical opening between the top and bottom barrier of an obstacle.
    pub gap_size: f32,
    /// Leftward speed of obstacles and ground, per tick.
    pub scroll_velocity: f32,
    /// Coefficient on t^2 in the displacement law (half the gravity).
    pub gravity_coefficient: f32,
    /// Velocity assigned on impulse; negative is upward.
    pub impulse_velocity: f32,
    /// Largest downward displacement a body can cover in one tick.
    pub terminal_displacement: f32,
    /// Extra displacement subtracted while a body is still rising.
    pub lift_bias: f32,
    /// Vertical line an agent's lower edge may not reach.
    pub ground_y: f32,
    /// Fixed (x, y) every agent starts an episode at.
    pub agent_start: (f32, f32),
    /// Horizontal position freshly spawned obstacles appear at.
    pub obstacle_spawn_x: f32,
    /// Horizontal position of the episode's first obstacle.
    pub obstacle_initial_x: f32,
    /// Half-open integer range the gap-center height is drawn from.
    pub obstacle_height_range: (u32, u32),
    /// Target tick rate for paced episodes.
    pub tick_rate_hz: u32,
    pub bird_width: u32,
    pub bird_height: u32,
    pub barrier_width: u32,
    pub barrier_height: u32,
    /// Width of one of the two wrapping ground segments.
    pub ground_segment_width: f32,
    /// Nose-up tilt snapped to while rising (presentation only).
    pub max_tilt: f32,
    /// Tilt lost per falling tick (presentation only).
    pub tilt_fall_rate: f32,
    /// Master RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gap_size: 200.0,
            scroll_velocity: 5.0,
            gravity_coefficient: 1.5,
            impulse_velocity: -10.5,
            terminal_displacement: 16.0,
            lift_bias: 2.0,
            ground_y: 730.0,
            agent_start: (230.0, 350.0),
            obstacle_spawn_x: 600.0,
            obstacle_initial_x: 700.0,
            obstacle_height_range: (50, 450),
            tick_rate_hz: 30,
            bird_width: 68,
            bird_height: 48,
            barrier_width: 104,
            barrier_height: 640,
            ground_segment_width: 672.0,
            max_tilt: 25.0,
            tilt_fall_rate: 20.0,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Validates all simulation parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a
    /// description of the first validation failure. Construction of a
    /// simulator calls this so malformed values fail fast instead of
    /// mid-tick.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.gap_size > 0.0, "Gap size must be positive");
        anyhow::ensure!(
            self.scroll_velocity > 0.0,
            "Scroll velocity must be positive"
        );
        anyhow::ensure!(
            self.gravity_coefficient > 0.0,
            "Gravity coefficient must be positive"
        );
        anyhow::ensure!(
            self.impulse_velocity < 0.0,
            "Impulse velocity must be negative (upward)"
        );
        anyhow::ensure!(
            self.terminal_displacement > 0.0,
            "Terminal displacement must be positive"
        );
        anyhow::ensure!(self.lift_bias >= 0.0, "Lift bias must be non-negative");

        anyhow::ensure!(self.ground_y > 0.0, "Ground line must be positive");
        anyhow::ensure!(
            self.agent_start.1 > 0.0 && self.agent_start.1 < self.ground_y,
            "Agent start height must lie between the top of the playfield and the ground"
        );
        anyhow::ensure!(
            self.agent_start.0 > 0.0,
            "Agent start x must be positive"
        );

        let (lo, hi) = self.obstacle_height_range;
        anyhow::ensure!(lo < hi, "Obstacle height range must be non-empty");
        anyhow::ensure!(
            hi as f32 + self.gap_size <= self.ground_y,
            "Obstacle gap must fit above the ground line"
        );
        anyhow::ensure!(
            self.obstacle_spawn_x > self.agent_start.0,
            "Obstacles must spawn to the right of the agents"
        );
        anyhow::ensure!(
            self.obstacle_initial_x > self.agent_start.0,
            "The first obstacle must start to the right of the agents"
        );

        anyhow::ensure!(self.tick_rate_hz > 0, "Tick rate must be positive");
        anyhow::ensure!(self.tick_rate_hz <= 240, "Tick rate too high (max 240)");

        anyhow::ensure!(
            self.bird_width > 0 && self.bird_height > 0,
            "Agent sprite dimensions must be positive"
        );
        anyhow::ensure!(
            self.barrier_width > 0 && self.barrier_height > 0,
            "Barrier sprite dimensions must be positive"
        );
        anyhow::ensure!(
            self.ground_segment_width > 0.0,
            "Ground segment width must be positive"
        );

        Ok(())
    }

    /// Loads and validates a configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }
}
