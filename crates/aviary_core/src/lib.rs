//! # Aviary Core
//!
//! The simulation core for Aviary - a side-scrolling arcade world whose
//! agents are flown by evolved neural controllers.
//!
//! This crate contains the deterministic simulation logic, including:
//! - Per-agent flight physics (impulse and displacement law)
//! - Procedural obstacle generation and scroll motion
//! - Pixel-accurate silhouette collision
//! - Population-level episode simulation with live-set pruning
//! - The fitness-accumulation protocol consumed by an evolution engine
//!
//! ## Architecture
//!
//! One episode evaluates a whole population at once: every agent shares the
//! same scrolling world and is pruned as it fails, while its fitness sink is
//! mutated in place. The evolution engine stays external - the core only
//! consumes the [`Controller`] capability and a slice of fitness sinks.
//! Seeded RNG makes whole runs reproducible.
//!
//! ## Example
//!
//! ```
//! use aviary_core::{CancelToken, SimConfig, Simulator};
//!
//! let config = SimConfig {
//!     seed: Some(7),
//!     ..SimConfig::default()
//! };
//! let mut sim = Simulator::new(config).unwrap();
//!
//! // Four scripted agents that never jump.
//! let controllers = vec![|_inputs: [f32; 3]| 0.0f32; 4];
//! let mut fitness = vec![0.0f64; 4];
//!
//! let summary = sim
//!     .run_episode(&controllers, &mut fitness, 0, &CancelToken::new())
//!     .unwrap();
//! assert!(summary.ticks > 0);
//! ```

/// Per-agent flight body and motion law
pub mod bird;
/// Configuration for the simulation constants
pub mod config;
/// The decision capability consumed by the simulation
pub mod controller;
/// Error types for the simulation core
pub mod error;
/// Two-segment scrolling ground band
pub mod ground;
/// Static collision silhouettes and the overlap test
pub mod mask;
/// Paired-barrier obstacles with procedural gap heights
pub mod pipe;
/// Episode driver: seeding, cancellation, pacing
pub mod sim;
/// Per-episode world state and the tick algorithm
pub mod world;

pub use bird::Bird;
pub use config::SimConfig;
pub use controller::Controller;
pub use error::SimError;
pub use ground::Ground;
pub use mask::Mask;
pub use pipe::Pipe;
pub use sim::{CancelToken, EpisodeSummary, Simulator};
pub use world::{Agent, EpisodeState, World};
