//! Episode driver: seeded construction, cancellation, and pacing.

use crate::config::SimConfig;
use crate::controller::Controller;
use crate::error::SimError;
use crate::world::{EpisodeState, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cooperative cancellation flag, observed before every tick.
///
/// Cancelling aborts the current episode and returns control to the caller;
/// the in-flight tick's remaining steps are skipped. Clones share the flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Keeps a paced loop at a fixed tick rate by sleeping out the remainder of
/// each period.
struct TickPacer {
    period: Duration,
    last: Instant,
}

impl TickPacer {
    fn new(tick_rate_hz: u32) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / f64::from(tick_rate_hz)),
            last: Instant::now(),
        }
    }

    fn wait(&mut self) {
        let elapsed = self.last.elapsed();
        if elapsed < self.period {
            std::thread::sleep(self.period - elapsed);
        }
        self.last = Instant::now();
    }
}

/// Reporting summary of one finished episode. The fitness protocol itself is
/// the caller's sink slice; this only carries bookkeeping.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct EpisodeSummary {
    pub generation: u32,
    pub ticks: u64,
    pub score: u32,
    pub cancelled: bool,
}

/// Owns a validated configuration and the master RNG that seeds each
/// episode, so a fixed seed reproduces an entire run of episodes.
pub struct Simulator {
    config: SimConfig,
    rng: ChaCha8Rng,
}

impl Simulator {
    /// Validates the configuration and seeds the master RNG. Malformed
    /// configuration fails here, never mid-tick.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Runs one fitness-evaluation episode to termination or cancellation,
    /// as fast as the host allows.
    ///
    /// Each controller's accumulated fitness is written to the sink sharing
    /// its index. The generation number is reporting-only and is passed back
    /// in the summary.
    pub fn run_episode<C: Controller>(
        &mut self,
        controllers: &[C],
        fitness: &mut [f64],
        generation: u32,
        cancel: &CancelToken,
    ) -> Result<EpisodeSummary, SimError> {
        self.run_episode_inner(controllers, fitness, generation, cancel, false)
    }

    /// Like [`run_episode`](Self::run_episode), but holds each tick to the
    /// configured `tick_rate_hz`.
    pub fn run_episode_paced<C: Controller>(
        &mut self,
        controllers: &[C],
        fitness: &mut [f64],
        generation: u32,
        cancel: &CancelToken,
    ) -> Result<EpisodeSummary, SimError> {
        self.run_episode_inner(controllers, fitness, generation, cancel, true)
    }

    fn run_episode_inner<C: Controller>(
        &mut self,
        controllers: &[C],
        fitness: &mut [f64],
        generation: u32,
        cancel: &CancelToken,
        paced: bool,
    ) -> Result<EpisodeSummary, SimError> {
        if controllers.len() != fitness.len() {
            return Err(SimError::PopulationMismatch {
                controllers: controllers.len(),
                sinks: fitness.len(),
            });
        }

        let episode_rng = ChaCha8Rng::seed_from_u64(self.rng.gen());
        let mut world = World::new(self.config.clone(), controllers.len(), episode_rng);
        let mut pacer = paced.then(|| TickPacer::new(self.config.tick_rate_hz));

        let cancelled = loop {
            if cancel.is_cancelled() {
                break true;
            }
            if world.step(controllers, fitness) == EpisodeState::Terminated {
                break false;
            }
            if let Some(pacer) = pacer.as_mut() {
                pacer.wait();
            }
        };

        let summary = EpisodeSummary {
            generation,
            ticks: world.tick,
            score: world.score,
            cancelled,
        };
        tracing::debug!(
            generation,
            ticks = summary.ticks,
            score = summary.score,
            cancelled,
            "episode complete"
        );
        Ok(summary)
    }
}
