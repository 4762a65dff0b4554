//! The generation loop: evaluate, report, breed, repeat.

use crate::brain::Brain;
use crate::config::AppConfig;
use crate::evolution::Population;
use aviary_core::{CancelToken, Simulator};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Result of a whole evolution run.
pub struct EvolutionOutcome {
    /// The best controller observed across all generations.
    pub champion: Brain,
    pub best_fitness: f64,
    pub generations_run: u32,
    pub best_score: u32,
    pub cancelled: bool,
}

/// Runs evolution to the generation budget or cancellation.
///
/// Episode randomness is owned by the simulator; breeding randomness is
/// derived from the same seed so a fixed seed reproduces the whole run.
pub fn run_evolution(
    config: &AppConfig,
    cancel: &CancelToken,
    paced: bool,
) -> anyhow::Result<EvolutionOutcome> {
    config.validate()?;
    let mut sim = Simulator::new(config.sim.clone())?;
    let mut rng = match config.sim.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(0x5EED)),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut population = Population::new(&config.evolution, &mut rng);
    let mut champion = population.brains[0].clone();
    let mut best_fitness = f64::NEG_INFINITY;
    let mut best_score = 0u32;
    let mut generations_run = 0u32;
    let mut cancelled = false;

    for _ in 0..config.max_generations {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }

        let summary = population.evaluate(&mut sim, cancel, paced)?;
        generations_run += 1;

        let stats = population.stats(&summary);
        tracing::info!(
            generation = stats.generation,
            best = stats.best,
            mean = stats.mean,
            score = stats.score,
            ticks = stats.ticks,
            "generation complete"
        );

        if stats.best > best_fitness {
            best_fitness = stats.best;
            champion = population.brains[population.best_index()].clone();
        }
        best_score = best_score.max(summary.score);

        if summary.cancelled {
            cancelled = true;
            break;
        }
        population.next_generation(&config.evolution, &mut rng);
    }

    Ok(EvolutionOutcome {
        champion,
        best_fitness,
        generations_run,
        best_score,
        cancelled,
    })
}
