//! Generation-level population management around the core simulator.

use crate::brain::{Brain, MutationParams};
use aviary_core::{CancelToken, EpisodeSummary, SimError, Simulator};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Evolution parameters, the `[evolution]` section of `config.toml`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub mutation_rate: f32,
    pub mutation_amount: f32,
    pub drift_rate: f32,
    pub drift_amount: f32,
    /// Top performers copied unchanged into the next generation.
    pub elite_count: usize,
    /// Candidates drawn per parent selection.
    pub tournament_size: usize,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            mutation_rate: 0.1,
            mutation_amount: 0.2,
            drift_rate: 0.01,
            drift_amount: 0.5,
            elite_count: 2,
            tournament_size: 3,
        }
    }
}

impl EvolutionConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.population_size >= 2,
            "Population size must be at least 2"
        );
        anyhow::ensure!(
            self.elite_count < self.population_size,
            "Elite count must leave room for offspring"
        );
        anyhow::ensure!(
            self.mutation_rate >= 0.0 && self.mutation_rate <= 1.0,
            "Mutation rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.drift_rate >= 0.0 && self.drift_rate <= 1.0,
            "Drift rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.mutation_amount > 0.0,
            "Mutation amount must be positive"
        );
        anyhow::ensure!(self.drift_amount > 0.0, "Drift amount must be positive");
        anyhow::ensure!(
            self.tournament_size >= 1 && self.tournament_size <= self.population_size,
            "Tournament size must be in [1, population_size]"
        );
        Ok(())
    }

    fn mutation_params(&self) -> MutationParams {
        MutationParams {
            mutation_rate: self.mutation_rate,
            mutation_amount: self.mutation_amount,
            drift_rate: self.drift_rate,
            drift_amount: self.drift_amount,
        }
    }
}

/// Per-generation reporting line.
#[derive(Clone, Copy, Debug)]
pub struct GenerationStats {
    pub generation: u32,
    pub best: f64,
    pub mean: f64,
    pub score: u32,
    pub ticks: u64,
}

/// The current generation of controllers and their fitness accumulators.
pub struct Population {
    pub brains: Vec<Brain>,
    pub fitness: Vec<f64>,
    pub generation: u32,
}

impl Population {
    pub fn new(config: &EvolutionConfig, rng: &mut impl Rng) -> Self {
        let brains = (0..config.population_size)
            .map(|_| Brain::new_random_with_rng(rng))
            .collect();
        Self {
            brains,
            fitness: vec![0.0; config.population_size],
            generation: 0,
        }
    }

    /// Zeroes the accumulators and runs one episode over the whole
    /// population.
    pub fn evaluate(
        &mut self,
        sim: &mut Simulator,
        cancel: &CancelToken,
        paced: bool,
    ) -> Result<EpisodeSummary, SimError> {
        for f in self.fitness.iter_mut() {
            *f = 0.0;
        }
        if paced {
            sim.run_episode_paced(&self.brains, &mut self.fitness, self.generation, cancel)
        } else {
            sim.run_episode(&self.brains, &mut self.fitness, self.generation, cancel)
        }
    }

    pub fn stats(&self, summary: &EpisodeSummary) -> GenerationStats {
        let best = self.fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = self.fitness.iter().sum::<f64>() / self.fitness.len().max(1) as f64;
        GenerationStats {
            generation: self.generation,
            best,
            mean,
            score: summary.score,
            ticks: summary.ticks,
        }
    }

    pub fn best_index(&self) -> usize {
        let mut best = 0;
        for (i, f) in self.fitness.iter().enumerate() {
            if *f > self.fitness[best] {
                best = i;
            }
        }
        best
    }

    /// Breeds the next generation: elites survive unchanged, the rest are
    /// tournament-selected crossover children with mutation.
    pub fn next_generation(&mut self, config: &EvolutionConfig, rng: &mut impl Rng) {
        let n = self.brains.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            self.fitness[b]
                .partial_cmp(&self.fitness[a])
                .unwrap_or(Ordering::Equal)
        });

        let params = config.mutation_params();
        let mut next = Vec::with_capacity(n);
        for &i in order.iter().take(config.elite_count.min(n)) {
            next.push(self.brains[i].clone());
        }
        while next.len() < n {
            let p1 = self.tournament(config, rng);
            let p2 = self.tournament(config, rng);
            let mut child = Brain::crossover(&self.brains[p1], &self.brains[p2], rng);
            child.mutate(&params, rng);
            next.push(child);
        }

        self.brains = next;
        self.fitness = vec![0.0; n];
        self.generation += 1;
    }

    fn tournament(&self, config: &EvolutionConfig, rng: &mut impl Rng) -> usize {
        let n = self.brains.len();
        let mut best = rng.gen_range(0..n);
        for _ in 1..config.tournament_size {
            let challenger = rng.gen_range(0..n);
            if self.fitness[challenger] > self.fitness[best] {
                best = challenger;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_default_evolution_config_validates() {
        assert!(EvolutionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_elite_count_must_leave_offspring_room() {
        let config = EvolutionConfig {
            population_size: 4,
            elite_count: 4,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tournament_size_bounded_by_population() {
        let config = EvolutionConfig {
            population_size: 4,
            tournament_size: 5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_population_size_preserved_across_generations() {
        let config = EvolutionConfig {
            population_size: 12,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut population = Population::new(&config, &mut rng);

        for _ in 0..5 {
            for (i, f) in population.fitness.iter_mut().enumerate() {
                *f = i as f64;
            }
            population.next_generation(&config, &mut rng);
            assert_eq!(population.brains.len(), 12);
            assert_eq!(population.fitness.len(), 12);
        }
        assert_eq!(population.generation, 5);
    }

    #[test]
    fn test_elites_survive_unchanged() {
        let config = EvolutionConfig {
            population_size: 8,
            elite_count: 2,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut population = Population::new(&config, &mut rng);

        for (i, f) in population.fitness.iter_mut().enumerate() {
            *f = i as f64;
        }
        let best = population.brains[7].clone();
        let second = population.brains[6].clone();

        population.next_generation(&config, &mut rng);
        assert_eq!(population.brains[0].weights_ih, best.weights_ih);
        assert_eq!(population.brains[1].weights_ih, second.weights_ih);
    }

    #[test]
    fn test_fitness_resets_after_breeding() {
        let config = EvolutionConfig {
            population_size: 6,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut population = Population::new(&config, &mut rng);
        population.fitness.iter_mut().for_each(|f| *f = 4.2);

        population.next_generation(&config, &mut rng);
        assert!(population.fitness.iter().all(|f| *f == 0.0));
    }

    #[test]
    fn test_best_index_tracks_highest_fitness() {
        let config = EvolutionConfig {
            population_size: 5,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let mut population = Population::new(&config, &mut rng);
        population.fitness = vec![0.4, 7.3, -0.9, 7.2, 1.0];
        assert_eq!(population.best_index(), 1);
    }
}
