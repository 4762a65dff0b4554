//! Fixed-topology feedforward controller evolved by the genetic loop.

use aviary_core::Controller;
use rand::Rng;
use serde::{Deserialize, Serialize};

const INPUTS: usize = 3;
const HIDDEN: usize = 6;
const OUTPUTS: usize = 1;

/// Weight magnitude bound kept through mutation.
const WEIGHT_CLAMP: f32 = 2.0;

/// Neural network brain with 3 inputs -> 6 hidden -> 1 output
///
/// Inputs:
/// 0. Agent vertical position
/// 1. Vertical distance to the active gap's top reference height
/// 2. Vertical distance to the active gap's bottom barrier
///
/// Output:
/// 0. Jump intent (-1 to 1); the simulation jumps above 0.5
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Brain {
    pub weights_ih: Vec<f32>, // 3 inputs -> 6 hidden (18 weights)
    pub weights_ho: Vec<f32>, // 6 hidden -> 1 output (6 weights)
    pub bias_h: Vec<f32>,     // 6 hidden biases
    pub bias_o: Vec<f32>,     // 1 output bias
}

/// Mutation knobs shared with [`crate::evolution::EvolutionConfig`].
pub struct MutationParams {
    pub mutation_rate: f32,
    pub mutation_amount: f32,
    pub drift_rate: f32,
    pub drift_amount: f32,
}

impl Brain {
    pub fn new_random_with_rng(rng: &mut impl Rng) -> Self {
        let weights_ih: Vec<f32> = (0..INPUTS * HIDDEN)
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect();
        let weights_ho: Vec<f32> = (0..HIDDEN * OUTPUTS)
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect();
        let bias_h: Vec<f32> = (0..HIDDEN).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let bias_o: Vec<f32> = (0..OUTPUTS).map(|_| rng.gen_range(-1.0..1.0)).collect();

        Self {
            weights_ih,
            weights_ho,
            bias_h,
            bias_o,
        }
    }

    pub fn forward(&self, inputs: [f32; INPUTS]) -> f32 {
        // Input to Hidden (3 inputs -> 6 hidden)
        let mut hidden = [0.0f32; HIDDEN];
        for (i, h) in hidden.iter_mut().enumerate() {
            let mut sum = self.bias_h[i];
            for (j, &input) in inputs.iter().enumerate() {
                sum += input * self.weights_ih[j * HIDDEN + i];
            }
            *h = sum.tanh();
        }

        // Hidden to Output (6 hidden -> 1 output)
        let mut sum = self.bias_o[0];
        for (j, &h) in hidden.iter().enumerate() {
            sum += h * self.weights_ho[j * OUTPUTS];
        }
        sum.tanh()
    }

    pub fn mutate(&mut self, params: &MutationParams, rng: &mut impl Rng) {
        fn mutate_val(v: &mut f32, params: &MutationParams, rng: &mut impl Rng) {
            let r: f32 = rng.gen();
            if r < params.drift_rate {
                *v += rng.gen_range(-params.drift_amount..params.drift_amount);
            } else if r < params.mutation_rate {
                *v += rng.gen_range(-params.mutation_amount..params.mutation_amount);
            }
            *v = v.clamp(-WEIGHT_CLAMP, WEIGHT_CLAMP);
        }

        for w in self.weights_ih.iter_mut() {
            mutate_val(w, params, rng);
        }
        for w in self.weights_ho.iter_mut() {
            mutate_val(w, params, rng);
        }
        for b in self.bias_h.iter_mut() {
            mutate_val(b, params, rng);
        }
        for b in self.bias_o.iter_mut() {
            mutate_val(b, params, rng);
        }
    }

    pub fn crossover(parent1: &Brain, parent2: &Brain, rng: &mut impl Rng) -> Self {
        let mut child = parent1.clone();

        // Uniformly pick weights from either parent
        for i in 0..child.weights_ih.len() {
            if rng.gen_bool(0.5) {
                child.weights_ih[i] = parent2.weights_ih[i];
            }
        }
        for i in 0..child.weights_ho.len() {
            if rng.gen_bool(0.5) {
                child.weights_ho[i] = parent2.weights_ho[i];
            }
        }
        for i in 0..child.bias_h.len() {
            if rng.gen_bool(0.5) {
                child.bias_h[i] = parent2.bias_h[i];
            }
        }
        for i in 0..child.bias_o.len() {
            if rng.gen_bool(0.5) {
                child.bias_o[i] = parent2.bias_o[i];
            }
        }
        child
    }
}

impl Controller for Brain {
    fn decide(&self, inputs: [f32; 3]) -> f32 {
        self.forward(inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_params() -> MutationParams {
        MutationParams {
            mutation_rate: 1.0,
            mutation_amount: 0.5,
            drift_rate: 0.5,
            drift_amount: 0.1,
        }
    }

    #[test]
    fn test_brain_new_random_has_correct_dimensions() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let brain = Brain::new_random_with_rng(&mut rng);
        assert_eq!(
            brain.weights_ih.len(),
            18,
            "Should have 3x6=18 input-hidden weights"
        );
        assert_eq!(
            brain.weights_ho.len(),
            6,
            "Should have 6x1=6 hidden-output weights"
        );
        assert_eq!(brain.bias_h.len(), 6, "Should have 6 hidden biases");
        assert_eq!(brain.bias_o.len(), 1, "Should have 1 output bias");
    }

    #[test]
    fn test_brain_forward_is_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let brain = Brain::new_random_with_rng(&mut rng);
        let inputs = [350.0, 50.0, 200.0];

        assert_eq!(brain.forward(inputs), brain.forward(inputs));
    }

    #[test]
    fn test_brain_forward_output_in_tanh_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let brain = Brain::new_random_with_rng(&mut rng);

        for inputs in [[0.0, 0.0, 0.0], [730.0, 680.0, 680.0], [-5.0, 5.0, 705.0]] {
            let out = brain.forward(inputs);
            assert!(
                (-1.0..=1.0).contains(&out),
                "Output should be in [-1, 1], got {}",
                out
            );
        }
    }

    #[test]
    fn test_brain_mutate_keeps_weights_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut brain = Brain::new_random_with_rng(&mut rng);
        let params = test_params();

        for _ in 0..100 {
            brain.mutate(&params, &mut rng);
        }

        for w in brain.weights_ih.iter().chain(&brain.weights_ho) {
            assert!(
                (-WEIGHT_CLAMP..=WEIGHT_CLAMP).contains(w),
                "Weight should be clamped to [-2, 2]"
            );
        }
    }

    #[test]
    fn test_brain_crossover_produces_valid_child() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let parent1 = Brain::new_random_with_rng(&mut rng);
        let parent2 = Brain::new_random_with_rng(&mut rng);

        let child = Brain::crossover(&parent1, &parent2, &mut rng);

        assert_eq!(child.weights_ih.len(), 18);
        assert_eq!(child.weights_ho.len(), 6);
        for i in 0..child.weights_ih.len() {
            assert!(
                child.weights_ih[i] == parent1.weights_ih[i]
                    || child.weights_ih[i] == parent2.weights_ih[i],
                "Child weight should come from a parent"
            );
        }
    }

    #[test]
    fn test_brain_json_roundtrip() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let original = Brain::new_random_with_rng(&mut rng);
        let json = serde_json::to_string(&original).expect("Should serialize");
        let restored: Brain = serde_json::from_str(&json).expect("Should deserialize");

        assert_eq!(original.weights_ih, restored.weights_ih);
        assert_eq!(original.weights_ho, restored.weights_ho);
        assert_eq!(original.bias_h, restored.bias_h);
        assert_eq!(original.bias_o, restored.bias_o);
    }
}
