//! Per-episode world state and the tick algorithm.

use crate::bird::Bird;
use crate::config::SimConfig;
use crate::controller::Controller;
use crate::ground::Ground;
use crate::mask::Mask;
use crate::pipe::Pipe;
use rand_chacha::ChaCha8Rng;

/// Fitness granted to every live agent each tick it survives.
pub const SURVIVAL_REWARD: f64 = 0.1;
/// Fitness taken from an agent that collides with a barrier.
pub const COLLISION_PENALTY: f64 = 1.0;
/// Fitness granted to every live agent when an obstacle is passed.
pub const PASS_BONUS: f64 = 5.0;
/// Controller outputs above this are interpreted as "jump".
pub const JUMP_THRESHOLD: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpisodeState {
    Running,
    Terminated,
}

/// One live agent: its flight body coupled to the population slot it was
/// created from.
///
/// The slot indexes the caller's controller and fitness collections. Because
/// body and slot travel as one unit, removing an agent can never misalign
/// physics, decisions and fitness attribution.
#[derive(Clone, Debug)]
pub struct Agent {
    pub bird: Bird,
    pub slot: usize,
}

/// Episode state: the live agents, the obstacle list, the scrolling ground,
/// and the clearance score.
///
/// At least one pipe is live at all times: the episode starts with one and a
/// replacement spawns whenever one is passed, long before it can expire.
pub struct World {
    config: SimConfig,
    rng: ChaCha8Rng,
    bird_mask: Mask,
    barrier_mask: Mask,
    pub agents: Vec<Agent>,
    pub pipes: Vec<Pipe>,
    pub ground: Ground,
    pub score: u32,
    pub tick: u64,
    state: EpisodeState,
}

impl World {
    /// Creates an episode with `population` agents at the configured start
    /// position and the first obstacle off-screen to the right.
    pub fn new(config: SimConfig, population: usize, mut rng: ChaCha8Rng) -> Self {
        let (start_x, start_y) = config.agent_start;
        let agents = (0..population)
            .map(|slot| Agent {
                bird: Bird::new(start_x, start_y),
                slot,
            })
            .collect();
        let pipes = vec![Pipe::new(config.obstacle_initial_x, &mut rng, &config)];
        let ground = Ground::new(&config);
        let bird_mask = Mask::ellipse(config.bird_width as usize, config.bird_height as usize);
        let barrier_mask = Mask::filled(
            config.barrier_width as usize,
            config.barrier_height as usize,
        );

        Self {
            config,
            rng,
            bird_mask,
            barrier_mask,
            agents,
            pipes,
            ground,
            score: 0,
            tick: 0,
            state: EpisodeState::Running,
        }
    }

    pub fn state(&self) -> EpisodeState {
        self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Advances the episode by one tick.
    ///
    /// `controllers` and `fitness` are the caller's population collections;
    /// every agent's `slot` indexes into both. The live set is compacted once
    /// at the end of the tick from a mark bit array, so iteration within the
    /// tick is never corrupted by removals.
    ///
    /// All agents share one horizontal position, so one "active" obstacle is
    /// selected for every decision this tick. That shared index must be
    /// revisited if agents ever gain individual horizontal motion.
    pub fn step<C: Controller>(&mut self, controllers: &[C], fitness: &mut [f64]) -> EpisodeState {
        debug_assert_eq!(controllers.len(), fitness.len());
        if self.agents.is_empty() {
            self.state = EpisodeState::Terminated;
            return self.state;
        }

        // ACTIVE OBSTACLE: once the population has cleared the first pipe's
        // right edge, decisions target the next one.
        let barrier_w = self.config.barrier_width as f32;
        let lead_x = self.agents[0].bird.x;
        let active = if self.pipes.len() > 1 && lead_x > self.pipes[0].x + barrier_w {
            1
        } else {
            0
        };

        // FLIGHT + DECISIONS
        for agent in &mut self.agents {
            agent.bird.advance(&self.config);
            fitness[agent.slot] += SURVIVAL_REWARD;

            let pipe = &self.pipes[active];
            let inputs = [
                agent.bird.y,
                (agent.bird.y - pipe.gap_y).abs(),
                (agent.bird.y - pipe.bottom).abs(),
            ];
            if controllers[agent.slot].decide(inputs) > JUMP_THRESHOLD {
                agent.bird.impulse(&self.config);
            }
        }

        // COLLISIONS + PASS DETECTION
        let mut dead = vec![false; self.agents.len()];
        let mut spawn_pipe = false;
        {
            let config = &self.config;
            let bird_mask = &self.bird_mask;
            let barrier_mask = &self.barrier_mask;
            for pipe in &mut self.pipes {
                for (i, agent) in self.agents.iter().enumerate() {
                    if !dead[i] && silhouettes_collide(bird_mask, barrier_mask, pipe, &agent.bird)
                    {
                        fitness[agent.slot] -= COLLISION_PENALTY;
                        dead[i] = true;
                    }
                    if !pipe.passed && pipe.x < agent.bird.x {
                        pipe.passed = true;
                        spawn_pipe = true;
                    }
                }
                pipe.advance(config);
            }
        }

        // SCORE + NEXT OBSTACLE: the bonus goes to agents still live this
        // tick; collided ones are already marked.
        if spawn_pipe {
            self.score += 1;
            for (i, agent) in self.agents.iter().enumerate() {
                if !dead[i] {
                    fitness[agent.slot] += PASS_BONUS;
                }
            }
            let pipe = Pipe::new(self.config.obstacle_spawn_x, &mut self.rng, &self.config);
            self.pipes.push(pipe);
        }

        // EXPIRED OBSTACLES
        {
            let config = &self.config;
            self.pipes.retain(|p| !p.expired(config));
        }

        // GROUND AND CEILING BOUNDS
        let bird_h = self.config.bird_height as f32;
        for (i, agent) in self.agents.iter().enumerate() {
            if agent.bird.y + bird_h >= self.config.ground_y || agent.bird.y < 0.0 {
                dead[i] = true;
            }
        }

        // COMPACT THE LIVE SET: one pass removes everything marked above;
        // each agent keeps its slot, so the caller's collections stay
        // aligned.
        let mut idx = 0;
        self.agents.retain(|_| {
            let keep = !dead[idx];
            idx += 1;
            keep
        });

        self.ground.advance(&self.config);
        self.tick += 1;
        self.state
    }
}

/// Pixel-accurate test of one agent against both barriers of a pipe.
///
/// Offsets follow the silhouette contract: barrier position minus agent
/// position, with the vertical component taken against the agent's rounded
/// pixel position.
fn silhouettes_collide(bird_mask: &Mask, barrier_mask: &Mask, pipe: &Pipe, bird: &Bird) -> bool {
    let dx = (pipe.x - bird.x).round() as i32;
    let bird_y = bird.y.round() as i32;
    let top_offset = (dx, pipe.top.round() as i32 - bird_y);
    let bottom_offset = (dx, pipe.bottom.round() as i32 - bird_y);

    bird_mask.overlaps(barrier_mask, top_offset) || bird_mask.overlaps(barrier_mask, bottom_offset)
}
