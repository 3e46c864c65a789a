//! Training orchestration: one independent agent per link.
//!
//! Runs the per-request state machine: Init (agents built, tables zeroed) →
//! Training (E episodes of joint-action sampling, one environment evaluation,
//! per-agent updates, ε decay) → Extraction (greedy joint action, one final
//! evaluation). Episodes are inherently sequential: every link's reward
//! depends on every other link's action in the same episode.
//!
//! The agents are independent learners: each sees only its own reward while
//! the other agents' policies shift underneath it. That non-stationarity has
//! no general convergence guarantee and is accepted as-is for the bounded,
//! discretized action space.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use super::agent::{LinkAgent, UpdateRule};
use super::config::TrainingConfig;
use super::environment::{BeamEnvironment, JointAction};
use crate::error::BeamError;

/// Episodes between progress log lines.
const PROGRESS_LOG_INTERVAL: usize = 200;

/// Final outcome of a training run.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// Greedy azimuth per link, degrees, in request order.
    pub azimuths_deg: Vec<f64>,
    /// Capacity per link (Gbps) at the greedy joint action.
    pub capacities: Vec<f64>,
    /// Sum of per-link capacities.
    pub total_capacity: f64,
    /// Episodes executed.
    pub episodes: usize,
}

/// Drives one training run over a [`BeamEnvironment`].
pub struct Trainer {
    env: BeamEnvironment,
    agents: Vec<LinkAgent>,
    config: TrainingConfig,
    rng: StdRng,
}

impl Trainer {
    /// Builds one agent per link, all tables zero-initialized.
    pub fn new(
        env: BeamEnvironment,
        rule: UpdateRule,
        config: TrainingConfig,
    ) -> Result<Self, BeamError> {
        config.validate()?;
        let agents = (0..env.n_links())
            .map(|_| {
                LinkAgent::new(
                    rule,
                    config.learning_rate,
                    config.discount,
                    BeamEnvironment::N_STATES,
                    env.actions().len(),
                )
            })
            .collect();
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            env,
            agents,
            config,
            rng,
        })
    }

    /// Read access to the agents (used by evaluation and tests).
    pub fn agents(&self) -> &[LinkAgent] {
        &self.agents
    }

    /// Runs the full episode budget and extracts the greedy result.
    ///
    /// No partial results: either every episode completes and the greedy
    /// joint action is re-evaluated, or the first error aborts the run.
    pub fn run(&mut self) -> Result<TrainingOutcome, BeamError> {
        let state = BeamEnvironment::STATE;

        for episode in 0..self.config.episodes {
            let epsilon = self.config.epsilon_at(episode);

            let rng = &mut self.rng;
            let joint: JointAction = self
                .agents
                .iter()
                .map(|agent| agent.select_action(state, epsilon, rng))
                .collect();

            let rewards = self.env.evaluate(&joint)?;

            for (i, agent) in self.agents.iter_mut().enumerate() {
                // The state never transitions, but the on-policy rule still
                // needs the action the behavior policy would take next.
                let next_action = agent.select_action(state, epsilon, &mut self.rng);
                agent.update(
                    state,
                    joint[i],
                    rewards[i],
                    state,
                    next_action,
                    epsilon,
                    &mut self.rng,
                );
            }

            if (episode + 1) % PROGRESS_LOG_INTERVAL == 0 {
                debug!(
                    episode = episode + 1,
                    total = self.config.episodes,
                    epsilon,
                    "training progress"
                );
            }
        }

        let greedy: JointAction = self
            .agents
            .iter()
            .map(|agent| agent.greedy_action(state))
            .collect();
        let capacities = self.env.evaluate(&greedy)?;
        let azimuths_deg = greedy
            .iter()
            .map(|&a| self.env.actions().azimuth_deg(a))
            .collect();
        let total_capacity = capacities.iter().sum();

        Ok(TrainingOutcome {
            azimuths_deg,
            capacities,
            total_capacity,
            episodes: self.config.episodes,
        })
    }
}
