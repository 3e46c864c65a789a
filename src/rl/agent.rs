//! Per-link tabular agents and the four value-update rules.
//!
//! Each link gets one independent agent that only ever sees its own reward
//! component. The update rule is selected once at construction from the
//! request's algorithm identifier; the training loop itself is rule-agnostic.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::Rng;

use super::table::ValueTable;
use crate::error::BeamError;

/// The tabular value-update rule an agent applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateRule {
    /// Off-policy: bootstraps from the max over next-state actions.
    QLearning,
    /// On-policy: bootstraps from the action actually chosen next.
    Sarsa,
    /// Two tables updated at random, each evaluated by the other; reduces
    /// the overestimation bias of the off-policy max.
    DoubleQ,
    /// Bootstraps from the ε-greedy expectation over next-state actions.
    ExpectedSarsa,
}

impl UpdateRule {
    /// All rules, in the order of the published selector set.
    pub fn all() -> [UpdateRule; 4] {
        [
            UpdateRule::QLearning,
            UpdateRule::Sarsa,
            UpdateRule::DoubleQ,
            UpdateRule::ExpectedSarsa,
        ]
    }

    /// The wire identifier for this rule.
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateRule::QLearning => "q_learning",
            UpdateRule::Sarsa => "sarsa",
            UpdateRule::DoubleQ => "double_q",
            UpdateRule::ExpectedSarsa => "expected_sarsa",
        }
    }
}

impl fmt::Display for UpdateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateRule {
    type Err = BeamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "q_learning" => Ok(UpdateRule::QLearning),
            "sarsa" => Ok(UpdateRule::Sarsa),
            "double_q" => Ok(UpdateRule::DoubleQ),
            "expected_sarsa" => Ok(UpdateRule::ExpectedSarsa),
            other => Err(BeamError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Rule-specific table storage.
///
/// Double Q-learning owns both tables inside its variant, so the twin-table
/// invariant cannot be violated from outside.
#[derive(Debug, Clone)]
enum Kind {
    QLearning(ValueTable),
    Sarsa(ValueTable),
    DoubleQ(ValueTable, ValueTable),
    ExpectedSarsa(ValueTable),
}

/// A tabular ε-greedy agent for a single link.
#[derive(Debug, Clone)]
pub struct LinkAgent {
    alpha: f64,
    gamma: f64,
    kind: Kind,
}

impl LinkAgent {
    /// Creates an agent with zero-initialized tables.
    pub fn new(rule: UpdateRule, alpha: f64, gamma: f64, n_states: usize, n_actions: usize) -> Self {
        let kind = match rule {
            UpdateRule::QLearning => Kind::QLearning(ValueTable::zeros(n_states, n_actions)),
            UpdateRule::Sarsa => Kind::Sarsa(ValueTable::zeros(n_states, n_actions)),
            UpdateRule::DoubleQ => Kind::DoubleQ(
                ValueTable::zeros(n_states, n_actions),
                ValueTable::zeros(n_states, n_actions),
            ),
            UpdateRule::ExpectedSarsa => Kind::ExpectedSarsa(ValueTable::zeros(n_states, n_actions)),
        };
        Self { alpha, gamma, kind }
    }

    /// The update rule this agent was constructed with.
    pub fn rule(&self) -> UpdateRule {
        match self.kind {
            Kind::QLearning(_) => UpdateRule::QLearning,
            Kind::Sarsa(_) => UpdateRule::Sarsa,
            Kind::DoubleQ(..) => UpdateRule::DoubleQ,
            Kind::ExpectedSarsa(_) => UpdateRule::ExpectedSarsa,
        }
    }

    /// Number of actions in the agent's table.
    pub fn n_actions(&self) -> usize {
        match &self.kind {
            Kind::QLearning(t) | Kind::Sarsa(t) | Kind::ExpectedSarsa(t) => t.n_actions(),
            Kind::DoubleQ(a, _) => a.n_actions(),
        }
    }

    /// ε-greedy action selection.
    ///
    /// With probability `epsilon` picks uniformly among all actions,
    /// otherwise picks the greedy action for `state`.
    pub fn select_action(&self, state: usize, epsilon: f64, rng: &mut StdRng) -> usize {
        if rng.gen::<f64>() < epsilon {
            rng.gen_range(0..self.n_actions())
        } else {
            self.greedy_action(state)
        }
    }

    /// The argmax action for `state` (ε = 0), ties broken toward the lowest
    /// index. Double Q-learning ranks actions by the sum of both tables.
    pub fn greedy_action(&self, state: usize) -> usize {
        match &self.kind {
            Kind::QLearning(t) | Kind::Sarsa(t) | Kind::ExpectedSarsa(t) => t.argmax(state),
            Kind::DoubleQ(a, b) => {
                let row_a = a.row(state);
                let row_b = b.row(state);
                let mut best = 0;
                let mut best_value = row_a[0] + row_b[0];
                for i in 1..row_a.len() {
                    let v = row_a[i] + row_b[i];
                    if v > best_value {
                        best = i;
                        best_value = v;
                    }
                }
                best
            }
        }
    }

    /// Current value estimate for `(state, action)`.
    ///
    /// Double Q-learning reports the average of its two tables, which is
    /// what its greedy extraction ranks by.
    pub fn value(&self, state: usize, action: usize) -> f64 {
        match &self.kind {
            Kind::QLearning(t) | Kind::Sarsa(t) | Kind::ExpectedSarsa(t) => t.get(state, action),
            Kind::DoubleQ(a, b) => (a.get(state, action) + b.get(state, action)) / 2.0,
        }
    }

    /// Applies one rule-specific value update.
    ///
    /// `next_action` is the action the behavior policy takes in `next_state`;
    /// only the on-policy rule reads it. `epsilon` is the current exploration
    /// rate; only the expectation-based rule reads it. The formulas keep the
    /// `next_state` bootstrap general even though the beam environment has a
    /// single constant state.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        state: usize,
        action: usize,
        reward: f64,
        next_state: usize,
        next_action: usize,
        epsilon: f64,
        rng: &mut StdRng,
    ) {
        let (alpha, gamma) = (self.alpha, self.gamma);
        match &mut self.kind {
            Kind::QLearning(t) => {
                let target = reward + gamma * t.max(next_state);
                Self::apply(t, state, action, alpha, target);
            }
            Kind::Sarsa(t) => {
                let target = reward + gamma * t.get(next_state, next_action);
                Self::apply(t, state, action, alpha, target);
            }
            Kind::ExpectedSarsa(t) => {
                let target = reward + gamma * Self::expected_value(t, next_state, epsilon);
                Self::apply(t, state, action, alpha, target);
            }
            Kind::DoubleQ(a, b) => {
                if rng.gen_bool(0.5) {
                    Self::double_update(a, b, state, action, reward, next_state, alpha, gamma);
                } else {
                    Self::double_update(b, a, state, action, reward, next_state, alpha, gamma);
                }
            }
        }
    }

    /// One half of the double-table step: the coin-selected table picks the
    /// greedy next action, the other table supplies its value.
    #[allow(clippy::too_many_arguments)]
    fn double_update(
        updated: &mut ValueTable,
        evaluator: &ValueTable,
        state: usize,
        action: usize,
        reward: f64,
        next_state: usize,
        alpha: f64,
        gamma: f64,
    ) {
        let best = updated.argmax(next_state);
        let target = reward + gamma * evaluator.get(next_state, best);
        Self::apply(updated, state, action, alpha, target);
    }

    fn apply(table: &mut ValueTable, state: usize, action: usize, alpha: f64, target: f64) {
        let current = table.get(state, action);
        table.set(state, action, current + alpha * (target - current));
    }

    /// Expectation of the next-state value under the current ε-greedy policy:
    /// `(1 − ε) · max + ε · mean`.
    fn expected_value(table: &ValueTable, state: usize, epsilon: f64) -> f64 {
        let row = table.row(state);
        let mean = row.iter().sum::<f64>() / row.len() as f64;
        (1.0 - epsilon) * table.max(state) + epsilon * mean
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const S: usize = 0;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    #[test]
    fn selector_strings_round_trip() {
        for rule in UpdateRule::all() {
            assert_eq!(rule.as_str().parse::<UpdateRule>().unwrap(), rule);
        }
    }

    #[test]
    fn unknown_selector_rejected() {
        let err = "dqn".parse::<UpdateRule>().unwrap_err();
        assert_eq!(err, BeamError::UnknownAlgorithm("dqn".to_string()));
    }

    #[test]
    fn fresh_agent_greedy_action_is_first_index() {
        for rule in UpdateRule::all() {
            let agent = LinkAgent::new(rule, 0.1, 0.9, 1, 8);
            assert_eq!(agent.greedy_action(S), 0, "{rule}");
        }
    }

    #[test]
    fn zero_epsilon_always_selects_greedy() {
        let mut r = rng();
        let mut agent = LinkAgent::new(UpdateRule::QLearning, 1.0, 0.0, 1, 6);
        agent.update(S, 4, 10.0, S, 0, 0.0, &mut r);
        for _ in 0..50 {
            assert_eq!(agent.select_action(S, 0.0, &mut r), 4);
        }
    }

    #[test]
    fn full_epsilon_stays_in_range() {
        let mut r = rng();
        let agent = LinkAgent::new(UpdateRule::Sarsa, 0.1, 0.9, 1, 6);
        for _ in 0..200 {
            assert!(agent.select_action(S, 1.0, &mut r) < 6);
        }
    }

    #[test]
    fn q_learning_update_moves_toward_target() {
        let mut r = rng();
        let mut agent = LinkAgent::new(UpdateRule::QLearning, 0.5, 0.0, 1, 4);
        agent.update(S, 2, 8.0, S, 0, 0.0, &mut r);
        assert!((agent.value(S, 2) - 4.0).abs() < 1e-12);
        // Second update halves the remaining distance to the reward.
        agent.update(S, 2, 8.0, S, 0, 0.0, &mut r);
        assert!((agent.value(S, 2) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn q_learning_bootstraps_from_max() {
        let mut r = rng();
        let mut agent = LinkAgent::new(UpdateRule::QLearning, 1.0, 0.5, 1, 4);
        agent.update(S, 1, 10.0, S, 0, 0.0, &mut r); // Q(1) = 10, the max
        agent.update(S, 0, 0.0, S, 3, 0.0, &mut r); // target = 0 + 0.5 · 10
        assert!((agent.value(S, 0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn sarsa_bootstraps_from_next_action() {
        let mut r = rng();
        let mut agent = LinkAgent::new(UpdateRule::Sarsa, 1.0, 1.0, 1, 4);
        agent.update(S, 1, 6.0, S, 0, 0.0, &mut r); // Q(1) = 6
        // Bootstraps from Q(next_action = 3) = 0, not from the max.
        agent.update(S, 0, 0.0, S, 3, 0.0, &mut r);
        assert_eq!(agent.value(S, 0), 0.0);
        // Now bootstrap from the action actually pointing at the value.
        agent.update(S, 2, 0.0, S, 1, 0.0, &mut r);
        assert!((agent.value(S, 2) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn expected_sarsa_with_zero_epsilon_matches_q_learning() {
        let mut r = rng();
        let mut expected = LinkAgent::new(UpdateRule::ExpectedSarsa, 0.3, 0.9, 1, 5);
        let mut off_policy = LinkAgent::new(UpdateRule::QLearning, 0.3, 0.9, 1, 5);
        for (action, reward) in [(0, 2.0), (3, 7.0), (3, 6.5), (1, 1.0), (3, 7.2)] {
            expected.update(S, action, reward, S, 0, 0.0, &mut r);
            off_policy.update(S, action, reward, S, 0, 0.0, &mut r);
        }
        for a in 0..5 {
            assert!((expected.value(S, a) - off_policy.value(S, a)).abs() < 1e-12);
        }
    }

    #[test]
    fn expected_sarsa_with_full_epsilon_uses_mean() {
        let mut r = rng();
        let mut agent = LinkAgent::new(UpdateRule::ExpectedSarsa, 1.0, 1.0, 1, 2);
        agent.update(S, 0, 4.0, S, 0, 1.0, &mut r); // Q = [4, 0]
        // target = 0 + 1.0 · mean([4, 0]) = 2
        agent.update(S, 1, 0.0, S, 0, 1.0, &mut r);
        assert!((agent.value(S, 1) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn double_q_updates_exactly_one_table() {
        let mut r = rng();
        let mut agent = LinkAgent::new(UpdateRule::DoubleQ, 1.0, 0.0, 1, 3);
        agent.update(S, 1, 4.0, S, 0, 0.0, &mut r);
        // Whichever table the coin picked, the reported average is half.
        assert!((agent.value(S, 1) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn double_q_does_not_overestimate_relative_to_q_learning() {
        // Zero-mean noisy rewards: the off-policy max accumulates positive
        // bias through its bootstrap, the cross-evaluated twin tables do not.
        let n_actions = 4;
        let trials = 60;
        let mut r = StdRng::seed_from_u64(2024);
        let mut q_sum = 0.0;
        let mut d_sum = 0.0;
        for _ in 0..trials {
            let mut q = LinkAgent::new(UpdateRule::QLearning, 0.5, 0.9, 1, n_actions);
            let mut d = LinkAgent::new(UpdateRule::DoubleQ, 0.5, 0.9, 1, n_actions);
            for _ in 0..150 {
                let action = r.gen_range(0..n_actions);
                let reward: f64 = r.gen_range(-1.0..1.0);
                q.update(S, action, reward, S, 0, 0.0, &mut r);
                d.update(S, action, reward, S, 0, 0.0, &mut r);
            }
            q_sum += q.value(S, q.greedy_action(S));
            d_sum += d.value(S, d.greedy_action(S));
        }
        assert!(
            d_sum / trials as f64 <= q_sum / trials as f64,
            "double-table estimate exceeded the off-policy estimate"
        );
    }
}
