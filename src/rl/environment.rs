//! Multi-link beam environment.
//!
//! Wraps the channel model behind an evaluate contract: one joint action in,
//! one reward per link out. The environment carries no episode state, since
//! each link's reward depends only on the current joint action; beam
//! selection is a repeated stochastic game rather than a sequential-decision
//! problem.
//! Agents still address their tables through an explicit state slot
//! ([`BeamEnvironment::STATE`]) so the same structure supports multi-state
//! extensions such as mobility.

use super::action::ActionSpace;
use crate::channel::ChannelParams;
use crate::error::BeamError;
use crate::geometry::Link;

/// A joint assignment of one action index per link.
pub type JointAction = Vec<usize>;

/// The multi-link beam environment.
///
/// # Lifecycle
///
/// 1. Built once per optimize request from the request's link geometry.
/// 2. [`BeamEnvironment::evaluate`] is called once per training episode and
///    once more at extraction; every call is independent, with no hidden
///    mutation between calls.
/// 3. Dropped with the request; nothing is persisted.
#[derive(Debug, Clone)]
pub struct BeamEnvironment {
    links: Vec<Link>,
    params: ChannelParams,
    actions: ActionSpace,
}

impl BeamEnvironment {
    /// The single constant state index shared by all agents.
    pub const STATE: usize = 0;
    /// Size of the state set.
    pub const N_STATES: usize = 1;

    /// Creates an environment, validating the geometry up front.
    ///
    /// Degenerate links (coincident transmitter and receiver) are rejected
    /// here so the channel model never sees an undefined bearing.
    pub fn new(
        links: Vec<Link>,
        params: ChannelParams,
        n_actions: usize,
    ) -> Result<Self, BeamError> {
        if links.is_empty() {
            return Err(BeamError::EmptyLinkSet);
        }
        for (i, link) in links.iter().enumerate() {
            if link.is_degenerate() {
                return Err(BeamError::DegenerateLink(i));
            }
        }
        Ok(Self {
            links,
            params,
            actions: ActionSpace::new(n_actions),
        })
    }

    /// Number of links (and therefore agents).
    pub fn n_links(&self) -> usize {
        self.links.len()
    }

    /// The link geometries, in request order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// The action space shared by every link's agent.
    pub fn actions(&self) -> &ActionSpace {
        &self.actions
    }

    /// Evaluates a joint action, returning one capacity (Gbps) per link.
    ///
    /// Guards the invariant that every reachable joint action yields finite
    /// rewards; a non-finite capacity is surfaced as an error rather than
    /// leaking into the value tables.
    ///
    /// # Panics
    ///
    /// Panics if `joint.len()` does not match the number of links.
    pub fn evaluate(&self, joint: &[usize]) -> Result<Vec<f64>, BeamError> {
        assert_eq!(
            joint.len(),
            self.links.len(),
            "joint action must carry one action per link"
        );
        let azimuths: Vec<f64> = joint.iter().map(|&a| self.actions.azimuth_deg(a)).collect();
        let capacities = self.params.capacities(&self.links, &azimuths);
        if let Some(i) = capacities.iter().position(|c| !c.is_finite()) {
            return Err(BeamError::NonFiniteCapacity(i));
        }
        Ok(capacities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;

    fn east_link() -> Link {
        Link::new(Position::new(0.0, 0.0), Position::new(100.0, 0.0))
    }

    #[test]
    fn empty_link_set_rejected() {
        let err = BeamEnvironment::new(vec![], ChannelParams::default(), 36).unwrap_err();
        assert_eq!(err, BeamError::EmptyLinkSet);
    }

    #[test]
    fn degenerate_link_rejected_with_index() {
        let p = Position::new(3.0, 4.0);
        let links = vec![east_link(), Link::new(p, p)];
        let err = BeamEnvironment::new(links, ChannelParams::default(), 36).unwrap_err();
        assert_eq!(err, BeamError::DegenerateLink(1));
    }

    #[test]
    fn evaluate_returns_one_reward_per_link() {
        let links = vec![
            east_link(),
            Link::new(Position::new(0.0, 75.0), Position::new(100.0, 75.0)),
        ];
        let env = BeamEnvironment::new(links, ChannelParams::default(), 36).unwrap();
        let rewards = env.evaluate(&[18, 18]).unwrap();
        assert_eq!(rewards.len(), 2);
        assert!(rewards.iter().all(|r| r.is_finite()));
    }

    #[test]
    fn evaluate_is_stateless_across_calls() {
        let env = BeamEnvironment::new(vec![east_link()], ChannelParams::default(), 36).unwrap();
        let first = env.evaluate(&[5]).unwrap();
        for _ in 0..10 {
            env.evaluate(&[20]).unwrap();
        }
        assert_eq!(env.evaluate(&[5]).unwrap(), first);
    }

    #[test]
    fn best_action_index_matches_bearing() {
        // Action 18 of 36 is azimuth 0°, the true bearing of the east link.
        let env = BeamEnvironment::new(vec![east_link()], ChannelParams::default(), 36).unwrap();
        assert_eq!(env.actions().azimuth_deg(18), 0.0);
        let best = (0..36)
            .max_by(|&a, &b| {
                let ca = env.evaluate(&[a]).unwrap()[0];
                let cb = env.evaluate(&[b]).unwrap()[0];
                ca.partial_cmp(&cb).unwrap()
            })
            .unwrap();
        assert_eq!(best, 18);
    }

    #[test]
    #[should_panic(expected = "one action per link")]
    fn mismatched_joint_action_panics() {
        let env = BeamEnvironment::new(vec![east_link()], ChannelParams::default(), 36).unwrap();
        let _ = env.evaluate(&[0, 1]);
    }
}
