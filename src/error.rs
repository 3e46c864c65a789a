//! Error taxonomy for the optimize pipeline.
//!
//! Everything here is detected inside the core and converted to a structured
//! failure response at the optimizer boundary; nothing escapes to the caller
//! as a raw fault.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BeamError {
    #[error("link {0} is degenerate: transmitter and receiver coincide")]
    DegenerateLink(usize),

    #[error("at least one link is required")]
    EmptyLinkSet,

    #[error("unknown algorithm type: {0}")]
    UnknownAlgorithm(String),

    #[error("channel model produced a non-finite capacity for link {0}")]
    NonFiniteCapacity(usize),

    #[error("invalid training config: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_link_display() {
        let e = BeamError::DegenerateLink(1);
        assert_eq!(
            e.to_string(),
            "link 1 is degenerate: transmitter and receiver coincide"
        );
    }

    #[test]
    fn unknown_algorithm_display() {
        let e = BeamError::UnknownAlgorithm("dqn".to_string());
        assert_eq!(e.to_string(), "unknown algorithm type: dqn");
    }

    #[test]
    fn empty_link_set_display() {
        assert_eq!(
            BeamError::EmptyLinkSet.to_string(),
            "at least one link is required"
        );
    }

    #[test]
    fn error_equality() {
        assert_eq!(BeamError::EmptyLinkSet, BeamError::EmptyLinkSet);
        assert_ne!(
            BeamError::DegenerateLink(0),
            BeamError::DegenerateLink(1)
        );
    }
}
