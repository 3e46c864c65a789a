//! beamlink - transmit-beam azimuth selection for co-existing wireless links
//! via tabular reinforcement learning.
//!
//! One optimize request carries a set of transmitter/receiver pairs and an
//! algorithm selector. The crate builds a multi-link beam environment over a
//! deterministic physical channel model (directional gain, path loss,
//! interference, Shannon capacity), trains one independent tabular agent per
//! link for a bounded number of episodes, and reports the greedy azimuth and
//! capacity per link. Nothing learned survives the request.

pub mod api;
pub mod channel;
pub mod error;
pub mod geometry;
pub mod optimizer;
pub mod rl;

pub use api::{OptimizeRequest, OptimizeResponse};
pub use error::BeamError;
pub use optimizer::{optimize, optimize_with};

/// Identifier type used for optimize requests.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
