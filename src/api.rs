//! Request/response types for the optimize boundary.
//!
//! Field names match the published JSON contract exactly; the transport
//! layer (HTTP, tests, tooling) moves these types verbatim.

use serde::{Deserialize, Serialize};

use crate::geometry::Position;

/// One link's geometry as submitted by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSpec {
    pub tx_position: Position,
    pub rx_position: Position,
}

/// An optimize request: link geometries plus the algorithm selector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub links: Vec<LinkSpec>,
    pub algorithm_type: String,
}

/// The chosen transmit beam for one link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxAction {
    /// Azimuth angle, degrees.
    pub azimuth: f64,
}

/// Per-link outcome, in the same order as the request's links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkResult {
    /// Link capacity at the chosen beam, Gbps.
    pub capacity: f64,
    pub tx_action: TxAction,
}

/// The optimize response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub success: bool,
    pub message: String,
    /// Sum of per-link capacities, Gbps.
    pub total_capacity: f64,
    pub results: Vec<LinkResult>,
    /// Wall-clock training duration, seconds.
    pub training_time: f64,
    /// Echo of the algorithm selector that produced this result.
    pub algorithm_type: String,
}

impl OptimizeResponse {
    /// A failure response carrying no results.
    pub fn failure(algorithm_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            total_capacity: 0.0,
            results: Vec::new(),
            training_time: 0.0,
            algorithm_type: algorithm_type.into(),
        }
    }
}
