//! Request-level orchestration.
//!
//! The single entry point the transport layer calls. Everything the core can
//! reject (unknown selector, bad geometry, a non-finite capacity) comes back
//! as a structured `success=false` response; no error and no panic crosses
//! this boundary. Each call builds its own environment, agents, and tables
//! and drops them with the response, so concurrent requests share nothing.

use std::time::Instant;

use tracing::{info, warn};

use crate::api::{LinkResult, OptimizeRequest, OptimizeResponse, TxAction};
use crate::channel::ChannelParams;
use crate::error::BeamError;
use crate::geometry::Link;
use crate::rl::{
    ActionSpace, BeamEnvironment, Trainer, TrainingConfig, TrainingOutcome, UpdateRule,
};

/// Optimizes beam azimuths with default channel and training parameters.
pub fn optimize(request: &OptimizeRequest) -> OptimizeResponse {
    optimize_with(request, ChannelParams::default(), TrainingConfig::default())
}

/// Optimizes beam azimuths with explicit channel and training parameters.
pub fn optimize_with(
    request: &OptimizeRequest,
    params: ChannelParams,
    config: TrainingConfig,
) -> OptimizeResponse {
    let request_id = crate::generate_id();
    let start = Instant::now();

    match run(request, params, config) {
        Ok(outcome) => {
            let training_time = start.elapsed().as_secs_f64();
            info!(
                %request_id,
                links = request.links.len(),
                algorithm = %request.algorithm_type,
                total_capacity = outcome.total_capacity,
                training_time,
                "optimization completed"
            );
            let results = outcome
                .capacities
                .iter()
                .zip(&outcome.azimuths_deg)
                .map(|(&capacity, &azimuth)| LinkResult {
                    capacity,
                    tx_action: TxAction { azimuth },
                })
                .collect();
            OptimizeResponse {
                success: true,
                message: format!(
                    "optimization completed using {} over {} episodes",
                    request.algorithm_type, outcome.episodes
                ),
                total_capacity: outcome.total_capacity,
                results,
                training_time,
                algorithm_type: request.algorithm_type.clone(),
            }
        }
        Err(err) => {
            warn!(%request_id, error = %err, "optimization failed");
            OptimizeResponse::failure(request.algorithm_type.clone(), err.to_string())
        }
    }
}

fn run(
    request: &OptimizeRequest,
    params: ChannelParams,
    config: TrainingConfig,
) -> Result<TrainingOutcome, BeamError> {
    // Selector first: an unknown algorithm must fail before any table exists.
    let rule: UpdateRule = request.algorithm_type.parse()?;

    let links: Vec<Link> = request
        .links
        .iter()
        .map(|link| Link::new(link.tx_position, link.rx_position))
        .collect();

    let env = BeamEnvironment::new(links, params, ActionSpace::DEFAULT_RESOLUTION)?;
    let mut trainer = Trainer::new(env, rule, config)?;
    trainer.run()
}
