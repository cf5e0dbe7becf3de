//! # Admission Control
//!
//! Gates an outbound request before anything is escrowed.
//!
//! Checks run in a fixed order: pause state, batch size, destination cost.

use crate::domain::{BridgeConfig, BridgeError, EndpointState};
use qb_01_quad_ledger::Region;

/// Estimated cost of releasing `regions` on the destination domain.
///
/// Monotonic: adding a region or growing one never lowers the estimate.
pub fn estimate_destination_cost(config: &BridgeConfig, regions: &[Region]) -> u64 {
    regions.iter().fold(config.base_cost, |total, region| {
        total.saturating_add(config.region_cost(region.size()))
    })
}

/// Admit or reject an outbound request. Returns the estimated cost.
pub fn check_admission(
    config: &BridgeConfig,
    state: EndpointState,
    regions: &[Region],
) -> Result<u64, BridgeError> {
    if state == EndpointState::Paused {
        return Err(BridgeError::Paused);
    }
    if regions.is_empty() {
        return Err(BridgeError::EmptyBatch);
    }
    if regions.len() > config.max_quads {
        return Err(BridgeError::ExceedsMaxQuads {
            requested: regions.len(),
            limit: config.max_quads,
        });
    }
    let cost = estimate_destination_cost(config, regions);
    if cost > config.destination_budget {
        return Err(BridgeError::ExceedsDestinationBudget {
            cost,
            limit: config.destination_budget,
        });
    }
    Ok(cost)
}
