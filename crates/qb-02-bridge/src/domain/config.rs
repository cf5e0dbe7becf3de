//! # Bridge Configuration
//!
//! Admission limits and the destination cost table.

use super::errors::BridgeError;
use qb_01_quad_ledger::QuadSize;
use serde::{Deserialize, Serialize};

/// Admission limits of one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Maximum number of regions in one outbound request.
    pub max_quads: usize,
    /// Ceiling for the estimated cost on the destination domain.
    pub destination_budget: u64,
    /// Fixed cost of delivering one message.
    pub base_cost: u64,
    /// Cost of one region, indexed by size (1, 3, 6, 12, 24).
    pub cost_per_size: [u64; 5],
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_quads: 144,
            destination_budget: 25_000_000,
            base_cost: 20_000,
            cost_per_size: [5_000, 49_545, 181_797, 715_629, 2_834_419],
        }
    }
}

impl BridgeConfig {
    /// Cost of a single region of `size`.
    pub fn region_cost(&self, size: QuadSize) -> u64 {
        self.cost_per_size[size.index()]
    }

    /// Reject limits that would refuse every request or make the estimate
    /// non-monotonic in region size.
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.max_quads == 0 {
            return Err(BridgeError::InvalidConfig("max_quads must be positive".into()));
        }
        if self.cost_per_size.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(BridgeError::InvalidConfig(
                "cost_per_size must not decrease with size".into(),
            ));
        }
        let smallest = self.base_cost.saturating_add(self.cost_per_size[0]);
        if smallest > self.destination_budget {
            return Err(BridgeError::InvalidConfig(format!(
                "destination_budget {} cannot cover a single cell ({smallest})",
                self.destination_budget
            )));
        }
        Ok(())
    }
}
