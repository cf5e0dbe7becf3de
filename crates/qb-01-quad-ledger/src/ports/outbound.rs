//! # Outbound Ports
//!
//! Collaborators the ledger consumes through narrow interfaces.

use crate::domain::{LedgerError, RegionId};
use serde::{Deserialize, Serialize};
use shared_types::{Account, CodeHash};

/// Operator allow-list - outbound port.
///
/// Consulted before any operator other than the whole-owner moves or is
/// approved for a region.
pub trait OperatorFilter: Send + Sync {
    /// Check if the operator's address is allowed.
    fn is_operator_allowed(&self, operator: &Account) -> bool;

    /// Check if a code fingerprint is allowed.
    fn is_code_hash_allowed(&self, code_hash: &CodeHash) -> bool;

    /// Code fingerprint of an account.
    fn fingerprint_of(&self, account: &Account) -> CodeHash;
}

/// Opaque per-region metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionMetadata {
    /// Premium flag.
    pub premium: bool,
    /// Neighborhood id (0 = none).
    pub neighborhood: u8,
}

impl RegionMetadata {
    const PREMIUM_BIT: u64 = 0x1;
    const NEIGHBORHOOD_SHIFT: u32 = 8;

    /// Unpack a stored value: bit 0 premium, bits 8..16 neighborhood.
    pub fn unpack(packed: u64) -> Self {
        Self {
            premium: packed & Self::PREMIUM_BIT != 0,
            neighborhood: (packed >> Self::NEIGHBORHOOD_SHIFT) as u8,
        }
    }

    /// Pack into the stored layout.
    pub fn pack(&self) -> u64 {
        let premium = if self.premium { Self::PREMIUM_BIT } else { 0 };
        premium | (u64::from(self.neighborhood) << Self::NEIGHBORHOOD_SHIFT)
    }
}

/// Metadata side-table - outbound port.
///
/// Keyed by region id; the ledger itself never reads or writes it.
pub trait RegionMetadataStore: Send + Sync {
    /// Metadata for a region (default when unset).
    fn get(&self, id: RegionId) -> Result<RegionMetadata, LedgerError>;

    /// Store packed values. All ids are validated before any is written.
    fn batch_set(&mut self, entries: &[(RegionId, u64)]) -> Result<(), LedgerError>;
}
