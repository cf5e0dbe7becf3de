//! In-Memory Metadata Adapter
//!
//! Implements `RegionMetadataStore` with a hash map.

use crate::domain::{LedgerError, RegionId};
use crate::ports::{RegionMetadata, RegionMetadataStore};
use std::collections::HashMap;
use tracing::debug;

/// In-memory metadata side-table.
#[derive(Clone, Debug, Default)]
pub struct InMemoryMetadataStore {
    entries: HashMap<RegionId, u64>,
}

impl InMemoryMetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RegionMetadataStore for InMemoryMetadataStore {
    fn get(&self, id: RegionId) -> Result<RegionMetadata, LedgerError> {
        id.decode()?;
        Ok(self
            .entries
            .get(&id)
            .map(|packed| RegionMetadata::unpack(*packed))
            .unwrap_or_default())
    }

    fn batch_set(&mut self, entries: &[(RegionId, u64)]) -> Result<(), LedgerError> {
        for (id, _) in entries {
            id.decode()?;
        }
        for (id, packed) in entries {
            self.entries.insert(*id, *packed);
        }
        debug!("[qb-01] Stored metadata for {} regions", entries.len());
        Ok(())
    }
}
