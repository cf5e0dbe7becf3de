//! # Batch Overlap Detection
//!
//! A batch may not name any cell twice. Aligned regions either nest or are
//! disjoint, so two entries overlap exactly when one is an ancestor of (or
//! equal to) the other. Each entry is checked against its at most four
//! ancestors, keeping the scan linear in the batch length.

use crate::domain::{LedgerError, Region};
use std::collections::HashMap;

/// First entry (in batch order) sharing a cell with an earlier entry, paired
/// with that earlier entry.
pub fn find_overlap(regions: &[Region]) -> Option<(Region, Region)> {
    // Entries seen so far, and for each strict ancestor of a seen entry the
    // first entry beneath it.
    let mut claimed: HashMap<Region, Region> = HashMap::with_capacity(regions.len());
    let mut beneath: HashMap<Region, Region> = HashMap::new();

    for region in regions {
        if let Some(earlier) = claimed.get(region).or_else(|| beneath.get(region)) {
            return Some((*earlier, *region));
        }
        let mut ancestor = region.parent();
        while let Some(current) = ancestor {
            if let Some(earlier) = claimed.get(&current) {
                return Some((*earlier, *region));
            }
            beneath.entry(current).or_insert(*region);
            ancestor = current.parent();
        }
        claimed.insert(*region, *region);
    }
    None
}

/// Fail with `DuplicateOrOverlap` if two entries share a cell.
pub fn ensure_disjoint(regions: &[Region]) -> Result<(), LedgerError> {
    match find_overlap(regions) {
        Some((first, second)) => Err(LedgerError::DuplicateOrOverlap { first, second }),
        None => Ok(()),
    }
}
