//! # Transfer Authorization
//!
//! Per-cell approvals and approval-for-all operators.
//!
//! Only cells are individually approvable; a quad moves only by its
//! whole-owner or by an operator approved for all of the owner's holdings.

use super::region::{Region, RegionId};
use shared_types::Account;
use std::collections::{HashMap, HashSet};

/// Approval records.
#[derive(Clone, Debug, Default)]
pub struct ApprovalRegistry {
    /// Cell id -> approved operator.
    approvals: HashMap<RegionId, Account>,
    /// Owner -> operators approved for all.
    operators: HashMap<Account, HashSet<Account>>,
}

impl ApprovalRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or clear, with the null account) the approved operator of a cell.
    pub fn approve(&mut self, cell: RegionId, operator: Account) {
        if operator.is_zero() {
            self.approvals.remove(&cell);
        } else {
            self.approvals.insert(cell, operator);
        }
    }

    /// Approved operator of a cell.
    pub fn approved(&self, cell: RegionId) -> Option<Account> {
        self.approvals.get(&cell).copied()
    }

    /// Check if `operator` is approved for `cell`.
    pub fn is_approved(&self, operator: &Account, cell: RegionId) -> bool {
        self.approvals.get(&cell) == Some(operator)
    }

    /// Grant or revoke approval-for-all.
    pub fn set_approval_for_all(&mut self, owner: Account, operator: Account, allowed: bool) {
        if allowed {
            self.operators.entry(owner).or_default().insert(operator);
        } else if let Some(set) = self.operators.get_mut(&owner) {
            set.remove(&operator);
            if set.is_empty() {
                self.operators.remove(&owner);
            }
        }
    }

    /// Check if `operator` may act for all of `owner`'s holdings.
    pub fn is_approved_for_all(&self, owner: &Account, operator: &Account) -> bool {
        self.operators
            .get(owner)
            .is_some_and(|set| set.contains(operator))
    }

    /// Drop cell approvals inside `region`. Called on every ownership change.
    pub fn clear_within(&mut self, region: &Region) {
        if self.approvals.is_empty() {
            return;
        }
        self.approvals.retain(|id, _| {
            let (x, y) = id.anchor();
            !region.contains_cell(x, y)
        });
    }

    /// Number of live cell approvals.
    pub fn approval_count(&self) -> usize {
        self.approvals.len()
    }
}
