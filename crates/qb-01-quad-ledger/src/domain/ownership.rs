//! # Ownership Tree
//!
//! Disjoint ownership records keyed by region.
//!
//! ## Invariants
//!
//! - **Disjoint**: no two records overlap, so every cell has at most one owner.
//! - **Compact**: no region has all of its children recorded under the same
//!   owner. Such a group is always folded into one record for the parent.
//!
//! Storage therefore grows with the number of maximal same-owner aligned
//! regions, not with the number of cells.
//!
//! ## Mutation
//!
//! `assign` is the only mutator. It splits a coarser record that covers the
//! target down to the target's level, drops every record below the target,
//! writes the new record and folds same-owner siblings upward.

use super::region::Region;
use shared_types::Account;
use std::collections::{BTreeMap, HashMap};

/// Cells per owner inside a region; `None` counts unowned cells.
pub type CellTally = BTreeMap<Option<Account>, u64>;

/// Ownership state of a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coverage {
    /// No covered cell has an owner.
    Unowned,
    /// Every covered cell belongs to this account.
    Whole(Account),
    /// Owners differ, or some cells are owned and some are not.
    Mixed,
}

impl Coverage {
    fn combine(self, other: Coverage) -> Coverage {
        match (self, other) {
            (Coverage::Unowned, Coverage::Unowned) => Coverage::Unowned,
            (Coverage::Whole(a), Coverage::Whole(b)) if a == b => Coverage::Whole(a),
            _ => Coverage::Mixed,
        }
    }

    /// Owner if the region is whole-owned.
    pub fn owner(&self) -> Option<Account> {
        match self {
            Coverage::Whole(owner) => Some(*owner),
            _ => None,
        }
    }
}

/// Compacted ownership records.
#[derive(Clone, Debug, Default)]
pub struct OwnershipTree {
    records: HashMap<Region, Account>,
}

impl OwnershipTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Iterate stored records.
    pub fn records(&self) -> impl Iterator<Item = (&Region, &Account)> {
        self.records.iter()
    }

    /// Record at `region` or at one of its ancestors.
    fn covering_record(&self, region: Region) -> Option<(Region, Account)> {
        let mut current = Some(region);
        while let Some(candidate) = current {
            if let Some(owner) = self.records.get(&candidate) {
                return Some((candidate, *owner));
            }
            current = candidate.parent();
        }
        None
    }

    /// Ownership state of `region`.
    pub fn coverage(&self, region: Region) -> Coverage {
        match self.covering_record(region) {
            Some((_, owner)) => Coverage::Whole(owner),
            None => self.coverage_below(region),
        }
    }

    /// Coverage of a region known to have no record at or above it.
    fn coverage_below(&self, region: Region) -> Coverage {
        let mut acc: Option<Coverage> = None;
        for child in region.children() {
            let child_coverage = match self.records.get(&child) {
                Some(owner) => Coverage::Whole(*owner),
                None => self.coverage_below(child),
            };
            let merged = match acc {
                None => child_coverage,
                Some(prev) => prev.combine(child_coverage),
            };
            if merged == Coverage::Mixed {
                return Coverage::Mixed;
            }
            acc = Some(merged);
        }
        acc.unwrap_or(Coverage::Unowned)
    }

    /// Owner of a single cell.
    pub fn owner_of_cell(&self, x: u32, y: u32) -> Option<Account> {
        let cell = Region::cell(x, y).ok()?;
        self.covering_record(cell).map(|(_, owner)| owner)
    }

    /// Count covered cells per owner.
    pub fn tally(&self, region: Region) -> CellTally {
        let mut tally = CellTally::new();
        match self.covering_record(region) {
            Some((_, owner)) => {
                tally.insert(Some(owner), region.cell_count());
            }
            None => self.tally_below(region, &mut tally),
        }
        tally
    }

    fn tally_below(&self, region: Region, tally: &mut CellTally) {
        if region.is_cell() {
            *tally.entry(None).or_insert(0) += 1;
            return;
        }
        for child in region.children() {
            match self.records.get(&child) {
                Some(owner) => *tally.entry(Some(*owner)).or_insert(0) += child.cell_count(),
                None => self.tally_below(child, tally),
            }
        }
    }

    /// Give every cell of `region` to `owner` (or clear it with `None`).
    ///
    /// Returns the tally of previous owners.
    pub fn assign(&mut self, region: Region, owner: Option<Account>) -> CellTally {
        let previous = self.tally(region);
        self.split_ancestor(region);
        self.records.remove(&region);
        self.clear_below(region);
        if let Some(owner) = owner {
            self.records.insert(region, owner);
            self.merge_upward(region, owner);
        }
        previous
    }

    /// Replace a strict-ancestor record covering `region` by records for the
    /// ancestor's children, level by level, until `region` itself is recorded.
    fn split_ancestor(&mut self, region: Region) {
        let mut ancestor = region.parent();
        let (mut current, owner) = loop {
            let Some(candidate) = ancestor else {
                return;
            };
            if let Some(owner) = self.records.get(&candidate) {
                break (candidate, *owner);
            }
            ancestor = candidate.parent();
        };

        while current != region {
            self.records.remove(&current);
            let mut next = None;
            for child in current.children() {
                if child.contains(&region) {
                    next = Some(child);
                }
                self.records.insert(child, owner);
            }
            match next {
                Some(child) => current = child,
                None => break,
            }
        }
    }

    /// Drop every record strictly below `region`.
    fn clear_below(&mut self, region: Region) {
        for child in region.children() {
            if self.records.remove(&child).is_none() && !child.is_cell() {
                self.clear_below(child);
            }
        }
    }

    /// Fold same-owner sibling groups into their parent, bottom-up.
    fn merge_upward(&mut self, region: Region, owner: Account) {
        let mut current = region;
        while let Some(parent) = current.parent() {
            let siblings = parent.children();
            if !siblings
                .iter()
                .all(|sibling| self.records.get(sibling) == Some(&owner))
            {
                break;
            }
            for sibling in &siblings {
                self.records.remove(sibling);
            }
            self.records.insert(parent, owner);
            current = parent;
        }
    }

    /// Check both structural invariants. Used by tests.
    pub fn is_consistent(&self) -> bool {
        let disjoint = self.records.keys().all(|region| {
            let mut ancestor = region.parent();
            while let Some(candidate) = ancestor {
                if self.records.contains_key(&candidate) {
                    return false;
                }
                ancestor = candidate.parent();
            }
            true
        });
        let compact = self.records.iter().all(|(region, owner)| {
            region.parent().map_or(true, |parent| {
                !parent
                    .children()
                    .iter()
                    .all(|sibling| self.records.get(sibling) == Some(owner))
            })
        });
        disjoint && compact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Account {
        Account::from_low_u64(0xA)
    }

    fn bob() -> Account {
        Account::from_low_u64(0xB)
    }

    fn region(side: u32, x: u32, y: u32) -> Region {
        Region::new(side, x, y).unwrap()
    }

    #[test]
    fn test_empty_tree_is_unowned() {
        let tree = OwnershipTree::new();
        assert_eq!(tree.coverage(region(24, 0, 0)), Coverage::Unowned);
        assert_eq!(tree.owner_of_cell(5, 5), None);
    }

    #[test]
    fn test_assign_big_quad_is_one_record() {
        let mut tree = OwnershipTree::new();
        tree.assign(region(24, 0, 0), Some(alice()));
        assert_eq!(tree.record_count(), 1);
        assert_eq!(tree.coverage(region(3, 9, 21)), Coverage::Whole(alice()));
        assert_eq!(tree.owner_of_cell(23, 23), Some(alice()));
        assert_eq!(tree.owner_of_cell(24, 0), None);
    }

    #[test]
    fn test_nine_cells_merge_into_three() {
        let mut tree = OwnershipTree::new();
        for (x, y) in region(3, 3, 3).cells() {
            tree.assign(Region::cell(x, y).unwrap(), Some(alice()));
        }
        assert_eq!(tree.record_count(), 1);
        assert_eq!(tree.records().next(), Some((&region(3, 3, 3), &alice())));
    }

    #[test]
    fn test_four_subquads_merge_up_the_chain() {
        let mut tree = OwnershipTree::new();
        for child in region(24, 0, 0).children() {
            tree.assign(child, Some(alice()));
        }
        assert_eq!(tree.record_count(), 1);
        assert_eq!(tree.coverage(region(24, 0, 0)), Coverage::Whole(alice()));
    }

    #[test]
    fn test_split_on_cell_transfer() {
        let mut tree = OwnershipTree::new();
        tree.assign(region(24, 0, 0), Some(alice()));
        let previous = tree.assign(Region::cell(4, 4).unwrap(), Some(bob()));

        assert_eq!(previous.get(&Some(alice())), Some(&1));
        assert_eq!(tree.owner_of_cell(4, 4), Some(bob()));
        assert_eq!(tree.owner_of_cell(3, 3), Some(alice()));
        assert_eq!(tree.coverage(region(24, 0, 0)), Coverage::Mixed);
        assert_eq!(tree.coverage(region(12, 12, 0)), Coverage::Whole(alice()));
        // 3 twelves + 3 sixes + 3 threes + 8 cells + the moved cell
        assert_eq!(tree.record_count(), 3 + 3 + 3 + 8 + 1);
        assert!(tree.is_consistent());
    }

    #[test]
    fn test_split_then_return_recompacts() {
        let mut tree = OwnershipTree::new();
        tree.assign(region(24, 0, 0), Some(alice()));
        tree.assign(Region::cell(4, 4).unwrap(), Some(bob()));
        tree.assign(Region::cell(4, 4).unwrap(), Some(alice()));
        assert_eq!(tree.record_count(), 1);
        assert!(tree.is_consistent());
    }

    #[test]
    fn test_clear_leaves_siblings() {
        let mut tree = OwnershipTree::new();
        tree.assign(region(6, 0, 0), Some(alice()));
        tree.assign(region(3, 3, 0), None);
        assert_eq!(tree.coverage(region(3, 3, 0)), Coverage::Unowned);
        assert_eq!(tree.coverage(region(6, 0, 0)), Coverage::Mixed);
        assert_eq!(tree.record_count(), 3);
        assert!(tree.is_consistent());
    }

    #[test]
    fn test_assign_over_finer_records_replaces_them() {
        let mut tree = OwnershipTree::new();
        tree.assign(Region::cell(0, 0).unwrap(), Some(alice()));
        tree.assign(Region::cell(7, 7).unwrap(), Some(bob()));
        let previous = tree.assign(region(12, 0, 0), Some(bob()));
        assert_eq!(previous.get(&Some(alice())), Some(&1));
        assert_eq!(previous.get(&Some(bob())), Some(&1));
        assert_eq!(previous.get(&None), Some(&142));
        assert_eq!(tree.record_count(), 1);
    }

    #[test]
    fn test_partial_coverage_is_mixed() {
        let mut tree = OwnershipTree::new();
        tree.assign(Region::cell(0, 0).unwrap(), Some(alice()));
        assert_eq!(tree.coverage(region(3, 0, 0)), Coverage::Mixed);
        let tally = tree.tally(region(3, 0, 0));
        assert_eq!(tally.get(&Some(alice())), Some(&1));
        assert_eq!(tally.get(&None), Some(&8));
    }

    #[test]
    fn test_tally_under_covering_record() {
        let mut tree = OwnershipTree::new();
        tree.assign(region(12, 0, 0), Some(alice()));
        let tally = tree.tally(region(6, 6, 6));
        assert_eq!(tally.len(), 1);
        assert_eq!(tally.get(&Some(alice())), Some(&36));
    }
}
