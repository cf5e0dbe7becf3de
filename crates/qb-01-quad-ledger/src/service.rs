//! # Quad Ledger Service
//!
//! Authoritative store of region ownership for one domain.
//!
//! Every mutating entry point validates the whole request first and only then
//! applies it, so a failed call leaves no partial state behind.

use crate::algorithms::{classify, ensure_disjoint, Disposition};
use crate::domain::{
    ApprovalRegistry, CellTally, Coverage, LedgerError, LedgerEvent, OwnershipTree, Region,
    RegionId,
};
use crate::ports::OperatorFilter;
use shared_types::{Account, Administrator};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// The Quad Ownership Ledger.
pub struct QuadLedger {
    ownership: OwnershipTree,
    approvals: ApprovalRegistry,
    /// Whole cells owned per account.
    balances: HashMap<Account, u64>,
    minters: HashSet<Account>,
    admin: Administrator,
    /// `None` means no filtering is configured.
    operator_filter: Option<Arc<dyn OperatorFilter>>,
    events: Vec<LedgerEvent>,
}

impl QuadLedger {
    /// Create an empty ledger administered by `admin`.
    pub fn new(admin: Administrator) -> Self {
        Self {
            ownership: OwnershipTree::new(),
            approvals: ApprovalRegistry::new(),
            balances: HashMap::new(),
            minters: HashSet::new(),
            admin,
            operator_filter: None,
            events: Vec::new(),
        }
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// Current administrator.
    pub fn administrator(&self) -> Account {
        self.admin.account()
    }

    /// Hand the administrator capability to `new_admin`.
    pub fn change_administrator(
        &mut self,
        caller: Account,
        new_admin: Account,
    ) -> Result<(), LedgerError> {
        self.admin.change(&caller, new_admin)?;
        Ok(())
    }

    /// Enable or disable a minter.
    pub fn set_minter(
        &mut self,
        caller: Account,
        minter: Account,
        enabled: bool,
    ) -> Result<(), LedgerError> {
        self.admin.ensure(&caller)?;
        if minter.is_zero() {
            return Err(LedgerError::ZeroOperator);
        }
        if enabled {
            self.minters.insert(minter);
        } else {
            self.minters.remove(&minter);
        }
        info!(minter = %minter, enabled, "[qb-01] Minter updated");
        Ok(())
    }

    /// Check if `account` may mint.
    pub fn is_minter(&self, account: &Account) -> bool {
        self.minters.contains(account)
    }

    /// Install or remove the operator allow-list.
    pub fn set_operator_filter(
        &mut self,
        caller: Account,
        filter: Option<Arc<dyn OperatorFilter>>,
    ) -> Result<(), LedgerError> {
        self.admin.ensure(&caller)?;
        info!(enabled = filter.is_some(), "[qb-01] Operator filter updated");
        self.operator_filter = filter;
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Check if `region` is whole-owned by a single account.
    pub fn exists(&self, region: Region) -> bool {
        matches!(self.ownership.coverage(region), Coverage::Whole(_))
    }

    /// Ownership state of `region`.
    pub fn coverage(&self, region: Region) -> Coverage {
        self.ownership.coverage(region)
    }

    /// Cells per owner inside `region`.
    pub fn tally(&self, region: Region) -> CellTally {
        self.ownership.tally(region)
    }

    /// Whole-owner of a cell or quad.
    ///
    /// Fails with `NoOwner` when any covered cell is unowned or owners differ.
    pub fn owner_of(&self, id: RegionId) -> Result<Account, LedgerError> {
        let region = id.decode()?;
        self.ownership
            .coverage(region)
            .owner()
            .ok_or(LedgerError::NoOwner { id })
    }

    /// Number of cells owned by `account`.
    pub fn balance_of(&self, account: &Account) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Compacted records held by `account`, sorted.
    pub fn owned_regions(&self, account: &Account) -> Vec<Region> {
        let mut regions: Vec<Region> = self
            .ownership
            .records()
            .filter(|(_, owner)| *owner == account)
            .map(|(region, _)| *region)
            .collect();
        regions.sort();
        regions
    }

    /// Number of stored ownership records.
    pub fn record_count(&self) -> usize {
        self.ownership.record_count()
    }

    /// Read access to the ownership records.
    pub fn ownership(&self) -> &OwnershipTree {
        &self.ownership
    }

    /// Approved operator of a cell.
    pub fn get_approved(&self, id: RegionId) -> Option<Account> {
        self.approvals.approved(id)
    }

    /// Check if `operator` is approved for the cell `id`.
    pub fn is_approved(&self, operator: &Account, id: RegionId) -> bool {
        self.approvals.is_approved(operator, id)
    }

    /// Check if `operator` may act for all of `owner`'s holdings.
    pub fn is_approved_for_all(&self, owner: &Account, operator: &Account) -> bool {
        self.approvals.is_approved_for_all(owner, operator)
    }

    /// Drain recorded events.
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // Ownership changes
    // =========================================================================

    /// Mint an unowned region to `recipient`.
    pub fn mint(
        &mut self,
        caller: Account,
        recipient: Account,
        region: Region,
        data: &[u8],
    ) -> Result<RegionId, LedgerError> {
        self.ensure_minter(&caller)?;
        if recipient.is_zero() {
            return Err(LedgerError::ZeroRecipient);
        }
        if self.ownership.coverage(region) != Coverage::Unowned {
            return Err(LedgerError::AlreadyOwned { region });
        }

        self.apply(region, Some(recipient));
        self.events.push(LedgerEvent::Minted {
            to: recipient,
            region,
            data: data.to_vec(),
        });
        debug!(region = %region, to = %recipient, "[qb-01] Minted");
        Ok(region.id())
    }

    /// Move a region whole-owned by `from` to `to`.
    pub fn transfer(
        &mut self,
        caller: Account,
        from: Account,
        to: Account,
        region: Region,
        data: &[u8],
    ) -> Result<(), LedgerError> {
        self.batch_transfer(caller, from, to, &[region], data)
    }

    /// Move several regions whole-owned by `from` to `to`, all or nothing.
    ///
    /// Rejects the batch with `DuplicateOrOverlap` if two entries share a cell.
    pub fn batch_transfer(
        &mut self,
        caller: Account,
        from: Account,
        to: Account,
        regions: &[Region],
        data: &[u8],
    ) -> Result<(), LedgerError> {
        self.check_batch_transfer(caller, from, to, regions)?;

        for region in regions {
            // Ownership is unchanged, so balances and approvals stay as they are.
            if from != to {
                self.apply(*region, Some(to));
            }
            self.events.push(LedgerEvent::Transferred {
                from,
                to,
                region: *region,
                data: data.to_vec(),
            });
        }
        debug!(
            from = %from,
            to = %to,
            count = regions.len(),
            "[qb-01] Transferred"
        );
        Ok(())
    }

    /// Run every check `batch_transfer` makes without changing anything.
    ///
    /// A batch that passes will be applied by `batch_transfer` as long as no
    /// other call mutates the ledger in between.
    pub fn check_batch_transfer(
        &self,
        caller: Account,
        from: Account,
        to: Account,
        regions: &[Region],
    ) -> Result<(), LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::ZeroRecipient);
        }
        ensure_disjoint(regions)?;
        for region in regions {
            self.ensure_whole_owned(*region, from)?;
            self.authorize(caller, from, *region)?;
        }
        Ok(())
    }

    /// Return a region whole-owned by `owner` to the unowned state.
    pub fn burn(&mut self, caller: Account, owner: Account, region: Region) -> Result<(), LedgerError> {
        self.ensure_whole_owned(region, owner)?;
        self.authorize(caller, owner, region)?;

        self.apply(region, None);
        self.events.push(LedgerEvent::Burned {
            from: owner,
            region,
        });
        debug!(region = %region, from = %owner, "[qb-01] Burned");
        Ok(())
    }

    /// Give `region` to `to`, minting unowned cells and transferring cells
    /// held by `caller`. `caller` must be a minter.
    pub fn mint_and_transfer(
        &mut self,
        caller: Account,
        to: Account,
        region: Region,
        data: &[u8],
    ) -> Result<Disposition, LedgerError> {
        let mut dispositions = self.batch_mint_and_transfer(caller, to, &[region], data)?;
        Ok(dispositions.pop().unwrap_or(Disposition::AlreadySatisfied))
    }

    /// Batch form of `mint_and_transfer`, all or nothing.
    ///
    /// Regions already whole-owned by `to` are left untouched. Regions that
    /// `to` owns only in part fail the batch with `PartiallyCovered`.
    pub fn batch_mint_and_transfer(
        &mut self,
        caller: Account,
        to: Account,
        regions: &[Region],
        data: &[u8],
    ) -> Result<Vec<Disposition>, LedgerError> {
        self.ensure_minter(&caller)?;
        if to.is_zero() {
            return Err(LedgerError::ZeroRecipient);
        }
        ensure_disjoint(regions)?;
        let plan = regions
            .iter()
            .map(|region| {
                classify(&self.ownership.tally(*region), *region, &caller, &to)
                    .map(|disposition| (*region, disposition))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (region, disposition) in &plan {
            self.materialize(caller, to, *region, *disposition, data);
        }
        Ok(plan.into_iter().map(|(_, disposition)| disposition).collect())
    }

    fn materialize(
        &mut self,
        custodian: Account,
        to: Account,
        region: Region,
        disposition: Disposition,
        data: &[u8],
    ) {
        let event = match disposition {
            Disposition::AlreadySatisfied => {
                debug!(region = %region, to = %to, "[qb-01] Already satisfied");
                return;
            }
            Disposition::Mint => LedgerEvent::Minted {
                to,
                region,
                data: data.to_vec(),
            },
            Disposition::Release => LedgerEvent::Transferred {
                from: custodian,
                to,
                region,
                data: data.to_vec(),
            },
            Disposition::MintAndRelease => LedgerEvent::MintedAndTransferred {
                from: custodian,
                to,
                region,
                minted_cells: self.ownership.tally(region).get(&None).copied().unwrap_or(0),
            },
        };
        self.apply(region, Some(to));
        self.events.push(event);
        debug!(region = %region, to = %to, ?disposition, "[qb-01] Materialized");
    }

    // =========================================================================
    // Approvals
    // =========================================================================

    /// Approve `operator` for a single cell (null operator clears).
    ///
    /// `caller` must be the cell's owner or an operator approved for all.
    pub fn approve(
        &mut self,
        caller: Account,
        operator: Account,
        id: RegionId,
    ) -> Result<(), LedgerError> {
        let region = id.decode()?;
        if !region.is_cell() {
            return Err(LedgerError::NotApprovable { id });
        }
        let owner = self
            .ownership
            .coverage(region)
            .owner()
            .ok_or(LedgerError::NoOwner { id })?;
        if caller != owner {
            if !self.approvals.is_approved_for_all(&owner, &caller) {
                return Err(LedgerError::NotApproved {
                    operator: caller,
                    region,
                });
            }
            self.check_operator(caller)?;
        }
        if !operator.is_zero() {
            self.check_operator(operator)?;
        }

        self.approvals.approve(id, operator);
        self.events.push(LedgerEvent::Approval {
            owner,
            operator,
            id,
        });
        debug!(id = %id, operator = %operator, "[qb-01] Approval set");
        Ok(())
    }

    /// Grant or revoke `operator` authority over all of `owner`'s holdings.
    pub fn set_approval_for_all(
        &mut self,
        owner: Account,
        operator: Account,
        allowed: bool,
    ) -> Result<(), LedgerError> {
        if operator.is_zero() {
            return Err(LedgerError::ZeroOperator);
        }
        if operator == owner {
            return Err(LedgerError::SelfApproval);
        }
        if allowed {
            self.check_operator(operator)?;
        }

        self.approvals.set_approval_for_all(owner, operator, allowed);
        self.events.push(LedgerEvent::ApprovalForAll {
            owner,
            operator,
            approved: allowed,
        });
        debug!(owner = %owner, operator = %operator, allowed, "[qb-01] Approval for all");
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_minter(&self, caller: &Account) -> Result<(), LedgerError> {
        if !self.minters.contains(caller) {
            return Err(LedgerError::NotMinter { account: *caller });
        }
        Ok(())
    }

    fn ensure_whole_owned(&self, region: Region, owner: Account) -> Result<(), LedgerError> {
        if self.ownership.coverage(region) != Coverage::Whole(owner) {
            return Err(LedgerError::NotOwner {
                region,
                account: owner,
            });
        }
        Ok(())
    }

    /// Consult the allow-list. Skipped when none is configured.
    fn check_operator(&self, operator: Account) -> Result<(), LedgerError> {
        let Some(filter) = &self.operator_filter else {
            return Ok(());
        };
        if !filter.is_operator_allowed(&operator) {
            return Err(LedgerError::OperatorFiltered { operator });
        }
        let code_hash = filter.fingerprint_of(&operator);
        if !filter.is_code_hash_allowed(&code_hash) {
            return Err(LedgerError::CodeHashFiltered {
                operator,
                code_hash: hex::encode(code_hash),
            });
        }
        Ok(())
    }

    /// The whole-owner acting directly is always authorized; anyone else must
    /// pass the allow-list and hold approval-for-all or (for a cell) the cell
    /// approval.
    fn authorize(&self, caller: Account, from: Account, region: Region) -> Result<(), LedgerError> {
        if caller == from {
            return Ok(());
        }
        self.check_operator(caller)?;
        if self.approvals.is_approved_for_all(&from, &caller) {
            return Ok(());
        }
        if region.is_cell() && self.approvals.is_approved(&caller, region.id()) {
            return Ok(());
        }
        Err(LedgerError::NotApproved {
            operator: caller,
            region,
        })
    }

    /// Reassign every cell of `region`, keeping balances and approvals in step.
    fn apply(&mut self, region: Region, owner: Option<Account>) -> CellTally {
        let previous = self.ownership.assign(region, owner);
        for (holder, cells) in &previous {
            if let Some(account) = holder {
                self.debit(*account, *cells);
            }
        }
        if let Some(owner) = owner {
            *self.balances.entry(owner).or_insert(0) += region.cell_count();
        }
        self.approvals.clear_within(&region);
        previous
    }

    fn debit(&mut self, account: Account, cells: u64) {
        if let Some(balance) = self.balances.get_mut(&account) {
            *balance = balance.saturating_sub(cells);
            if *balance == 0 {
                self.balances.remove(&account);
            }
        }
    }
}
