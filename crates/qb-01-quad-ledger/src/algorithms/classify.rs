//! # Inbound Classification
//!
//! Decides how a region arriving for `recipient` is materialized on a ledger
//! where `custodian` (a bridge endpoint) may already hold parts of it.

use crate::domain::{CellTally, LedgerError, Region};
use serde::{Deserialize, Serialize};
use shared_types::Account;

/// How a region is handed to its recipient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    /// Recipient already whole-owns it. Nothing to do.
    AlreadySatisfied,
    /// Every cell is unowned and gets minted.
    Mint,
    /// Custodian whole-owns it and transfers it.
    Release,
    /// Custodian owns some cells, the rest are unowned.
    MintAndRelease,
}

/// Classify `region` from its ownership tally.
///
/// - all cells owned by `recipient` → `AlreadySatisfied`
/// - any cell owned by a third party → `AlreadyOwned`
/// - some (not all) cells owned by `recipient` → `PartiallyCovered`
/// - otherwise mint the unowned part and release the custodian's part
pub fn classify(
    tally: &CellTally,
    region: Region,
    custodian: &Account,
    recipient: &Account,
) -> Result<Disposition, LedgerError> {
    let total = region.cell_count();
    let count = |owner: Option<&Account>| tally.get(&owner.copied()).copied().unwrap_or(0);

    let held_by_recipient = count(Some(recipient));
    if held_by_recipient == total {
        return Ok(Disposition::AlreadySatisfied);
    }
    let third_party = tally.iter().any(|(owner, cells)| {
        *cells > 0 && matches!(owner, Some(o) if o != custodian && o != recipient)
    });
    if third_party {
        return Err(LedgerError::AlreadyOwned { region });
    }
    if held_by_recipient > 0 {
        return Err(LedgerError::PartiallyCovered { region });
    }

    let held_by_custodian = count(Some(custodian));
    Ok(if held_by_custodian == total {
        Disposition::Release
    } else if held_by_custodian == 0 {
        Disposition::Mint
    } else {
        Disposition::MintAndRelease
    })
}
