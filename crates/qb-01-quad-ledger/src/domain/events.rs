//! # Ledger Events
//!
//! Record of every ownership and approval change, drained by callers.

use super::region::{Region, RegionId};
use serde::{Deserialize, Serialize};
use shared_types::Account;

/// A state change applied by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// Unowned region given to `to`.
    Minted {
        /// Recipient
        to: Account,
        /// Minted region
        region: Region,
        /// Caller payload
        data: Vec<u8>,
    },
    /// Whole-owned region moved.
    Transferred {
        /// Previous owner
        from: Account,
        /// New owner
        to: Account,
        /// Moved region
        region: Region,
        /// Caller payload
        data: Vec<u8>,
    },
    /// Region partly minted and partly moved out of `from`'s custody.
    MintedAndTransferred {
        /// Custodian that held the owned part
        from: Account,
        /// New owner
        to: Account,
        /// Region
        region: Region,
        /// Cells that were unowned before
        minted_cells: u64,
    },
    /// Region returned to the unowned state.
    Burned {
        /// Previous owner
        from: Account,
        /// Burned region
        region: Region,
    },
    /// Cell approval set or cleared.
    Approval {
        /// Cell owner
        owner: Account,
        /// Approved operator (zero when cleared)
        operator: Account,
        /// Cell id
        id: RegionId,
    },
    /// Approval-for-all granted or revoked.
    ApprovalForAll {
        /// Owner
        owner: Account,
        /// Operator
        operator: Account,
        /// Granted or revoked
        approved: bool,
    },
}
