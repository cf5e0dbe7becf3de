//! # Domain Errors
//!
//! Error types for the Quad Ownership Ledger.

use super::region::{Region, RegionId};
use shared_types::{Account, AuthError, ErrorCategory};
use thiserror::Error;

/// Ledger error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Side is not one of 1, 3, 6, 12, 24.
    #[error("Invalid size: {side}")]
    InvalidSize {
        /// Requested side
        side: u32,
    },

    /// Anchor lies outside the grid.
    #[error("Out of bounds: {side}x{side} at ({x},{y})")]
    OutOfBounds {
        /// Requested side
        side: u32,
        /// Anchor column
        x: u32,
        /// Anchor row
        y: u32,
    },

    /// Anchor is not a multiple of the side.
    #[error("Misaligned: {side}x{side} at ({x},{y})")]
    Misaligned {
        /// Requested side
        side: u32,
        /// Anchor column
        x: u32,
        /// Anchor row
        y: u32,
    },

    /// Identifier does not decode to a valid region.
    #[error("Invalid region id: {id}")]
    InvalidRegionId {
        /// Offending id
        id: RegionId,
    },

    /// At least one covered cell already has an owner.
    #[error("Already owned: {region}")]
    AlreadyOwned {
        /// Region that was requested
        region: Region,
    },

    /// Region is not whole-owned by a single account.
    #[error("No owner: {id}")]
    NoOwner {
        /// Queried id
        id: RegionId,
    },

    /// Region is not whole-owned by the expected account.
    #[error("Not owner: {account} does not own {region}")]
    NotOwner {
        /// Region that was requested
        region: Region,
        /// Account expected to own it
        account: Account,
    },

    /// Recipient is the null account.
    #[error("Recipient is the zero account")]
    ZeroRecipient,

    /// Operator is the null account.
    #[error("Operator is the zero account")]
    ZeroOperator,

    /// An owner tried to make itself its own operator.
    #[error("Owner cannot approve itself")]
    SelfApproval,

    /// Two entries of one batch cover a common cell.
    #[error("Duplicate or overlapping entries: {first} and {second}")]
    DuplicateOrOverlap {
        /// Earlier entry
        first: Region,
        /// Later entry
        second: Region,
    },

    /// Caller is neither the owner nor an approved operator.
    #[error("Not approved: {operator} may not move {region}")]
    NotApproved {
        /// Caller
        operator: Account,
        /// Region that was requested
        region: Region,
    },

    /// Only single cells carry individual approvals.
    #[error("Not approvable: {id} is not a cell")]
    NotApprovable {
        /// Requested id
        id: RegionId,
    },

    /// Allow-list rejected the operator.
    #[error("Operator filtered: {operator}")]
    OperatorFiltered {
        /// Rejected operator
        operator: Account,
    },

    /// Allow-list rejected the operator's code fingerprint.
    #[error("Code hash filtered: {operator} ({code_hash})")]
    CodeHashFiltered {
        /// Rejected operator
        operator: Account,
        /// Hex fingerprint
        code_hash: String,
    },

    /// Caller is not a registered minter.
    #[error("Not a minter: {account}")]
    NotMinter {
        /// Caller
        account: Account,
    },

    /// Recipient already owns part, but not all, of the region.
    #[error("Partially covered: {region}")]
    PartiallyCovered {
        /// Region that was requested
        region: Region,
    },

    /// Administrative capability check failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl LedgerError {
    /// Category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            LedgerError::InvalidSize { .. }
            | LedgerError::OutOfBounds { .. }
            | LedgerError::Misaligned { .. }
            | LedgerError::InvalidRegionId { .. }
            | LedgerError::ZeroRecipient
            | LedgerError::ZeroOperator
            | LedgerError::SelfApproval
            | LedgerError::DuplicateOrOverlap { .. }
            | LedgerError::NotApprovable { .. }
            | LedgerError::AlreadyOwned { .. }
            | LedgerError::PartiallyCovered { .. } => ErrorCategory::Validation,
            LedgerError::NotOwner { .. }
            | LedgerError::NotApproved { .. }
            | LedgerError::OperatorFiltered { .. }
            | LedgerError::CodeHashFiltered { .. }
            | LedgerError::NotMinter { .. } => ErrorCategory::Authorization,
            LedgerError::NoOwner { .. } => ErrorCategory::Consistency,
            LedgerError::Auth(err) => err.category(),
        }
    }
}
