//! # Domain Errors
//!
//! Error types for the Migration Coordinator.

use qb_01_quad_ledger::LedgerError;
use qb_02_bridge::BridgeError;
use shared_types::{Account, AuthError, ErrorCategory};
use thiserror::Error;

/// Migration error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MigrationError {
    /// Old or new endpoint is the null account.
    #[error("Endpoint address cannot be zero")]
    ZeroEndpoint,

    /// Old and new endpoint are the same account.
    #[error("Old and new endpoint are the same: {endpoint}")]
    SameEndpoint {
        /// The repeated endpoint
        endpoint: Account,
    },

    /// Endpoint handed in is not the coordinator's new endpoint.
    #[error("Endpoint mismatch: expected {expected}, got {actual}")]
    EndpointMismatch {
        /// Configured new endpoint
        expected: Account,
        /// Endpoint supplied
        actual: Account,
    },

    /// Request names no regions.
    #[error("Empty batch")]
    EmptyBatch,

    /// Caller is not the migration administrator, or the new endpoint holds
    /// no grant over the old endpoint's holdings.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Ledger rejected the transfer.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// New endpoint rejected the onward send.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl MigrationError {
    /// Category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            MigrationError::ZeroEndpoint
            | MigrationError::SameEndpoint { .. }
            | MigrationError::EndpointMismatch { .. }
            | MigrationError::EmptyBatch => ErrorCategory::Validation,
            MigrationError::Auth(err) => err.category(),
            MigrationError::Ledger(err) => err.category(),
            MigrationError::Bridge(err) => err.category(),
        }
    }
}
