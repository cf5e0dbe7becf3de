//! # Error Types
//!
//! Error types and classification shared across subsystems.

use crate::entities::Account;
use thiserror::Error;

/// Authorization failures raised by the administrator capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Caller does not hold the required capability.
    #[error("Not authorized: {caller} is not the administrator")]
    NotAuthorized { caller: Account },

    /// An administrator capability cannot be bound to the null account.
    #[error("Administrator cannot be the zero account")]
    ZeroAdministrator,
}

/// Coarse classification of a rejected call.
///
/// Every error in the system falls in exactly one category; callers use it to
/// decide whether retrying with other input, later, or never makes sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed or conflicting input. Retry with corrected input.
    Validation,
    /// Caller lacks ownership, approval or capability.
    Authorization,
    /// Rejected by pause state or capacity limits. Retry later or smaller.
    Admission,
    /// Ownership is ambiguous for the requested region.
    Consistency,
    /// The relay channel refused the message.
    Transport,
}

impl AuthError {
    /// Category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            AuthError::NotAuthorized { .. } => ErrorCategory::Authorization,
            AuthError::ZeroAdministrator => ErrorCategory::Validation,
        }
    }
}
