//! # Domain Errors
//!
//! Error types for the Bridge Endpoint and the relay channel.

use qb_01_quad_ledger::LedgerError;
use shared_types::{Account, AuthError, DomainId, ErrorCategory};
use thiserror::Error;

/// Relay channel errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// The channel is down and refuses new messages.
    #[error("Relay unavailable")]
    Unavailable,

    /// No route to the destination domain.
    #[error("Unknown destination: {domain}")]
    UnknownDestination {
        /// Requested destination
        domain: DomainId,
    },
}

/// Bridge endpoint error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// Endpoint is paused.
    #[error("Endpoint is paused")]
    Paused,

    /// Too many regions in one request.
    #[error("Exceeds max quads: {requested} > {limit}")]
    ExceedsMaxQuads {
        /// Regions requested
        requested: usize,
        /// Configured limit
        limit: usize,
    },

    /// Estimated destination cost is over the budget.
    #[error("Exceeds destination budget: {cost} > {limit}")]
    ExceedsDestinationBudget {
        /// Estimated cost
        cost: u64,
        /// Configured budget
        limit: u64,
    },

    /// Request names no regions.
    #[error("Empty batch")]
    EmptyBatch,

    /// Message did not come from the trusted peer.
    #[error("Untrusted sender: {sender}")]
    UntrustedSender {
        /// Claimed sender
        sender: Account,
    },

    /// No peer endpoint configured.
    #[error("No trusted peer configured")]
    NoTrustedPeer,

    /// Payload could not be encoded or decoded.
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// Message is addressed to another domain.
    #[error("Wrong destination: expected {expected}, got {actual}")]
    WrongDestination {
        /// This endpoint's domain
        expected: DomainId,
        /// Domain named in the message
        actual: DomainId,
    },

    /// Null account where an address is required.
    #[error("Zero address")]
    ZeroAddress,

    /// Configuration rejected by validation.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Migration grant already issued to this endpoint.
    #[error("Grant already issued to {endpoint}")]
    GrantAlreadyIssued {
        /// Grantee
        endpoint: Account,
    },

    /// Ledger rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Relay refused the message.
    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),

    /// Administrator check failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl BridgeError {
    /// Category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            BridgeError::Paused
            | BridgeError::ExceedsMaxQuads { .. }
            | BridgeError::ExceedsDestinationBudget { .. } => ErrorCategory::Admission,
            BridgeError::EmptyBatch
            | BridgeError::MalformedMessage(_)
            | BridgeError::WrongDestination { .. }
            | BridgeError::ZeroAddress
            | BridgeError::InvalidConfig(_)
            | BridgeError::GrantAlreadyIssued { .. } => ErrorCategory::Validation,
            BridgeError::UntrustedSender { .. } | BridgeError::NoTrustedPeer => {
                ErrorCategory::Authorization
            }
            BridgeError::Ledger(err) => err.category(),
            BridgeError::Relay(_) => ErrorCategory::Transport,
            BridgeError::Auth(err) => err.category(),
        }
    }
}
