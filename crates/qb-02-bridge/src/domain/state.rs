//! # Endpoint State
//!
//! Lifecycle, peer and inbound results of a bridge endpoint.

use super::message::MessageId;
use qb_01_quad_ledger::Disposition;
use serde::{Deserialize, Serialize};
use shared_types::{Account, DomainId};

/// Whether the endpoint accepts outbound requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointState {
    /// Accepting requests.
    #[default]
    Active,
    /// Refusing outbound requests with `Paused`.
    Paused,
}

/// The single endpoint messages are accepted from and sent to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedPeer {
    /// Peer's domain.
    pub domain: DomainId,
    /// Peer endpoint account.
    pub account: Account,
}

/// Result of handling one inbound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundOutcome {
    /// Regions released to the recipient.
    Applied {
        /// Message handled.
        id: MessageId,
        /// How each region was materialized, in message order.
        dispositions: Vec<Disposition>,
    },
    /// Message was already processed. Ledger untouched.
    Duplicate {
        /// Message seen before.
        id: MessageId,
    },
}

impl InboundOutcome {
    /// Id of the handled message.
    pub fn id(&self) -> MessageId {
        match self {
            InboundOutcome::Applied { id, .. } | InboundOutcome::Duplicate { id } => *id,
        }
    }

    /// Check if this delivery changed the ledger.
    pub fn is_applied(&self) -> bool {
        matches!(self, InboundOutcome::Applied { .. })
    }
}
