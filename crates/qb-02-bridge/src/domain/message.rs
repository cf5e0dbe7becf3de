//! # Bridge Messages
//!
//! The bundle one endpoint hands to the relay for its peer.
//!
//! Messages travel as opaque bincode payloads. The `MessageId` is a SHA-256
//! digest over every field, so an exact redelivery is recognized while a
//! re-sent request (new nonce) is not.

use super::errors::BridgeError;
use qb_01_quad_ledger::Region;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::{Account, DomainId};
use std::fmt;

/// Digest identifying one bridge message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub [u8; 32]);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

/// Regions in flight from one domain to the other.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeMessage {
    /// Domain of the sending endpoint.
    pub source_domain: DomainId,
    /// Domain of the receiving endpoint.
    pub destination_domain: DomainId,
    /// Account of the sending endpoint.
    pub sender: Account,
    /// Per-sender sequence number.
    pub nonce: u64,
    /// Regions to release on the destination.
    pub regions: Vec<Region>,
    /// Receiver of the regions.
    pub recipient: Account,
    /// Opaque payload passed through to the ledger.
    pub data: Vec<u8>,
}

impl BridgeMessage {
    /// Content digest.
    pub fn id(&self) -> MessageId {
        let mut hasher = Sha256::new();
        hasher.update(self.source_domain.0.to_be_bytes());
        hasher.update(self.destination_domain.0.to_be_bytes());
        hasher.update(self.sender.as_bytes());
        hasher.update(self.nonce.to_be_bytes());
        hasher.update((self.regions.len() as u64).to_be_bytes());
        for region in &self.regions {
            hasher.update(region.id().0.to_be_bytes());
        }
        hasher.update(self.recipient.as_bytes());
        hasher.update((self.data.len() as u64).to_be_bytes());
        hasher.update(&self.data);
        MessageId(hasher.finalize().into())
    }

    /// Serialize for the relay.
    pub fn encode(&self) -> Result<Vec<u8>, BridgeError> {
        bincode::serialize(self).map_err(|e| BridgeError::MalformedMessage(e.to_string()))
    }

    /// Parse a relay payload. Region anchors are re-validated.
    pub fn decode(payload: &[u8]) -> Result<Self, BridgeError> {
        bincode::deserialize(payload).map_err(|e| BridgeError::MalformedMessage(e.to_string()))
    }
}
