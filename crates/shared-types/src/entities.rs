//! # Core Entities
//!
//! Identities used across the ledger and the bridge.
//!
//! - `Account`: 20-byte address of a holder, operator or endpoint
//! - `DomainId`: one of the two independently operated ledgers
//! - `CodeHash`: code fingerprint consulted by the operator allow-list

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte code fingerprint.
pub type CodeHash = [u8; 32];

/// Fingerprint of an account that carries no code.
pub const EMPTY_CODE_HASH: CodeHash = [0u8; 32];

/// A 20-byte account address.
///
/// The all-zero address is the null account: it never owns anything and is
/// rejected wherever a recipient or operator is required.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Account(pub [u8; 20]);

impl Account {
    /// The null account.
    pub const ZERO: Account = Account([0u8; 20]);

    /// Check if this is the null account.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Build an account whose last eight bytes hold `value` (big-endian).
    ///
    /// Handy for tests and for deriving deterministic endpoint accounts.
    pub fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&value.to_be_bytes());
        Account(bytes)
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl From<[u8; 20]> for Account {
    fn from(bytes: [u8; 20]) -> Self {
        Account(bytes)
    }
}

/// Identifier of one side of the bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DomainId(pub u32);

impl DomainId {
    /// Conventional id of the first domain.
    pub const A: DomainId = DomainId(1);
    /// Conventional id of the second domain.
    pub const B: DomainId = DomainId(2);
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "domain-{}", self.0)
    }
}
