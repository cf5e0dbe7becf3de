//! Static Operator Allow-List Adapter
//!
//! Implements `OperatorFilter` from explicit block lists.

use crate::ports::OperatorFilter;
use shared_types::{Account, CodeHash, EMPTY_CODE_HASH};
use std::collections::{HashMap, HashSet};

/// In-memory allow-list.
///
/// Everything is allowed unless blocked. Accounts without a registered
/// fingerprint carry `EMPTY_CODE_HASH`, which is never filtered.
#[derive(Clone, Debug, Default)]
pub struct StaticOperatorFilter {
    blocked_operators: HashSet<Account>,
    blocked_code_hashes: HashSet<CodeHash>,
    fingerprints: HashMap<Account, CodeHash>,
}

impl StaticOperatorFilter {
    /// Create a filter that allows everyone.
    pub fn new() -> Self {
        Self::default()
    }

    /// Block an operator address.
    pub fn block_operator(mut self, operator: Account) -> Self {
        self.blocked_operators.insert(operator);
        self
    }

    /// Block a code fingerprint.
    pub fn block_code_hash(mut self, code_hash: CodeHash) -> Self {
        self.blocked_code_hashes.insert(code_hash);
        self
    }

    /// Register the fingerprint of an account.
    pub fn with_fingerprint(mut self, account: Account, code_hash: CodeHash) -> Self {
        self.fingerprints.insert(account, code_hash);
        self
    }
}

impl OperatorFilter for StaticOperatorFilter {
    fn is_operator_allowed(&self, operator: &Account) -> bool {
        !self.blocked_operators.contains(operator)
    }

    fn is_code_hash_allowed(&self, code_hash: &CodeHash) -> bool {
        *code_hash == EMPTY_CODE_HASH || !self.blocked_code_hashes.contains(code_hash)
    }

    fn fingerprint_of(&self, account: &Account) -> CodeHash {
        self.fingerprints
            .get(account)
            .copied()
            .unwrap_or(EMPTY_CODE_HASH)
    }
}
