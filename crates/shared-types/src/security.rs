//! # Administrator Capability
//!
//! A component that has an administrative surface receives an `Administrator`
//! at construction. The capability names exactly one account and moves only
//! through `change`, which the current holder must call.

use crate::entities::Account;
use crate::errors::AuthError;
use serde::Serialize;
use tracing::info;

/// Administrative capability bound to a single account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Administrator {
    account: Account,
}

impl Administrator {
    /// Bind the capability to `account`.
    pub fn new(account: Account) -> Result<Self, AuthError> {
        if account.is_zero() {
            return Err(AuthError::ZeroAdministrator);
        }
        Ok(Self { account })
    }

    /// Current holder.
    pub fn account(&self) -> Account {
        self.account
    }

    /// Check if `caller` holds the capability.
    pub fn is(&self, caller: &Account) -> bool {
        self.account == *caller
    }

    /// Fail with `NotAuthorized` unless `caller` holds the capability.
    pub fn ensure(&self, caller: &Account) -> Result<(), AuthError> {
        if !self.is(caller) {
            return Err(AuthError::NotAuthorized { caller: *caller });
        }
        Ok(())
    }

    /// Hand the capability to `new_admin`. Returns the previous holder.
    pub fn change(&mut self, caller: &Account, new_admin: Account) -> Result<Account, AuthError> {
        self.ensure(caller)?;
        if new_admin.is_zero() {
            return Err(AuthError::ZeroAdministrator);
        }
        let previous = self.account;
        self.account = new_admin;
        info!(previous = %previous, current = %new_admin, "Administrator changed");
        Ok(previous)
    }
}
