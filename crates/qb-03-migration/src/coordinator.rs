//! # Migration Coordinator
//!
//! Administrator-only procedure moving holdings escrowed by an old bridge
//! endpoint to a new one on the same ledger.
//!
//! Holds no progress state: every call is atomic and self-contained.

use crate::domain::MigrationError;
use qb_01_quad_ledger::{QuadLedger, Region};
use qb_02_bridge::{BridgeEndpoint, MessageId, RelayChannel};
use shared_types::{Account, Administrator, AuthError};
use tracing::info;

/// Coordinator bound to one old/new endpoint pair.
#[derive(Debug)]
pub struct MigrationCoordinator {
    old_endpoint: Account,
    new_endpoint: Account,
    admin: Administrator,
}

impl MigrationCoordinator {
    /// Bind a coordinator to `old_endpoint` and `new_endpoint`.
    pub fn new(
        old_endpoint: Account,
        new_endpoint: Account,
        admin: Administrator,
    ) -> Result<Self, MigrationError> {
        if old_endpoint.is_zero() || new_endpoint.is_zero() {
            return Err(MigrationError::ZeroEndpoint);
        }
        if old_endpoint == new_endpoint {
            return Err(MigrationError::SameEndpoint {
                endpoint: old_endpoint,
            });
        }
        Ok(Self {
            old_endpoint,
            new_endpoint,
            admin,
        })
    }

    /// Endpoint holdings are taken from.
    pub fn old_endpoint(&self) -> Account {
        self.old_endpoint
    }

    /// Endpoint holdings are moved to.
    pub fn new_endpoint(&self) -> Account {
        self.new_endpoint
    }

    /// Migration administrator.
    pub fn administrator(&self) -> Account {
        self.admin.account()
    }

    /// Hand the migration capability to `new_admin`.
    pub fn change_administrator(
        &mut self,
        caller: Account,
        new_admin: Account,
    ) -> Result<(), MigrationError> {
        self.admin.change(&caller, new_admin)?;
        Ok(())
    }

    /// Transfer `regions`, whole-owned by the old endpoint, to the new one.
    pub fn migrate_regions(
        &self,
        caller: Account,
        ledger: &mut QuadLedger,
        regions: &[Region],
    ) -> Result<(), MigrationError> {
        self.admin.ensure(&caller)?;
        if regions.is_empty() {
            return Err(MigrationError::EmptyBatch);
        }
        ledger.batch_transfer(
            self.old_endpoint,
            self.old_endpoint,
            self.new_endpoint,
            regions,
            &[],
        )?;
        info!(
            from = %self.old_endpoint,
            to = %self.new_endpoint,
            regions = regions.len(),
            "[qb-03] Regions migrated"
        );
        Ok(())
    }

    /// Re-escrow `regions` under the new endpoint and send them on to its
    /// peer for `recipient` in one step.
    ///
    /// Requires the old endpoint's `approve_new_endpoint` grant.
    #[allow(clippy::too_many_arguments)]
    pub fn migrate_and_release(
        &self,
        caller: Account,
        ledger: &mut QuadLedger,
        endpoint: &mut BridgeEndpoint,
        relay: &mut dyn RelayChannel,
        recipient: Account,
        regions: &[Region],
        data: &[u8],
    ) -> Result<MessageId, MigrationError> {
        self.admin.ensure(&caller)?;
        if endpoint.account() != self.new_endpoint {
            return Err(MigrationError::EndpointMismatch {
                expected: self.new_endpoint,
                actual: endpoint.account(),
            });
        }
        if regions.is_empty() {
            return Err(MigrationError::EmptyBatch);
        }
        if !ledger.is_approved_for_all(&self.old_endpoint, &self.new_endpoint) {
            return Err(AuthError::NotAuthorized {
                caller: self.new_endpoint,
            }
            .into());
        }

        let id = endpoint.forward_escrowed(
            ledger,
            relay,
            self.old_endpoint,
            recipient,
            regions,
            data,
        )?;
        info!(
            id = %id,
            from = %self.old_endpoint,
            via = %self.new_endpoint,
            recipient = %recipient,
            "[qb-03] Regions migrated and released"
        );
        Ok(id)
    }
}
