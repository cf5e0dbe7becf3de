//! # Migration Flows
//!
//! Replacing domain A's bridge endpoint while regions sit in its custody.
//!
//! ## Flows Tested
//!
//! 1. **Authorization**: only the migration admin may migrate; only regions
//!    held by the old endpoint move
//! 2. **Replacement**: custody moves to the new endpoint, which then releases
//!    returning regions
//! 3. **Migrate and release**: re-escrow and bridge onward in one step, gated
//!    by the old endpoint's grant

#[cfg(test)]
mod tests {
    use bridge_runtime::{endpoint_account, BridgeNetwork, RuntimeConfig};
    use qb_01_quad_ledger::{LedgerError, Region};
    use qb_02_bridge::{BridgeConfig, BridgeEndpoint, BridgeError};
    use qb_03_migration::{MigrationCoordinator, MigrationError};
    use shared_types::{Account, Administrator, AuthError, DomainId};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn admin() -> Account {
        Account::from_low_u64(0xAD)
    }

    fn migration_admin() -> Account {
        Account::from_low_u64(0x3A)
    }

    fn alice() -> Account {
        Account::from_low_u64(0xA1)
    }

    fn bob() -> Account {
        Account::from_low_u64(0xB0)
    }

    fn old_endpoint() -> Account {
        endpoint_account(DomainId::A)
    }

    fn new_endpoint() -> Account {
        Account::from_low_u64(0xE9)
    }

    fn region(side: u32, x: u32, y: u32) -> Region {
        Region::new(side, x, y).unwrap()
    }

    /// Alice has bridged a 12x12 to bob, so A's endpoint holds it in custody.
    fn network_with_custody() -> BridgeNetwork {
        let config = RuntimeConfig {
            relay_delay_ticks: 0,
            ..RuntimeConfig::default()
        };
        let mut net = BridgeNetwork::new(&config, admin()).unwrap();
        net.domain_mut(DomainId::A)
            .unwrap()
            .ledger
            .mint(admin(), alice(), region(24, 0, 0), &[])
            .unwrap();
        net.bridge(DomainId::A, alice(), bob(), &[region(12, 0, 0)], &[])
            .unwrap();
        assert_eq!(net.pump().applied.len(), 1);
        net
    }

    fn coordinator() -> MigrationCoordinator {
        MigrationCoordinator::new(
            old_endpoint(),
            new_endpoint(),
            Administrator::new(migration_admin()).unwrap(),
        )
        .unwrap()
    }

    fn replacement_endpoint() -> BridgeEndpoint {
        let mut endpoint = BridgeEndpoint::new(
            DomainId::A,
            new_endpoint(),
            Administrator::new(admin()).unwrap(),
            BridgeConfig::default(),
        )
        .unwrap();
        endpoint
            .set_trusted_peer(admin(), DomainId::B, endpoint_account(DomainId::B))
            .unwrap();
        endpoint
    }

    /// Install the replacement on A, point B at it, return the old endpoint.
    fn swap_endpoints(net: &mut BridgeNetwork) -> BridgeEndpoint {
        let a = net.domain_mut(DomainId::A).unwrap();
        a.ledger.set_minter(admin(), new_endpoint(), true).unwrap();
        let old = std::mem::replace(&mut a.endpoint, replacement_endpoint());
        net.domain_mut(DomainId::B)
            .unwrap()
            .endpoint
            .set_trusted_peer(admin(), DomainId::A, new_endpoint())
            .unwrap();
        old
    }

    // =========================================================================
    // AUTHORIZATION
    // =========================================================================

    #[test]
    fn test_migrate_by_non_admin_rejected() {
        let mut net = network_with_custody();
        let ledger = &mut net.domain_mut(DomainId::A).unwrap().ledger;
        let result = coordinator().migrate_regions(alice(), ledger, &[region(12, 0, 0)]);
        assert_eq!(
            result,
            Err(MigrationError::Auth(AuthError::NotAuthorized { caller: alice() }))
        );
        assert_eq!(ledger.owner_of(region(12, 0, 0).id()), Ok(old_endpoint()));
    }

    #[test]
    fn test_migrate_region_not_in_custody() {
        let mut net = network_with_custody();
        let ledger = &mut net.domain_mut(DomainId::A).unwrap().ledger;
        let result =
            coordinator().migrate_regions(migration_admin(), ledger, &[region(12, 12, 0)]);
        assert!(matches!(
            result,
            Err(MigrationError::Ledger(LedgerError::NotOwner { .. }))
        ));
        assert_eq!(ledger.owner_of(region(12, 12, 0).id()), Ok(alice()));
    }

    #[test]
    fn test_migration_batch_is_atomic() {
        let mut net = network_with_custody();
        let ledger = &mut net.domain_mut(DomainId::A).unwrap().ledger;
        let result = coordinator().migrate_regions(
            migration_admin(),
            ledger,
            &[region(6, 0, 0), region(6, 12, 0)],
        );
        assert!(result.is_err());
        assert_eq!(ledger.owner_of(region(12, 0, 0).id()), Ok(old_endpoint()));
    }

    // =========================================================================
    // REPLACEMENT
    // =========================================================================

    #[test]
    fn test_new_endpoint_releases_migrated_custody() {
        let mut net = network_with_custody();
        coordinator()
            .migrate_regions(
                migration_admin(),
                &mut net.domain_mut(DomainId::A).unwrap().ledger,
                &[region(12, 0, 0)],
            )
            .unwrap();
        swap_endpoints(&mut net);

        net.bridge(DomainId::B, bob(), alice(), &[region(12, 0, 0)], &[])
            .unwrap();
        let report = net.pump();
        assert_eq!(report.applied.len(), 1, "failures: {:?}", report.failed);

        let a = net.domain(DomainId::A).unwrap();
        assert!(a.ledger.exists(region(24, 0, 0)));
        assert_eq!(a.ledger.balance_of(&new_endpoint()), 0);
        assert_eq!(a.ledger.balance_of(&old_endpoint()), 0);
    }

    #[test]
    fn test_old_endpoint_no_longer_trusted() {
        let mut net = network_with_custody();
        let mut old = swap_endpoints(&mut net);

        // the retired endpoint can still escrow, but B rejects what it sends
        let (domain, relay) = net.domain_with_relay(DomainId::A).unwrap();
        old.send_to_other_domain(
            &mut domain.ledger,
            relay,
            alice(),
            bob(),
            &[region(6, 12, 12)],
            &[],
        )
        .unwrap();
        let report = net.pump();
        assert!(matches!(
            report.failed.as_slice(),
            [(_, BridgeError::UntrustedSender { .. })]
        ));
    }

    // =========================================================================
    // MIGRATE AND RELEASE
    // =========================================================================

    #[test]
    fn test_migrate_and_release_without_grant() {
        let mut net = network_with_custody();
        swap_endpoints(&mut net);
        let (domain, relay) = net.domain_with_relay(DomainId::A).unwrap();
        let result = coordinator().migrate_and_release(
            migration_admin(),
            &mut domain.ledger,
            &mut domain.endpoint,
            relay,
            bob(),
            &[region(12, 0, 0)],
            &[],
        );
        assert_eq!(
            result,
            Err(MigrationError::Auth(AuthError::NotAuthorized {
                caller: new_endpoint()
            }))
        );
        assert_eq!(
            domain.ledger.owner_of(region(12, 0, 0).id()),
            Ok(old_endpoint())
        );
    }

    #[test]
    fn test_migrate_and_release_with_grant() {
        let mut net = network_with_custody();
        // a second bundle is escrowed by the old endpoint but never delivered
        net.bridge(DomainId::A, alice(), bob(), &[region(12, 12, 0)], &[])
            .unwrap();
        assert_eq!(net.relay_mut().take_ready().len(), 1);
        let mut old = swap_endpoints(&mut net);

        let (domain, relay) = net.domain_with_relay(DomainId::A).unwrap();
        old.approve_new_endpoint(admin(), &mut domain.ledger, new_endpoint())
            .unwrap();
        coordinator()
            .migrate_and_release(
                migration_admin(),
                &mut domain.ledger,
                &mut domain.endpoint,
                relay,
                bob(),
                &[region(12, 12, 0)],
                b"migrated",
            )
            .unwrap();
        assert_eq!(
            domain.ledger.owner_of(region(12, 12, 0).id()),
            Ok(new_endpoint())
        );

        let report = net.pump();
        assert_eq!(report.applied.len(), 1, "failures: {:?}", report.failed);
        let b = net.domain(DomainId::B).unwrap();
        assert_eq!(b.ledger.owner_of(region(12, 12, 0).id()), Ok(bob()));
        assert_eq!(b.ledger.balance_of(&bob()), 288);
    }

    #[test]
    fn test_grant_is_one_time() {
        let mut net = network_with_custody();
        let mut old = swap_endpoints(&mut net);
        let ledger = &mut net.domain_mut(DomainId::A).unwrap().ledger;
        old.approve_new_endpoint(admin(), ledger, new_endpoint())
            .unwrap();
        assert_eq!(
            old.approve_new_endpoint(admin(), ledger, new_endpoint()),
            Err(BridgeError::GrantAlreadyIssued {
                endpoint: new_endpoint()
            })
        );
    }
}
