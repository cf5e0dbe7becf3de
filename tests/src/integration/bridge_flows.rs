//! # Bridge Flows
//!
//! Escrow on one domain, relay, release on the other.
//!
//! ## Flows Tested
//!
//! 1. **Round trip**: A -> B -> A ends with the original holder and empty custody
//! 2. **Redelivery**: the same message twice mints once
//! 3. **Out of order**: bundles delivered in reverse order both apply
//! 4. **Admission**: pause, batch size and relay outage
//! 5. **Atomic release**: a blocked region fails the whole bundle

#[cfg(test)]
mod tests {
    use bridge_runtime::{endpoint_account, BridgeNetwork, NetworkError, RuntimeConfig};
    use qb_01_quad_ledger::{Disposition, LedgerError, LedgerEvent, Region};
    use qb_02_bridge::{BridgeError, BridgeMessage, InboundOutcome};
    use shared_types::{Account, DomainId};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn admin() -> Account {
        Account::from_low_u64(0xAD)
    }

    fn alice() -> Account {
        Account::from_low_u64(0xA1)
    }

    fn bob() -> Account {
        Account::from_low_u64(0xB0)
    }

    fn carol() -> Account {
        Account::from_low_u64(0xC0)
    }

    fn region(side: u32, x: u32, y: u32) -> Region {
        Region::new(side, x, y).unwrap()
    }

    /// Network with zero relay delay where alice holds a 24x24 on A.
    fn network() -> BridgeNetwork {
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
        net
    }

    fn owner(net: &BridgeNetwork, domain: DomainId, region: Region) -> Result<Account, LedgerError> {
        net.domain(domain).unwrap().ledger.owner_of(region.id())
    }

    // =========================================================================
    // ROUND TRIP
    // =========================================================================

    #[test]
    fn test_round_trip_restores_holder() {
        let mut net = network();
        let part = region(12, 12, 0);

        net.bridge(DomainId::A, alice(), bob(), &[part], &[]).unwrap();
        assert_eq!(owner(&net, DomainId::A, part), Ok(endpoint_account(DomainId::A)));
        assert_eq!(net.pump().applied.len(), 1);
        assert_eq!(owner(&net, DomainId::B, part), Ok(bob()));

        net.bridge(DomainId::B, bob(), alice(), &[part], &[]).unwrap();
        assert_eq!(net.pump().applied.len(), 1);

        let a = net.domain(DomainId::A).unwrap();
        assert!(a.ledger.exists(region(24, 0, 0)));
        assert_eq!(a.ledger.balance_of(&alice()), 576);
        assert_eq!(a.ledger.balance_of(&endpoint_account(DomainId::A)), 0);
        assert_eq!(a.ledger.record_count(), 1);
        assert_eq!(owner(&net, DomainId::B, part), Ok(endpoint_account(DomainId::B)));
    }

    #[test]
    fn test_second_trip_releases_from_custody() {
        let mut net = network();
        let part = region(6, 0, 0);
        net.bridge(DomainId::A, alice(), bob(), &[part], &[]).unwrap();
        net.pump();
        net.bridge(DomainId::B, bob(), alice(), &[part], &[]).unwrap();
        net.pump();

        net.bridge(DomainId::A, alice(), carol(), &[part], &[]).unwrap();
        let (domain, relay) = net.domain_with_relay(DomainId::B).unwrap();
        let envelope = relay.take_ready().remove(0);
        let outcome = domain
            .endpoint
            .on_message_received(&mut domain.ledger, envelope.sender, &envelope.payload)
            .unwrap();
        assert!(matches!(
            outcome,
            InboundOutcome::Applied { ref dispositions, .. } if dispositions == &vec![Disposition::Release]
        ));
        assert_eq!(owner(&net, DomainId::B, part), Ok(carol()));
    }

    // =========================================================================
    // REDELIVERY
    // =========================================================================

    #[test]
    fn test_double_delivery_mints_once() {
        let mut net = network();
        let part = region(3, 0, 0);
        net.bridge(DomainId::A, alice(), bob(), &[part], &[]).unwrap();

        let (domain, relay) = net.domain_with_relay(DomainId::B).unwrap();
        let envelope = relay.take_ready().remove(0);
        let first = domain
            .endpoint
            .on_message_received(&mut domain.ledger, envelope.sender, &envelope.payload)
            .unwrap();
        let second = domain
            .endpoint
            .on_message_received(&mut domain.ledger, envelope.sender, &envelope.payload)
            .unwrap();

        assert!(first.is_applied());
        assert!(!second.is_applied());
        assert_eq!(first.id(), second.id());
        let minted = domain
            .ledger
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, LedgerEvent::Minted { .. }))
            .count();
        assert_eq!(minted, 1);
        assert_eq!(domain.ledger.balance_of(&bob()), 9);
    }

    #[test]
    fn test_relay_redelivery_counted_as_duplicate() {
        let mut net = network();
        net.bridge(DomainId::A, alice(), bob(), &[region(1, 0, 0)], &[])
            .unwrap();
        net.pump();
        net.relay_mut().redeliver_last();
        let report = net.pump();
        assert_eq!(report.duplicates, 1);
        assert!(report.failed.is_empty());
    }

    #[test]
    fn test_resent_content_is_already_satisfied() {
        let mut net = network();
        let quads = [region(3, 0, 0), region(3, 3, 0), region(3, 0, 3), region(3, 3, 3)];
        net.bridge(DomainId::A, alice(), bob(), &quads, b"first").unwrap();
        net.pump();

        // Same cells re-sent under a new nonce, as one 6x6.
        let message = BridgeMessage {
            source_domain: DomainId::A,
            destination_domain: DomainId::B,
            sender: endpoint_account(DomainId::A),
            nonce: 42,
            regions: vec![region(6, 0, 0)],
            recipient: bob(),
            data: b"again".to_vec(),
        };
        let payload = message.encode().unwrap();
        let b = net.domain_mut(DomainId::B).unwrap();
        let outcome = b
            .endpoint
            .on_message_received(&mut b.ledger, endpoint_account(DomainId::A), &payload)
            .unwrap();
        assert!(matches!(
            outcome,
            InboundOutcome::Applied { ref dispositions, .. } if dispositions == &vec![Disposition::AlreadySatisfied]
        ));
        assert_eq!(b.ledger.balance_of(&bob()), 36);
    }

    // =========================================================================
    // ORDERING
    // =========================================================================

    #[test]
    fn test_out_of_order_delivery() {
        let mut net = network();
        net.bridge(DomainId::A, alice(), bob(), &[region(6, 0, 0)], &[])
            .unwrap();
        net.bridge(DomainId::A, alice(), carol(), &[region(6, 6, 0)], &[])
            .unwrap();

        let (domain, relay) = net.domain_with_relay(DomainId::B).unwrap();
        let mut envelopes = relay.take_ready();
        assert_eq!(envelopes.len(), 2);
        envelopes.reverse();
        for envelope in envelopes {
            let outcome = domain
                .endpoint
                .on_message_received(&mut domain.ledger, envelope.sender, &envelope.payload)
                .unwrap();
            assert!(outcome.is_applied());
        }
        assert_eq!(owner(&net, DomainId::B, region(6, 0, 0)), Ok(bob()));
        assert_eq!(owner(&net, DomainId::B, region(6, 6, 0)), Ok(carol()));
    }

    // =========================================================================
    // ADMISSION
    // =========================================================================

    #[test]
    fn test_pause_gating() {
        let mut net = network();
        net.domain_mut(DomainId::A)
            .unwrap()
            .endpoint
            .pause(admin())
            .unwrap();
        let result = net.bridge(DomainId::A, alice(), bob(), &[region(3, 0, 0)], &[]);
        assert!(matches!(result, Err(NetworkError::Bridge(BridgeError::Paused))));
        assert_eq!(owner(&net, DomainId::A, region(24, 0, 0)), Ok(alice()));

        net.domain_mut(DomainId::A)
            .unwrap()
            .endpoint
            .unpause(admin())
            .unwrap();
        assert!(net
            .bridge(DomainId::A, alice(), bob(), &[region(3, 0, 0)], &[])
            .is_ok());
    }

    #[test]
    fn test_paused_destination_still_receives() {
        let mut net = network();
        net.bridge(DomainId::A, alice(), bob(), &[region(3, 0, 0)], &[])
            .unwrap();
        net.domain_mut(DomainId::B)
            .unwrap()
            .endpoint
            .pause(admin())
            .unwrap();
        assert_eq!(net.pump().applied.len(), 1);
        assert_eq!(owner(&net, DomainId::B, region(3, 0, 0)), Ok(bob()));
    }

    #[test]
    fn test_max_quads_default_limit() {
        let mut net = network();
        let cells: Vec<Region> = (0..145).map(|i| region(1, i % 24, i / 24)).collect();
        let result = net.bridge(DomainId::A, alice(), bob(), &cells, &[]);
        assert!(matches!(
            result,
            Err(NetworkError::Bridge(BridgeError::ExceedsMaxQuads {
                requested: 145,
                limit: 144
            }))
        ));
        assert!(net
            .bridge(DomainId::A, alice(), bob(), &cells[..144], &[])
            .is_ok());
    }

    #[test]
    fn test_outage_leaves_regions_with_owner() {
        let mut net = network();
        net.domain_mut(DomainId::A).unwrap().ledger.take_events();
        net.relay_mut().set_outage(true);
        let result = net.bridge(DomainId::A, alice(), bob(), &[region(12, 0, 0)], &[]);
        assert!(matches!(result, Err(NetworkError::Bridge(BridgeError::Relay(_)))));
        let a = net.domain(DomainId::A).unwrap();
        assert!(a.ledger.exists(region(24, 0, 0)));
        assert_eq!(a.endpoint.next_nonce(), 0);
        let a = net.domain_mut(DomainId::A).unwrap();
        assert!(a.ledger.take_events().is_empty());
    }

    // =========================================================================
    // ATOMIC RELEASE
    // =========================================================================

    #[test]
    fn test_blocked_region_fails_whole_bundle() {
        let mut net = network();
        net.domain_mut(DomainId::B)
            .unwrap()
            .ledger
            .mint(admin(), carol(), region(1, 7, 7), &[])
            .unwrap();
        net.bridge(
            DomainId::A,
            alice(),
            bob(),
            &[region(6, 0, 0), region(6, 6, 6)],
            &[],
        )
        .unwrap();

        let report = net.pump();
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(
            report.failed[0],
            (DomainId::B, BridgeError::Ledger(LedgerError::AlreadyOwned { .. }))
        ));
        let b = net.domain(DomainId::B).unwrap();
        assert_eq!(b.ledger.balance_of(&bob()), 0);
        // escrow on the source is not undone automatically
        assert_eq!(
            owner(&net, DomainId::A, region(6, 0, 0)),
            Ok(endpoint_account(DomainId::A))
        );
    }

    #[test]
    fn test_partially_covered_destination_rejected() {
        let mut net = network();
        net.domain_mut(DomainId::B)
            .unwrap()
            .ledger
            .mint(admin(), bob(), region(1, 0, 0), &[])
            .unwrap();
        net.bridge(DomainId::A, alice(), bob(), &[region(3, 0, 0)], &[])
            .unwrap();
        let report = net.pump();
        assert!(matches!(
            report.failed.as_slice(),
            [(_, BridgeError::Ledger(LedgerError::PartiallyCovered { .. }))]
        ));
    }
}
