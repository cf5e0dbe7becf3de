//! # Bridge Network
//!
//! Two domains, each with its own ledger and endpoint, joined by one relay.
//!
//! ```text
//! Domain A { ledger, endpoint } ──┐            ┌── Domain B { ledger, endpoint }
//!                                 └─ [Relay] ──┘
//! ```
//!
//! `pump` drains every deliverable envelope and hands it to the endpoint of
//! its destination domain. Failures are reported, never retried.

use crate::config::{RuntimeConfig, RuntimeConfigError};
use qb_01_quad_ledger::{LedgerError, QuadLedger, Region};
use qb_02_bridge::{
    BridgeEndpoint, BridgeError, InMemoryRelay, InboundOutcome, MessageId, RelayError,
};
use shared_types::{Account, Administrator, AuthError, DomainId};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while wiring or driving the network.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// No domain with this id.
    #[error("Unknown domain: {0}")]
    UnknownDomain(DomainId),

    /// Bridge rejected a request.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// Ledger rejected a request.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Administrator capability could not be created.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Configuration rejected.
    #[error(transparent)]
    Config(#[from] RuntimeConfigError),
}

/// One side of the bridge.
pub struct Domain {
    /// Domain id.
    pub id: DomainId,
    /// Ownership ledger of this domain.
    pub ledger: QuadLedger,
    /// Bridge endpoint of this domain.
    pub endpoint: BridgeEndpoint,
}

impl Domain {
    /// Ledger plus endpoint, with the endpoint registered as a minter.
    pub fn new(
        id: DomainId,
        admin: Account,
        config: &RuntimeConfig,
    ) -> Result<Self, NetworkError> {
        let endpoint_account = endpoint_account(id);
        let mut ledger = QuadLedger::new(Administrator::new(admin)?);
        ledger.set_minter(admin, endpoint_account, true)?;
        let endpoint = BridgeEndpoint::new(
            id,
            endpoint_account,
            Administrator::new(admin)?,
            config.bridge.clone(),
        )?;
        Ok(Self {
            id,
            ledger,
            endpoint,
        })
    }
}

/// Deterministic custody account of the endpoint on `domain`.
pub fn endpoint_account(domain: DomainId) -> Account {
    Account::from_low_u64(0xB41D_0000 + u64::from(domain.0))
}

/// What one `pump` did.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    /// Messages applied to a ledger.
    pub applied: Vec<MessageId>,
    /// Redeliveries recognized and skipped.
    pub duplicates: usize,
    /// Messages the destination refused.
    pub failed: Vec<(DomainId, BridgeError)>,
}

impl DeliveryReport {
    /// Check if nothing was delivered.
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty() && self.duplicates == 0 && self.failed.is_empty()
    }
}

/// Two domains and the relay between them.
pub struct BridgeNetwork {
    a: Domain,
    b: Domain,
    relay: InMemoryRelay,
}

impl BridgeNetwork {
    /// Build both domains, pair their endpoints and register `admin` as a
    /// minter so it can seed regions.
    pub fn new(config: &RuntimeConfig, admin: Account) -> Result<Self, NetworkError> {
        config.validate()?;
        let mut a = Domain::new(config.domain_a, admin, config)?;
        let mut b = Domain::new(config.domain_b, admin, config)?;
        a.endpoint
            .set_trusted_peer(admin, b.id, b.endpoint.account())?;
        b.endpoint
            .set_trusted_peer(admin, a.id, a.endpoint.account())?;
        a.ledger.set_minter(admin, admin, true)?;
        b.ledger.set_minter(admin, admin, true)?;

        let relay = InMemoryRelay::new(&[a.id, b.id], config.relay_delay_ticks);
        info!(
            domain_a = %a.id,
            domain_b = %b.id,
            delay = config.relay_delay_ticks,
            "[runtime] Bridge network ready"
        );
        Ok(Self { a, b, relay })
    }

    /// Domain by id.
    pub fn domain(&self, id: DomainId) -> Result<&Domain, NetworkError> {
        if self.a.id == id {
            Ok(&self.a)
        } else if self.b.id == id {
            Ok(&self.b)
        } else {
            Err(NetworkError::UnknownDomain(id))
        }
    }

    /// Mutable domain by id.
    pub fn domain_mut(&mut self, id: DomainId) -> Result<&mut Domain, NetworkError> {
        self.domain_with_relay(id).map(|(domain, _)| domain)
    }

    /// The relay.
    pub fn relay_mut(&mut self) -> &mut InMemoryRelay {
        &mut self.relay
    }

    /// Mutable domain together with the relay.
    pub fn domain_with_relay(
        &mut self,
        id: DomainId,
    ) -> Result<(&mut Domain, &mut InMemoryRelay), NetworkError> {
        if self.a.id == id {
            Ok((&mut self.a, &mut self.relay))
        } else if self.b.id == id {
            Ok((&mut self.b, &mut self.relay))
        } else {
            Err(NetworkError::UnknownDomain(id))
        }
    }

    /// Send regions from `from` to the other domain.
    pub fn bridge(
        &mut self,
        from: DomainId,
        owner: Account,
        recipient: Account,
        regions: &[Region],
        data: &[u8],
    ) -> Result<MessageId, NetworkError> {
        let (domain, relay) = self.domain_with_relay(from)?;
        let id = domain.endpoint.send_to_other_domain(
            &mut domain.ledger,
            relay,
            owner,
            recipient,
            regions,
            data,
        )?;
        Ok(id)
    }

    /// Advance the relay clock.
    pub fn tick(&mut self, ticks: u64) {
        self.relay.advance(ticks);
    }

    /// Deliver every ready envelope.
    pub fn pump(&mut self) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for envelope in self.relay.take_ready() {
            let destination = envelope.destination;
            let domain = if self.a.id == destination {
                &mut self.a
            } else if self.b.id == destination {
                &mut self.b
            } else {
                let err = RelayError::UnknownDestination {
                    domain: destination,
                };
                report.failed.push((destination, err.into()));
                continue;
            };
            match domain.endpoint.on_message_received(
                &mut domain.ledger,
                envelope.sender,
                &envelope.payload,
            ) {
                Ok(InboundOutcome::Applied { id, dispositions }) => {
                    debug!(id = %id, ?dispositions, "[runtime] Delivered");
                    report.applied.push(id);
                }
                Ok(InboundOutcome::Duplicate { .. }) => report.duplicates += 1,
                Err(err) => {
                    warn!(destination = %destination, error = %err, "[runtime] Delivery failed");
                    report.failed.push((destination, err));
                }
            }
        }
        report
    }
}
