//! # Bridge Endpoint
//!
//! One side of the two-domain bridge.
//!
//! ## Outbound
//!
//! ```text
//! admit -> encode -> check escrow (ledger check_batch_transfer) -> relay.send -> escrow
//!                                                 relay refused: nothing moved --/
//! ```
//!
//! ## Inbound
//!
//! Only the trusted peer is accepted. Each bundle is released through
//! `batch_mint_and_transfer`, all or nothing. Processed message ids are
//! remembered so redelivery is a no-op.
//!
//! Custody is plain ledger ownership by the endpoint's account. The endpoint
//! must be a registered minter on its ledger to release regions it never held.

use crate::algorithms::check_admission;
use crate::domain::{
    BridgeConfig, BridgeError, BridgeMessage, EndpointState, InboundOutcome, MessageId,
    TrustedPeer,
};
use crate::ports::RelayChannel;
use qb_01_quad_ledger::{QuadLedger, Region};
use shared_types::{Account, Administrator, DomainId};
use std::collections::HashSet;
use tracing::{info, warn};

/// Bridge endpoint of one domain.
#[derive(Debug)]
pub struct BridgeEndpoint {
    domain: DomainId,
    account: Account,
    admin: Administrator,
    config: BridgeConfig,
    state: EndpointState,
    trusted_peer: Option<TrustedPeer>,
    next_nonce: u64,
    processed: HashSet<MessageId>,
}

impl BridgeEndpoint {
    /// Create an active endpoint holding custody as `account`.
    pub fn new(
        domain: DomainId,
        account: Account,
        admin: Administrator,
        config: BridgeConfig,
    ) -> Result<Self, BridgeError> {
        if account.is_zero() {
            return Err(BridgeError::ZeroAddress);
        }
        config.validate()?;
        Ok(Self {
            domain,
            account,
            admin,
            config,
            state: EndpointState::Active,
            trusted_peer: None,
            next_nonce: 0,
            processed: HashSet::new(),
        })
    }

    /// Domain this endpoint serves.
    pub fn domain(&self) -> DomainId {
        self.domain
    }

    /// Custody account.
    pub fn account(&self) -> Account {
        self.account
    }

    /// Current administrator.
    pub fn administrator(&self) -> Account {
        self.admin.account()
    }

    /// Lifecycle state.
    pub fn state(&self) -> EndpointState {
        self.state
    }

    /// Check if outbound requests are refused.
    pub fn is_paused(&self) -> bool {
        self.state == EndpointState::Paused
    }

    /// Admission limits.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Configured peer, if any.
    pub fn trusted_peer(&self) -> Option<TrustedPeer> {
        self.trusted_peer
    }

    /// Nonce the next outbound message will carry.
    pub fn next_nonce(&self) -> u64 {
        self.next_nonce
    }

    /// Check if a message id was already applied.
    pub fn is_processed(&self, id: &MessageId) -> bool {
        self.processed.contains(id)
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// Refuse outbound requests until `unpause`.
    pub fn pause(&mut self, caller: Account) -> Result<(), BridgeError> {
        self.admin.ensure(&caller)?;
        self.state = EndpointState::Paused;
        info!(domain = %self.domain, "[qb-02] Endpoint paused");
        Ok(())
    }

    /// Accept outbound requests again.
    pub fn unpause(&mut self, caller: Account) -> Result<(), BridgeError> {
        self.admin.ensure(&caller)?;
        self.state = EndpointState::Active;
        info!(domain = %self.domain, "[qb-02] Endpoint unpaused");
        Ok(())
    }

    /// Set the single peer endpoint, replacing any previous one.
    pub fn set_trusted_peer(
        &mut self,
        caller: Account,
        domain: DomainId,
        account: Account,
    ) -> Result<(), BridgeError> {
        self.admin.ensure(&caller)?;
        if account.is_zero() {
            return Err(BridgeError::ZeroAddress);
        }
        self.trusted_peer = Some(TrustedPeer { domain, account });
        info!(
            domain = %self.domain,
            peer_domain = %domain,
            peer = %account,
            "[qb-02] Trusted peer set"
        );
        Ok(())
    }

    /// Change the per-request region limit.
    pub fn set_max_quads(&mut self, caller: Account, max_quads: usize) -> Result<(), BridgeError> {
        self.admin.ensure(&caller)?;
        self.replace_config(BridgeConfig {
            max_quads,
            ..self.config.clone()
        })
    }

    /// Change the destination cost ceiling.
    pub fn set_destination_budget(
        &mut self,
        caller: Account,
        destination_budget: u64,
    ) -> Result<(), BridgeError> {
        self.admin.ensure(&caller)?;
        self.replace_config(BridgeConfig {
            destination_budget,
            ..self.config.clone()
        })
    }

    /// Change the cost estimate inputs.
    pub fn set_cost_table(
        &mut self,
        caller: Account,
        base_cost: u64,
        cost_per_size: [u64; 5],
    ) -> Result<(), BridgeError> {
        self.admin.ensure(&caller)?;
        self.replace_config(BridgeConfig {
            base_cost,
            cost_per_size,
            ..self.config.clone()
        })
    }

    /// Hand the administrator capability to `new_admin`.
    pub fn change_administrator(
        &mut self,
        caller: Account,
        new_admin: Account,
    ) -> Result<(), BridgeError> {
        self.admin.change(&caller, new_admin)?;
        Ok(())
    }

    /// Grant `new_endpoint` approval-for-all over this endpoint's holdings.
    ///
    /// One-time: a second grant to the same endpoint fails.
    pub fn approve_new_endpoint(
        &mut self,
        caller: Account,
        ledger: &mut QuadLedger,
        new_endpoint: Account,
    ) -> Result<(), BridgeError> {
        self.admin.ensure(&caller)?;
        if new_endpoint.is_zero() {
            return Err(BridgeError::ZeroAddress);
        }
        if ledger.is_approved_for_all(&self.account, &new_endpoint) {
            return Err(BridgeError::GrantAlreadyIssued {
                endpoint: new_endpoint,
            });
        }
        ledger.set_approval_for_all(self.account, new_endpoint, true)?;
        info!(
            from = %self.account,
            to = %new_endpoint,
            "[qb-02] Migration grant issued"
        );
        Ok(())
    }

    fn replace_config(&mut self, config: BridgeConfig) -> Result<(), BridgeError> {
        config.validate()?;
        info!(domain = %self.domain, ?config, "[qb-02] Config updated");
        self.config = config;
        Ok(())
    }

    // =========================================================================
    // Outbound
    // =========================================================================

    /// Escrow `regions` owned by `owner` and send them to the peer for
    /// `recipient`.
    ///
    /// Returns the id of the emitted message. Nothing changes on failure.
    pub fn send_to_other_domain(
        &mut self,
        ledger: &mut QuadLedger,
        relay: &mut dyn RelayChannel,
        owner: Account,
        recipient: Account,
        regions: &[Region],
        data: &[u8],
    ) -> Result<MessageId, BridgeError> {
        self.escrow_and_dispatch(ledger, relay, owner, owner, recipient, regions, data)
    }

    /// Take `regions` from `holder` (which must have granted this endpoint
    /// approval-for-all) and send them to the peer for `recipient`.
    ///
    /// Same admission rules as `send_to_other_domain`.
    pub fn forward_escrowed(
        &mut self,
        ledger: &mut QuadLedger,
        relay: &mut dyn RelayChannel,
        holder: Account,
        recipient: Account,
        regions: &[Region],
        data: &[u8],
    ) -> Result<MessageId, BridgeError> {
        self.escrow_and_dispatch(ledger, relay, self.account, holder, recipient, regions, data)
    }

    #[allow(clippy::too_many_arguments)]
    fn escrow_and_dispatch(
        &mut self,
        ledger: &mut QuadLedger,
        relay: &mut dyn RelayChannel,
        caller: Account,
        holder: Account,
        recipient: Account,
        regions: &[Region],
        data: &[u8],
    ) -> Result<MessageId, BridgeError> {
        let cost = self.admit(regions)?;
        if recipient.is_zero() {
            return Err(BridgeError::ZeroAddress);
        }
        let peer = self.trusted_peer.ok_or(BridgeError::NoTrustedPeer)?;

        let message = BridgeMessage {
            source_domain: self.domain,
            destination_domain: peer.domain,
            sender: self.account,
            nonce: self.next_nonce,
            regions: regions.to_vec(),
            recipient,
            data: data.to_vec(),
        };
        let id = message.id();
        let payload = message.encode()?;

        ledger.check_batch_transfer(caller, holder, self.account, regions)?;
        relay.send(peer.domain, self.account, payload).inspect_err(|err| {
            warn!(id = %id, error = %err, "[qb-02] Relay refused message");
        })?;
        // Checked above and the ledger is borrowed exclusively, so this cannot fail.
        ledger.batch_transfer(caller, holder, self.account, regions, data)?;

        self.next_nonce += 1;
        info!(
            id = %id,
            from = %holder,
            recipient = %recipient,
            regions = regions.len(),
            cost,
            destination = %peer.domain,
            "[qb-02] Regions escrowed and dispatched"
        );
        Ok(id)
    }

    /// Admission check with logging of rejections.
    pub fn admit(&self, regions: &[Region]) -> Result<u64, BridgeError> {
        check_admission(&self.config, self.state, regions).inspect_err(|err| {
            warn!(domain = %self.domain, error = %err, "[qb-02] Request not admitted");
        })
    }

    // =========================================================================
    // Inbound
    // =========================================================================

    /// Apply a message delivered by the relay.
    ///
    /// Not gated by pause: escrow on the source side already happened.
    pub fn on_message_received(
        &mut self,
        ledger: &mut QuadLedger,
        sender: Account,
        payload: &[u8],
    ) -> Result<InboundOutcome, BridgeError> {
        let peer = self.trusted_peer.ok_or(BridgeError::NoTrustedPeer)?;
        if sender != peer.account {
            warn!(sender = %sender, "[qb-02] Message from untrusted sender");
            return Err(BridgeError::UntrustedSender { sender });
        }

        let message = BridgeMessage::decode(payload)?;
        if message.sender != peer.account || message.source_domain != peer.domain {
            warn!(sender = %message.sender, "[qb-02] Message claims untrusted origin");
            return Err(BridgeError::UntrustedSender {
                sender: message.sender,
            });
        }
        if message.destination_domain != self.domain {
            return Err(BridgeError::WrongDestination {
                expected: self.domain,
                actual: message.destination_domain,
            });
        }

        let id = message.id();
        if self.processed.contains(&id) {
            info!(id = %id, "[qb-02] Duplicate delivery ignored");
            return Ok(InboundOutcome::Duplicate { id });
        }

        let dispositions = ledger.batch_mint_and_transfer(
            self.account,
            message.recipient,
            &message.regions,
            &message.data,
        )?;
        self.processed.insert(id);
        info!(
            id = %id,
            recipient = %message.recipient,
            regions = message.regions.len(),
            "[qb-02] Regions released"
        );
        Ok(InboundOutcome::Applied { id, dispositions })
    }
}
