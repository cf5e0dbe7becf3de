//! # In-Memory Relay
//!
//! FIFO relay with a fixed delivery delay measured in ticks.
//!
//! Used by tests and by the runtime simulation. `redeliver_last` and the
//! outage switch exercise at-least-once delivery and relay failures.

use crate::domain::RelayError;
use crate::ports::RelayChannel;
use shared_types::{Account, DomainId};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// A message waiting in the relay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayEnvelope {
    /// Destination domain.
    pub destination: DomainId,
    /// Sending endpoint.
    pub sender: Account,
    /// Opaque message bytes.
    pub payload: Vec<u8>,
    /// Tick at which the envelope becomes deliverable.
    pub ready_at: u64,
}

/// In-memory relay channel.
#[derive(Debug, Default)]
pub struct InMemoryRelay {
    routes: HashSet<DomainId>,
    delay_ticks: u64,
    now: u64,
    queue: VecDeque<RelayEnvelope>,
    last_taken: Option<RelayEnvelope>,
    outage: bool,
}

impl InMemoryRelay {
    /// Relay serving `routes` with `delay_ticks` between send and delivery.
    pub fn new(routes: &[DomainId], delay_ticks: u64) -> Self {
        Self {
            routes: routes.iter().copied().collect(),
            delay_ticks,
            ..Self::default()
        }
    }

    /// Current tick.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Move the clock forward.
    pub fn advance(&mut self, ticks: u64) {
        self.now = self.now.saturating_add(ticks);
    }

    /// Messages not yet taken.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Make `send` fail with `Unavailable` while `down` is set.
    pub fn set_outage(&mut self, down: bool) {
        self.outage = down;
    }

    /// Remove and return every deliverable envelope, oldest first.
    pub fn take_ready(&mut self) -> Vec<RelayEnvelope> {
        let now = self.now;
        let (ready, waiting): (VecDeque<_>, VecDeque<_>) =
            self.queue.drain(..).partition(|env| env.ready_at <= now);
        self.queue = waiting;
        if let Some(last) = ready.back() {
            self.last_taken = Some(last.clone());
        }
        ready.into()
    }

    /// Queue the most recently taken envelope again, deliverable now.
    ///
    /// Returns `false` if nothing was taken yet.
    pub fn redeliver_last(&mut self) -> bool {
        let Some(mut envelope) = self.last_taken.clone() else {
            return false;
        };
        envelope.ready_at = self.now;
        debug!(destination = %envelope.destination, "[qb-02] Relay redelivery queued");
        self.queue.push_back(envelope);
        true
    }
}

impl RelayChannel for InMemoryRelay {
    fn send(
        &mut self,
        destination: DomainId,
        sender: Account,
        payload: Vec<u8>,
    ) -> Result<(), RelayError> {
        if self.outage {
            return Err(RelayError::Unavailable);
        }
        if !self.routes.contains(&destination) {
            return Err(RelayError::UnknownDestination {
                domain: destination,
            });
        }
        let ready_at = self.now.saturating_add(self.delay_ticks);
        debug!(
            destination = %destination,
            bytes = payload.len(),
            ready_at,
            "[qb-02] Relay accepted message"
        );
        self.queue.push_back(RelayEnvelope {
            destination,
            sender,
            payload,
            ready_at,
        });
        Ok(())
    }
}
