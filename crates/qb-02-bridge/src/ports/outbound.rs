//! # Outbound Ports
//!
//! The relay channel connecting the two endpoints.

use crate::domain::RelayError;
use shared_types::{Account, DomainId};

/// Asynchronous, at-least-once channel to the other domain.
///
/// Delivery happens outside the endpoint: whoever drains the channel calls
/// `BridgeEndpoint::on_message_received` on the destination with the
/// original `sender` and payload.
pub trait RelayChannel: Send {
    /// Queue an opaque payload for the endpoint on `destination`.
    fn send(
        &mut self,
        destination: DomainId,
        sender: Account,
        payload: Vec<u8>,
    ) -> Result<(), RelayError>;
}
