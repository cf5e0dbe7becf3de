//! # qb-02-bridge
//!
//! Bridge Endpoint moving region ownership between two domains.
//!
//! ## Role in System
//!
//! - **Escrow**: outbound regions become ledger property of the endpoint
//! - **Relay Dispatch**: one opaque message per request to the trusted peer
//! - **Release**: inbound regions are minted or handed out of custody
//! - **Admission Control**: pause state, batch size and destination budget
//!
//! ## Flow
//!
//! ```text
//! [Ledger A] <--escrow-- [Endpoint A] --send--> [Relay] --deliver--> [Endpoint B] --release--> [Ledger B]
//! ```
//!
//! Delivery is at-least-once and unordered. Every bundle is atomic, and a
//! redelivered bundle is recognized by its message id.

#![warn(missing_docs)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod endpoint;
pub mod ports;

pub use adapters::*;
pub use algorithms::*;
pub use domain::*;
pub use endpoint::BridgeEndpoint;
pub use ports::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
