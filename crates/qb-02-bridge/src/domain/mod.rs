//! # Domain Module
//!
//! Core domain types for the Bridge Endpoint.

pub mod config;
pub mod errors;
pub mod message;
pub mod state;

pub use config::BridgeConfig;
pub use errors::*;
pub use message::{BridgeMessage, MessageId};
pub use state::{EndpointState, InboundOutcome, TrustedPeer};
