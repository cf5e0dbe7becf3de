//! # Adapters Module
//!
//! In-memory relay channel.

pub mod in_memory_relay;

pub use in_memory_relay::{InMemoryRelay, RelayEnvelope};
