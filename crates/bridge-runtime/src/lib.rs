//! # Bridge Runtime
//!
//! Library side of the `bridge-runtime` binary: configuration, the two-domain
//! network and the relay pump.

pub mod config;
pub mod network;
pub mod runner;

pub use config::{RuntimeConfig, RuntimeConfigError};
pub use network::{endpoint_account, BridgeNetwork, DeliveryReport, Domain, NetworkError};
pub use runner::BridgeRuntime;
