//! # Integration Flows
//!
//! Ledger, bridge and migration driven together through `BridgeNetwork`.

pub mod bridge_flows;
pub mod migration_flows;
