//! # Quad-Bridge Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Ledger split/merge benchmarks (criterion)
//! └── src/integration/  # Cross-subsystem flows
//!     ├── bridge_flows.rs     # escrow -> relay -> release, redelivery, admission
//!     └── migration_flows.rs  # endpoint replacement
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p qb-tests
//! cargo test -p qb-tests integration::migration_flows
//! cargo bench -p qb-tests
//! ```

pub mod integration;
