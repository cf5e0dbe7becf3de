//! # qb-01-quad-ledger
//!
//! Quad Ownership Ledger for one domain of the bridge.
//!
//! ## Role in System
//!
//! - **Single Source of Truth**: who owns every cell of the 408x408 grid
//! - **Hierarchical Regions**: cells and quads of side 3, 6, 12 and 24
//! - **Compaction**: ownership is stored as the fewest disjoint records
//! - **Custodian Support**: `mint_and_transfer` lets a bridge endpoint hand
//!   regions out of custody, minting the cells it never held
//!
//! ## Layout
//!
//! ```text
//! domain/      Region, RegionId, OwnershipTree, ApprovalRegistry, events
//! algorithms/  overlap detection, inbound classification
//! ports/       OperatorFilter, RegionMetadataStore
//! adapters/    StaticOperatorFilter, InMemoryMetadataStore
//! service      QuadLedger
//! ```

#![warn(missing_docs)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use algorithms::*;
pub use domain::*;
pub use ports::*;
pub use service::QuadLedger;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
