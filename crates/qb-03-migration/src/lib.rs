//! # qb-03-migration
//!
//! Migration Coordinator for replacing a bridge endpoint.
//!
//! ## Operations
//!
//! - `migrate_regions`: old endpoint custody -> new endpoint custody
//! - `migrate_and_release`: same move, immediately bridged onward by the new
//!   endpoint. Needs the old endpoint's one-time `approve_new_endpoint` grant.

#![warn(missing_docs)]

pub mod coordinator;
pub mod domain;

pub use coordinator::MigrationCoordinator;
pub use domain::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
