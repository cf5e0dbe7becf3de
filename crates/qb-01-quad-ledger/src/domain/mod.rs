//! # Domain Module
//!
//! Core domain types for the Quad Ownership Ledger.

pub mod authorization;
pub mod errors;
pub mod events;
pub mod ownership;
pub mod region;

pub use authorization::ApprovalRegistry;
pub use errors::*;
pub use events::*;
pub use ownership::{CellTally, Coverage, OwnershipTree};
pub use region::*;
