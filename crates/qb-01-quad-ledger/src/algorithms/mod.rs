//! # Algorithms Module
//!
//! Pure decision logic used by the ledger service.

pub mod classify;
pub mod overlap;

pub use classify::{classify, Disposition};
pub use overlap::{ensure_disjoint, find_overlap};
