//! # Domain Module
//!
//! Errors of the Migration Coordinator.

pub mod errors;

pub use errors::*;
