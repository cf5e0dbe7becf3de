//! # Algorithms Module
//!
//! Admission control for outbound requests.

pub mod admission;

pub use admission::{check_admission, estimate_destination_cost};
