//! # Shared Types Crate
//!
//! Types every Quad-Bridge subsystem agrees on.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: account and domain identities are defined once here.
//! - **Explicit Authority**: administrative rights are an `Administrator` value handed
//!   to each component at construction, never inferred from context.

pub mod entities;
pub mod errors;
pub mod security;

pub use entities::*;
pub use errors::*;
pub use security::*;
