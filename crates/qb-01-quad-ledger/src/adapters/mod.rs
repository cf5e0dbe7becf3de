//! # Adapters Module
//!
//! In-memory implementations of the ledger's outbound ports.

pub mod allow_list;
pub mod metadata;

pub use allow_list::StaticOperatorFilter;
pub use metadata::InMemoryMetadataStore;
