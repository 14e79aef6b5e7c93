//! # Storage Layer
//!
//! The engine owns no persistence of its own. Categories, attribute
//! definitions, attribute values and SLA rules live in the surrounding ticket
//! service's document store; this module defines the [`StorageBackend`]
//! trait through which the engine reaches them.
//!
//! ## Records
//!
//! | Record | Key | Written by |
//! |--------|-----|------------|
//! | [`Category`](crate::model::Category) | id | ticket service |
//! | [`AttributeDefinition`](crate::attributes::AttributeDefinition) | id | registry |
//! | [`AttributeValue`](crate::model::AttributeValue) | (ticket, definition) | registry |
//! | [`SlaRule`](crate::sla::SlaRule) | id | administrators |
//!
//! Definitions are never hard-deleted; deactivation keeps historical values
//! referentially valid.
//!
//! ## Consistency
//!
//! Slug uniqueness is a check-then-insert sequence in the registry. Backends
//! must give read-your-writes consistency across it; the engine takes no
//! locks.
//!
//! ## Implementations
//!
//! - [`mem_backend::MemBackend`]: in-memory, for tests and embedding.

pub mod backend;
#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures;
pub mod mem_backend;

pub use backend::StorageBackend;
pub use mem_backend::MemBackend;
