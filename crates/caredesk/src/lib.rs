//! # Caredesk Architecture
//!
//! Caredesk is the rule engine behind a multi-tenant healthcare help desk. It
//! answers two questions for the surrounding ticket service:
//!
//! 1. **Which custom fields does this ticket form have, and is the submission
//!    valid?** Each category carries administrator-defined attributes (text,
//!    number, date, select, multiselect, boolean) that can be shown or hidden
//!    by conditions over the form data.
//! 2. **Which SLA rule governs this ticket, and when is it due?** The
//!    strictest applicable rule sets the resolution deadline; breach and
//!    urgency are recomputed every time they are read.
//!
//! The crate is a library. It owns no persistence, spawns no tasks and
//! installs no logging subscriber.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Registry (registry.rs)                                     │
//! │  - Authoring: create / update / deactivate definitions      │
//! │  - Submission: validate then upsert attribute values        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Pure evaluation                                            │
//! │  - attributes/: type and config validation                  │
//! │  - conditions.rs, visibility.rs: conditional fields         │
//! │  - sla/: rule matching, deadlines, urgency                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract StorageBackend trait                            │
//! │  - MemBackend (tests, embedding)                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything below the registry is a pure function of its arguments: no I/O,
//! no clock reads except where a `now` is passed in, no global state.
//!
//! ## Errors
//!
//! Per-field problems with submitted values are data
//! ([`attributes::ValidationError`] lists) so a form can show every error at
//! once. Integrity problems (missing category, duplicate slug, malformed
//! definition config, storage failure) are [`error::DeskError`]. A ticket with
//! no matching SLA rule is not an error.
//!
//! ## Module Overview
//!
//! - [`attributes`]: attribute types, definitions, value and config validation
//! - [`conditions`]: field conditions and their evaluation
//! - [`visibility`]: which fields a form currently shows
//! - [`registry`]: storage-backed authoring and submission
//! - [`sla`]: SLA rules, matching and deadline tracking
//! - [`store`]: storage abstraction and the in-memory backend
//! - [`model`]: categories, ticket snapshots, stored values
//! - [`config`]: engine configuration
//! - [`error`]: error types

pub mod attributes;
pub mod conditions;
pub mod config;
pub mod error;
pub mod model;
pub mod registry;
pub mod sla;
pub mod store;
pub mod visibility;

pub use config::EngineConfig;
pub use error::{DeskError, Result};
pub use registry::{AttributeRegistry, Submission};
