//! # Attribute System
//!
//! Ticket categories carry custom fields ("attributes"). This module holds the
//! schema side of that system and the two pure validators:
//!
//! - **Types and configuration** ([`spec`]): what kinds of values a field can
//!   hold and the per-type knobs (options, bounds, defaults)
//! - **Definitions** ([`definition`]): the category-scoped field schema, its
//!   creation/patch shapes and slug rules
//! - **Config checks** ([`config_check`]): is a definition's own configuration
//!   coherent? Run at authoring time.
//! - **Value checks** ([`validation`]): does a submitted value satisfy its
//!   definition? Run on every ticket save.
//!
//! ## Attribute Types
//!
//! | Type | Accepts | Config |
//! |------|---------|--------|
//! | `Text` | strings | `minLength`, `maxLength` |
//! | `Number` | anything that converts to a finite number | `min`, `max` |
//! | `Date` | date strings, epoch milliseconds | none |
//! | `Select` | one of `options` | `options` (non-empty) |
//! | `Multiselect` | a list drawn from `options` | `options`, `minSelections`, `maxSelections` |
//! | `Boolean` | `true` / `false` only | none |
//!
//! ## Usage
//!
//! ```ignore
//! let def = AttributeDefinition::from_new(category_id, NewAttribute::new(
//!     "Notes", "notes", TypeConfig::text_bounded(None, Some(100)),
//! ));
//! if let Some(err) = validate_value(&def, Some(&json!("..."))) {
//!     println!("{}", err);
//! }
//! ```

pub mod config_check;
pub mod definition;
pub mod spec;
pub mod validation;
pub mod value;

pub use config_check::{validate_config, ConfigError};
pub use definition::{
    validate_slug, AttributeDefinition, AttributePatch, ListFilter, NewAttribute, SlugError,
};
pub use spec::{AttributeType, TypeConfig};
pub use validation::{validate_value, ValidationError, ValidationErrorKind};
