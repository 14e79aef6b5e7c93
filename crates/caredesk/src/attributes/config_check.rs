//! Attribute configuration checks.
//!
//! Run when a definition is authored or changed. These check the shape of the
//! definition itself, not any submitted data:
//! - Select and Multiselect need at least one option
//! - Number and Text bounds must not be inverted

use thiserror::Error;

use super::spec::{AttributeType, TypeConfig};

/// A structurally invalid attribute configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{0} attributes need at least one option")]
    MissingOptions(AttributeType),

    #[error("{attribute_type} minimum ({min}) is greater than maximum ({max})")]
    InvertedBounds {
        attribute_type: AttributeType,
        min: f64,
        max: f64,
    },
}

/// Check a type configuration for internal consistency.
pub fn validate_config(config: &TypeConfig) -> Result<(), ConfigError> {
    match config {
        TypeConfig::Select { options, .. } | TypeConfig::Multiselect { options, .. } => {
            if options.is_empty() {
                return Err(ConfigError::MissingOptions(config.attribute_type()));
            }
            Ok(())
        }
        TypeConfig::Number { min, max, .. } => check_bounds(AttributeType::Number, *min, *max),
        TypeConfig::Text {
            min_length,
            max_length,
            ..
        } => check_bounds(
            AttributeType::Text,
            min_length.map(|n| n as f64),
            max_length.map(|n| n as f64),
        ),
        TypeConfig::Date { .. } | TypeConfig::Boolean { .. } => Ok(()),
    }
}

fn check_bounds(
    attribute_type: AttributeType,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<(), ConfigError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(ConfigError::InvertedBounds {
            attribute_type,
            min,
            max,
        }),
        _ => Ok(()),
    }
}
