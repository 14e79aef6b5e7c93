//! Submitted-value validation.
//!
//! Checks one submitted value against its attribute definition. The
//! required check runs first; a blank value on an optional field is always
//! accepted, and a blank value on a required field stops before any type
//! check.
//!
//! Errors are returned, never raised, so a form with many custom fields can
//! report every bad field at once.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::definition::AttributeDefinition;
use super::spec::TypeConfig;
use super::value::{is_blank, parse_date, to_number, type_name};

/// Why a submitted value was rejected.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "camelCase")]
pub enum ValidationErrorKind {
    #[error("this field is required")]
    Required,

    #[error("expected text, got {found}")]
    NotText { found: &'static str },

    #[error("must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("must be a number")]
    NotANumber,

    #[error("must be at least {min}")]
    BelowMinimum { min: f64 },

    #[error("must be at most {max}")]
    AboveMaximum { max: f64 },

    #[error("must be a valid date")]
    InvalidDate,

    #[error("'{value}' is not one of the allowed options")]
    NotAnOption { value: String },

    #[error("expected a list of options, got {found}")]
    NotAList { found: &'static str },

    #[error("select at least {min} option(s) (got {actual})")]
    TooFewSelections { min: usize, actual: usize },

    #[error("select at most {max} option(s) (got {actual})")]
    TooManySelections { max: usize, actual: usize },

    #[error("expected true or false, got {found}")]
    NotBoolean { found: &'static str },
}

/// A rejected field: the attribute slug plus what went wrong.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{slug}: {kind}")]
pub struct ValidationError {
    pub slug: String,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn new(slug: impl Into<String>, kind: ValidationErrorKind) -> Self {
        Self {
            slug: slug.into(),
            kind,
        }
    }

    /// Human-readable message for the field, without the slug.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Validate one submitted value against its definition.
///
/// `value` is `None` when the field was not submitted at all.
pub fn validate_value(
    definition: &AttributeDefinition,
    value: Option<&Value>,
) -> Option<ValidationError> {
    check_value(definition.required, &definition.config, value)
        .err()
        .map(|kind| ValidationError::new(definition.slug.clone(), kind))
}

/// The check itself, independent of where the slug comes from.
pub fn check_value(
    required: bool,
    config: &TypeConfig,
    value: Option<&Value>,
) -> Result<(), ValidationErrorKind> {
    let Some(value) = value.filter(|v| !is_blank(Some(v))) else {
        return if required {
            Err(ValidationErrorKind::Required)
        } else {
            Ok(())
        };
    };

    match config {
        TypeConfig::Text {
            min_length,
            max_length,
            ..
        } => check_text(value, *min_length, *max_length),
        TypeConfig::Number { min, max, .. } => check_number(value, *min, *max),
        TypeConfig::Date { .. } => check_date(value),
        TypeConfig::Select { options, .. } => check_select(value, options),
        TypeConfig::Multiselect {
            options,
            min_selections,
            max_selections,
            ..
        } => check_multiselect(value, options, *min_selections, *max_selections),
        TypeConfig::Boolean { .. } => check_boolean(value),
    }
}

fn check_text(
    value: &Value,
    min_length: Option<usize>,
    max_length: Option<usize>,
) -> Result<(), ValidationErrorKind> {
    let Value::String(text) = value else {
        return Err(ValidationErrorKind::NotText {
            found: type_name(value),
        });
    };

    let actual = text.chars().count();
    if let Some(min) = min_length {
        if actual < min {
            return Err(ValidationErrorKind::TooShort { min, actual });
        }
    }
    if let Some(max) = max_length {
        if actual > max {
            return Err(ValidationErrorKind::TooLong { max, actual });
        }
    }
    Ok(())
}

fn check_number(
    value: &Value,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<(), ValidationErrorKind> {
    let number = to_number(Some(value));
    if !number.is_finite() {
        return Err(ValidationErrorKind::NotANumber);
    }
    if let Some(min) = min {
        if number < min {
            return Err(ValidationErrorKind::BelowMinimum { min });
        }
    }
    if let Some(max) = max {
        if number > max {
            return Err(ValidationErrorKind::AboveMaximum { max });
        }
    }
    Ok(())
}

fn check_date(value: &Value) -> Result<(), ValidationErrorKind> {
    parse_date(value)
        .map(|_| ())
        .ok_or(ValidationErrorKind::InvalidDate)
}

fn check_select(value: &Value, options: &[String]) -> Result<(), ValidationErrorKind> {
    match value {
        Value::String(s) if options.iter().any(|o| o == s) => Ok(()),
        Value::String(s) => Err(ValidationErrorKind::NotAnOption { value: s.clone() }),
        other => Err(ValidationErrorKind::NotAnOption {
            value: other.to_string(),
        }),
    }
}

fn check_multiselect(
    value: &Value,
    options: &[String],
    min_selections: Option<usize>,
    max_selections: Option<usize>,
) -> Result<(), ValidationErrorKind> {
    let Value::Array(items) = value else {
        return Err(ValidationErrorKind::NotAList {
            found: type_name(value),
        });
    };

    for item in items {
        check_select(item, options)?;
    }

    let actual = items.len();
    if let Some(min) = min_selections {
        if actual < min {
            return Err(ValidationErrorKind::TooFewSelections { min, actual });
        }
    }
    if let Some(max) = max_selections {
        if actual > max {
            return Err(ValidationErrorKind::TooManySelections { max, actual });
        }
    }
    Ok(())
}

fn check_boolean(value: &Value) -> Result<(), ValidationErrorKind> {
    match value {
        Value::Bool(_) => Ok(()),
        other => Err(ValidationErrorKind::NotBoolean {
            found: type_name(other),
        }),
    }
}
