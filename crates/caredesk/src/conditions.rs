//! Field conditions.
//!
//! A [`Condition`] compares one form field against an operand. Attribute
//! definitions use them for conditional visibility ("show `policyNumber` only
//! when `hasInsurance` equals true").
//!
//! | Operator | Matches when |
//! |----------|--------------|
//! | `equals` | field strictly equals the operand |
//! | `notEquals` | field does not strictly equal the operand |
//! | `contains` | field is a string containing the operand's text |
//! | `greaterThan` | field > operand, both converted to numbers |
//! | `lessThan` | field < operand, both converted to numbers |
//!
//! An operator this crate does not recognise evaluates to `true`. Authoring
//! data with a typo in an operator therefore shows the field rather than
//! hiding it; each such evaluation logs a warning.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::attributes::value::{scalar_text, strict_equals, to_number};

/// Comparison operator of a condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
    /// Anything else, kept verbatim.
    Unknown(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "notEquals",
            Operator::Contains => "contains",
            Operator::GreaterThan => "greaterThan",
            Operator::LessThan => "lessThan",
            Operator::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Operator::Unknown(_))
    }
}

impl From<String> for Operator {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "equals" => Operator::Equals,
            "notEquals" | "not_equals" => Operator::NotEquals,
            "contains" => Operator::Contains,
            "greaterThan" | "greater_than" => Operator::GreaterThan,
            "lessThan" | "less_than" => Operator::LessThan,
            _ => Operator::Unknown(raw),
        }
    }
}

impl From<&str> for Operator {
    fn from(raw: &str) -> Self {
        Operator::from(raw.to_string())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A predicate over one form field. Replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Form key (attribute slug or built-in ticket field) to read.
    pub field: String,
    pub operator: Operator,
    /// The operand.
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    pub fn equals(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, Operator::Equals, value)
    }

    pub fn not_equals(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, Operator::NotEquals, value)
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, Operator::Contains, Value::String(value.into()))
    }

    pub fn greater_than(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, Operator::GreaterThan, value)
    }

    pub fn less_than(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, Operator::LessThan, value)
    }

    /// Evaluate against a field value (`None` when the field is absent).
    pub fn evaluate(&self, field_value: Option<&Value>) -> bool {
        evaluate(field_value, self)
    }
}

/// Evaluate `condition` against the current value of its field.
pub fn evaluate(field_value: Option<&Value>, condition: &Condition) -> bool {
    match &condition.operator {
        Operator::Equals => field_value.is_some_and(|v| strict_equals(v, &condition.value)),
        Operator::NotEquals => !field_value.is_some_and(|v| strict_equals(v, &condition.value)),
        Operator::Contains => contains(field_value, &condition.value),
        Operator::GreaterThan => to_number(field_value) > to_number(Some(&condition.value)),
        Operator::LessThan => to_number(field_value) < to_number(Some(&condition.value)),
        Operator::Unknown(raw) => {
            warn!(
                field = %condition.field,
                operator = %raw,
                "unknown condition operator, treating condition as satisfied"
            );
            true
        }
    }
}

fn contains(field_value: Option<&Value>, operand: &Value) -> bool {
    let Some(Value::String(haystack)) = field_value else {
        return false;
    };
    let Some(needle) = scalar_text(operand) else {
        return false;
    };
    haystack.contains(needle.as_str())
}
