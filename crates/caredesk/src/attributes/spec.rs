//! Attribute types and their type-specific configuration.
//!
//! Every custom field has exactly one [`AttributeType`], and its configuration
//! is a [`TypeConfig`] variant for that type. Because the type is derived from
//! the config variant, a definition can never carry, say, select options on a
//! number field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of value a custom field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    /// Free text, optionally length-bounded.
    Text,
    /// A number, optionally range-bounded.
    Number,
    /// A calendar date or timestamp.
    Date,
    /// Exactly one value out of a fixed option list.
    Select,
    /// Any number of values out of a fixed option list.
    Multiselect,
    /// A strict true/false flag.
    Boolean,
}

impl AttributeType {
    pub const ALL: [AttributeType; 6] = [
        AttributeType::Text,
        AttributeType::Number,
        AttributeType::Date,
        AttributeType::Select,
        AttributeType::Multiselect,
        AttributeType::Boolean,
    ];

    /// Whether values of this type are picked from an option list.
    pub fn has_options(self) -> bool {
        matches!(self, AttributeType::Select | AttributeType::Multiselect)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttributeType::Text => "text",
            AttributeType::Number => "number",
            AttributeType::Date => "date",
            AttributeType::Select => "select",
            AttributeType::Multiselect => "multiselect",
            AttributeType::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific configuration of an attribute definition.
///
/// Serialized internally tagged by `type`, e.g.
/// `{"type": "select", "options": ["a", "b"]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TypeConfig {
    #[serde(rename_all = "camelCase")]
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<f64>,
    },

    #[serde(rename_all = "camelCase")]
    Date {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    Select {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        #[serde(default)]
        options: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    Multiselect {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        #[serde(default)]
        options: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_selections: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_selections: Option<usize>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        default: Vec<String>,
    },

    #[serde(rename_all = "camelCase")]
    Boolean {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<bool>,
    },
}

impl TypeConfig {
    /// Unbounded text config.
    pub fn text() -> Self {
        TypeConfig::Text {
            placeholder: None,
            min_length: None,
            max_length: None,
            default: None,
        }
    }

    /// Text config with optional length bounds.
    pub fn text_bounded(min_length: Option<usize>, max_length: Option<usize>) -> Self {
        TypeConfig::Text {
            placeholder: None,
            min_length,
            max_length,
            default: None,
        }
    }

    pub fn number(min: Option<f64>, max: Option<f64>) -> Self {
        TypeConfig::Number {
            placeholder: None,
            min,
            max,
            default: None,
        }
    }

    pub fn date() -> Self {
        TypeConfig::Date {
            placeholder: None,
            default: None,
        }
    }

    pub fn select<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypeConfig::Select {
            placeholder: None,
            options: options.into_iter().map(Into::into).collect(),
            default: None,
        }
    }

    pub fn multiselect<I, S>(
        options: I,
        min_selections: Option<usize>,
        max_selections: Option<usize>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypeConfig::Multiselect {
            placeholder: None,
            options: options.into_iter().map(Into::into).collect(),
            min_selections,
            max_selections,
            default: Vec::new(),
        }
    }

    pub fn boolean() -> Self {
        TypeConfig::Boolean { default: None }
    }

    /// The attribute type this configuration belongs to.
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            TypeConfig::Text { .. } => AttributeType::Text,
            TypeConfig::Number { .. } => AttributeType::Number,
            TypeConfig::Date { .. } => AttributeType::Date,
            TypeConfig::Select { .. } => AttributeType::Select,
            TypeConfig::Multiselect { .. } => AttributeType::Multiselect,
            TypeConfig::Boolean { .. } => AttributeType::Boolean,
        }
    }

    /// The option list for Select/Multiselect, `None` for other types.
    pub fn options(&self) -> Option<&[String]> {
        match self {
            TypeConfig::Select { options, .. } | TypeConfig::Multiselect { options, .. } => {
                Some(options)
            }
            _ => None,
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        match self {
            TypeConfig::Text { placeholder, .. }
            | TypeConfig::Number { placeholder, .. }
            | TypeConfig::Date { placeholder, .. }
            | TypeConfig::Select { placeholder, .. }
            | TypeConfig::Multiselect { placeholder, .. } => placeholder.as_deref(),
            TypeConfig::Boolean { .. } => None,
        }
    }

    /// The configured default as a form value, if any.
    pub fn default_value(&self) -> Option<Value> {
        match self {
            TypeConfig::Text { default, .. }
            | TypeConfig::Date { default, .. }
            | TypeConfig::Select { default, .. } => default.clone().map(Value::String),
            TypeConfig::Number { default, .. } => default
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            TypeConfig::Multiselect { default, .. } => {
                if default.is_empty() {
                    None
                } else {
                    Some(Value::Array(
                        default.iter().cloned().map(Value::String).collect(),
                    ))
                }
            }
            TypeConfig::Boolean { default } => default.map(Value::Bool),
        }
    }
}
