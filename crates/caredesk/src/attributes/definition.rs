//! Attribute definitions: the per-category custom-field schema.
//!
//! A definition is never hard-deleted. Deactivating it frees its slug for a
//! new definition while the values already stored against it stay valid.
//!
//! ## Slug Rules
//!
//! - ASCII alphanumerics, underscores (`_`) and hyphens (`-`) only
//! - Must start with a letter
//! - No consecutive hyphens, cannot end with a hyphen

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::spec::{AttributeType, TypeConfig};
use crate::conditions::Condition;

/// A custom field defined for one ticket category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    /// Form key; unique among the category's active definitions.
    pub slug: String,
    pub required: bool,
    pub show_in_creation: bool,
    pub show_in_list: bool,
    /// Only agents see and fill this field.
    pub agent_only: bool,
    pub order: i32,
    pub config: TypeConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AttributeDefinition {
    /// Build an active definition from creation fields.
    pub fn from_new(category_id: Uuid, new: NewAttribute) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            category_id,
            name: new.name,
            slug: new.slug,
            required: new.required,
            show_in_creation: new.show_in_creation,
            show_in_list: new.show_in_list,
            agent_only: new.agent_only,
            order: new.order,
            config: new.config,
            condition: new.condition,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn attribute_type(&self) -> AttributeType {
        self.config.attribute_type()
    }

    /// Apply a partial update in place. Does not validate.
    pub fn apply(&mut self, patch: AttributePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(slug) = patch.slug {
            self.slug = slug;
        }
        if let Some(required) = patch.required {
            self.required = required;
        }
        if let Some(show) = patch.show_in_creation {
            self.show_in_creation = show;
        }
        if let Some(show) = patch.show_in_list {
            self.show_in_list = show;
        }
        if let Some(agent_only) = patch.agent_only {
            self.agent_only = agent_only;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        if let Some(config) = patch.config {
            self.config = config;
        }
        if let Some(condition) = patch.condition {
            self.condition = condition;
        }
        self.updated_at = Utc::now();
    }
}

/// Fields for creating a definition.
///
/// Display flags default to shown, everything else to off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttribute {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "shown")]
    pub show_in_creation: bool,
    #[serde(default = "shown")]
    pub show_in_list: bool,
    #[serde(default)]
    pub agent_only: bool,
    #[serde(default)]
    pub order: i32,
    pub config: TypeConfig,
    #[serde(default)]
    pub condition: Option<Condition>,
}

fn shown() -> bool {
    true
}

impl NewAttribute {
    pub fn new(name: impl Into<String>, slug: impl Into<String>, config: TypeConfig) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            required: false,
            show_in_creation: true,
            show_in_list: true,
            agent_only: false,
            order: 0,
            config,
            condition: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn agent_only(mut self) -> Self {
        self.agent_only = true;
        self
    }

    pub fn hidden_in_creation(mut self) -> Self {
        self.show_in_creation = false;
        self
    }

    pub fn hidden_in_list(mut self) -> Self {
        self.show_in_list = false;
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// A partial update; `None` leaves the field unchanged.
///
/// `condition` is doubly optional: `Some(None)` removes the condition. In
/// JSON an absent key leaves it alone and `null` removes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributePatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub required: Option<bool>,
    pub show_in_creation: Option<bool>,
    pub show_in_list: Option<bool>,
    pub agent_only: Option<bool>,
    pub order: Option<i32>,
    pub config: Option<TypeConfig>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub condition: Option<Option<Condition>>,
}

/// A key that is present wraps its value in `Some`, `null` included.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl AttributePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn config(mut self, config: TypeConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn condition(mut self, condition: Option<Condition>) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// Filters for listing a category's definitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub show_in_creation: Option<bool>,
    pub show_in_list: Option<bool>,
}

impl ListFilter {
    pub fn creation_form() -> Self {
        Self {
            show_in_creation: Some(true),
            show_in_list: None,
        }
    }

    pub fn list_columns() -> Self {
        Self {
            show_in_creation: None,
            show_in_list: Some(true),
        }
    }

    pub fn matches(&self, definition: &AttributeDefinition) -> bool {
        self.show_in_creation
            .map_or(true, |want| definition.show_in_creation == want)
            && self
                .show_in_list
                .map_or(true, |want| definition.show_in_list == want)
    }
}

/// Validates an attribute slug.
///
/// # Examples
/// ```
/// use caredesk::attributes::validate_slug;
///
/// assert!(validate_slug("notes").is_ok());
/// assert!(validate_slug("policyNumber").is_ok());
/// assert!(validate_slug("blood_type-2").is_ok());
///
/// assert!(validate_slug("").is_err());
/// assert!(validate_slug("2fa").is_err());
/// assert!(validate_slug("a--b").is_err());
/// assert!(validate_slug("dose mg").is_err());
/// ```
pub fn validate_slug(slug: &str) -> Result<(), SlugError> {
    let Some(first) = slug.chars().next() else {
        return Err(SlugError::Empty);
    };
    if !first.is_ascii_alphabetic() {
        return Err(SlugError::InvalidStart(first));
    }
    if slug.ends_with('-') {
        return Err(SlugError::EndsWithHyphen);
    }

    let mut prev_was_hyphen = false;
    for ch in slug.chars() {
        if !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '-') {
            return Err(SlugError::InvalidCharacter(ch));
        }
        if ch == '-' && prev_was_hyphen {
            return Err(SlugError::ConsecutiveHyphens);
        }
        prev_was_hyphen = ch == '-';
    }

    Ok(())
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug cannot be empty")]
    Empty,
    #[error("slug must start with a letter, found '{0}'")]
    InvalidStart(char),
    #[error("slug cannot end with a hyphen")]
    EndsWithHyphen,
    #[error("slug cannot contain consecutive hyphens")]
    ConsecutiveHyphens,
    #[error("slug contains invalid character '{0}' (only alphanumeric, underscore, and hyphen allowed)")]
    InvalidCharacter(char),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::Operator;
    use serde_json::json;

    #[test]
    fn test_from_new_is_active() {
        let category = Uuid::new_v4();
        let def = AttributeDefinition::from_new(
            category,
            NewAttribute::new("Notes", "notes", TypeConfig::text()).order(3),
        );

        assert!(def.active);
        assert_eq!(def.category_id, category);
        assert_eq!(def.order, 3);
        assert_eq!(def.attribute_type(), AttributeType::Text);
        assert!(def.show_in_creation);
        assert!(def.show_in_list);
        assert!(!def.required);
        assert!(!def.agent_only);
    }

    #[test]
    fn test_apply_patch_only_touches_given_fields() {
        let mut def = AttributeDefinition::from_new(
            Uuid::new_v4(),
            NewAttribute::new("Notes", "notes", TypeConfig::text()).required(),
        );
        let before = def.clone();

        def.apply(AttributePatch::new().name("Clinical notes").order(7));

        assert_eq!(def.name, "Clinical notes");
        assert_eq!(def.order, 7);
        assert_eq!(def.slug, before.slug);
        assert!(def.required);
        assert_eq!(def.config, before.config);
        assert!(def.updated_at >= before.updated_at);
    }

    #[test]
    fn test_apply_patch_can_clear_condition() {
        let condition = Condition::new("hasInsurance", Operator::Equals, json!(true));
        let mut def = AttributeDefinition::from_new(
            Uuid::new_v4(),
            NewAttribute::new("Policy", "policyNumber", TypeConfig::text()).condition(condition),
        );

        def.apply(AttributePatch::new().required(true));
        assert!(def.condition.is_some());

        def.apply(AttributePatch::new().condition(None));
        assert!(def.condition.is_none());
    }

    #[test]
    fn test_patch_condition_from_json() {
        let absent: AttributePatch = serde_json::from_value(json!({"name": "Policy"})).unwrap();
        assert_eq!(absent.condition, None);

        let cleared: AttributePatch = serde_json::from_value(json!({"condition": null})).unwrap();
        assert_eq!(cleared.condition, Some(None));

        let set: AttributePatch = serde_json::from_value(json!({
            "condition": {"field": "hasInsurance", "operator": "equals", "value": true}
        }))
        .unwrap();
        assert_eq!(
            set.condition,
            Some(Some(Condition::new("hasInsurance", Operator::Equals, json!(true))))
        );

        let mut def = AttributeDefinition::from_new(
            Uuid::new_v4(),
            NewAttribute::new("Policy", "policyNumber", TypeConfig::text())
                .condition(Condition::equals("hasInsurance", json!(true))),
        );
        def.apply(cleared);
        assert!(def.condition.is_none());
    }

    #[test]
    fn test_list_filter() {
        let def = AttributeDefinition::from_new(
            Uuid::new_v4(),
            NewAttribute::new("Notes", "notes", TypeConfig::text()).hidden_in_list(),
        );

        assert!(ListFilter::default().matches(&def));
        assert!(ListFilter::creation_form().matches(&def));
        assert!(!ListFilter::list_columns().matches(&def));
    }

    #[test]
    fn test_definition_json_shape() {
        let def = AttributeDefinition::from_new(
            Uuid::new_v4(),
            NewAttribute::new("Site", "site", TypeConfig::select(["clinic"])).agent_only(),
        );
        let json = serde_json::to_value(&def).unwrap();

        assert_eq!(json["slug"], "site");
        assert_eq!(json["agentOnly"], true);
        assert_eq!(json["showInCreation"], true);
        assert_eq!(json["config"]["type"], "select");
        assert!(json.get("condition").is_none());
    }

    #[test]
    fn test_new_attribute_defaults_from_json() {
        let new: NewAttribute = serde_json::from_value(json!({
            "name": "Notes",
            "slug": "notes",
            "config": {"type": "text", "maxLength": 100}
        }))
        .unwrap();

        assert!(new.show_in_creation);
        assert!(new.show_in_list);
        assert!(!new.required);
        assert_eq!(new.order, 0);
        assert_eq!(new.config, TypeConfig::text_bounded(None, Some(100)));
    }

    #[test]
    fn test_valid_slugs() {
        for slug in ["notes", "policyNumber", "blood_type", "icd-10", "a1"] {
            assert!(validate_slug(slug).is_ok(), "{}", slug);
        }
    }

    #[test]
    fn test_invalid_slugs() {
        assert_eq!(validate_slug(""), Err(SlugError::Empty));
        assert_eq!(validate_slug("_notes"), Err(SlugError::InvalidStart('_')));
        assert_eq!(validate_slug("10th"), Err(SlugError::InvalidStart('1')));
        assert_eq!(validate_slug("notes-"), Err(SlugError::EndsWithHyphen));
        assert_eq!(validate_slug("a--b"), Err(SlugError::ConsecutiveHyphens));
        assert_eq!(
            validate_slug("dose.mg"),
            Err(SlugError::InvalidCharacter('.'))
        );
    }

    #[test]
    fn test_slug_error_display() {
        assert_eq!(
            SlugError::InvalidStart('-').to_string(),
            "slug must start with a letter, found '-'"
        );
        assert_eq!(SlugError::Empty.to_string(), "slug cannot be empty");
    }
}
