//! # Attribute Registry
//!
//! Authoring and submission surface for category custom fields, over any
//! [`StorageBackend`].
//!
//! ## Authoring
//!
//! - `create`: category must exist, slug well-formed and unique among the
//!   category's *active* definitions, config shape valid
//! - `update`: merges a patch, re-checks the slug only when it changes
//!   (excluding the definition itself) and re-validates the merged config
//! - `deactivate`: soft delete; stored values are untouched
//!
//! ## Submission
//!
//! `validate_submission` checks every definition visible for the submitted
//! data and returns all field errors at once. `submit_values` writes nothing
//! unless that list is empty, and then writes all values in a single
//! all-or-nothing backend call.
//!
//! Business-rule violations in submitted values are returned as data
//! ([`ValidationError`] lists); only integrity problems (missing references,
//! duplicate slugs, bad configs, storage failures) come back as `Err`.

use crate::attributes::{
    validate_config, validate_slug, validate_value, AttributeDefinition, AttributePatch,
    ListFilter, NewAttribute, ValidationError,
};
use crate::error::{DeskError, Result};
use crate::model::{AttributeValue, Category, FormData};
use crate::store::StorageBackend;
use crate::visibility::resolve_visible;
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

/// Outcome of [`AttributeRegistry::submit_values`].
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Values written, one per submitted visible field.
    Accepted(Vec<AttributeValue>),
    /// Nothing written.
    Rejected(Vec<ValidationError>),
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Submission::Accepted(_))
    }

    pub fn errors(&self) -> &[ValidationError] {
        match self {
            Submission::Accepted(_) => &[],
            Submission::Rejected(errors) => errors,
        }
    }
}

pub struct AttributeRegistry<B: StorageBackend> {
    pub(crate) backend: B,
}

impl<B: StorageBackend> AttributeRegistry<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn require_category(&self, category_id: Uuid) -> Result<Category> {
        self.backend
            .load_category(category_id)?
            .ok_or(DeskError::CategoryNotFound(category_id))
    }

    /// Loads a definition that is still active.
    fn require_active(&self, id: Uuid) -> Result<AttributeDefinition> {
        match self.backend.load_definition(id)? {
            Some(def) if def.active => Ok(def),
            _ => Err(DeskError::DefinitionNotFound(id)),
        }
    }

    fn ensure_slug_free(&self, category_id: Uuid, slug: &str, except: Option<Uuid>) -> Result<()> {
        let taken = self
            .backend
            .load_definitions(category_id)?
            .iter()
            .any(|d| d.active && d.slug == slug && Some(d.id) != except);
        if taken {
            return Err(DeskError::DuplicateSlug {
                category_id,
                slug: slug.to_string(),
            });
        }
        Ok(())
    }

    /// Define a new custom field for a category.
    pub fn create(&self, category_id: Uuid, attribute: NewAttribute) -> Result<AttributeDefinition> {
        self.require_category(category_id)?;
        validate_slug(&attribute.slug)?;
        validate_config(&attribute.config)?;
        self.ensure_slug_free(category_id, &attribute.slug, None)?;

        let definition = AttributeDefinition::from_new(category_id, attribute);
        self.backend.save_definition(&definition)?;

        info!(
            category = %category_id,
            slug = %definition.slug,
            attribute_type = %definition.attribute_type(),
            "created attribute definition"
        );
        Ok(definition)
    }

    /// Apply a partial update to an active definition.
    pub fn update(&self, id: Uuid, patch: AttributePatch) -> Result<AttributeDefinition> {
        let current = self.require_active(id)?;
        let mut updated = current.clone();
        updated.apply(patch);

        if updated.slug != current.slug {
            validate_slug(&updated.slug)?;
            self.ensure_slug_free(updated.category_id, &updated.slug, Some(id))?;
        }
        validate_config(&updated.config)?;

        self.backend.save_definition(&updated)?;
        info!(id = %id, slug = %updated.slug, "updated attribute definition");
        Ok(updated)
    }

    /// Soft-delete a definition. Already inactive definitions are returned as-is.
    pub fn deactivate(&self, id: Uuid) -> Result<AttributeDefinition> {
        let mut definition = self
            .backend
            .load_definition(id)?
            .ok_or(DeskError::DefinitionNotFound(id))?;
        if !definition.active {
            return Ok(definition);
        }

        definition.active = false;
        definition.updated_at = Utc::now();
        self.backend.save_definition(&definition)?;
        info!(id = %id, slug = %definition.slug, "deactivated attribute definition");
        Ok(definition)
    }

    /// Active definitions of a category, narrowed by `filter`, in display order.
    pub fn list_for_category(
        &self,
        category_id: Uuid,
        filter: ListFilter,
    ) -> Result<Vec<AttributeDefinition>> {
        self.require_category(category_id)?;
        let mut definitions: Vec<AttributeDefinition> = self
            .backend
            .load_definitions(category_id)?
            .into_iter()
            .filter(|d| d.active && filter.matches(d))
            .collect();
        definitions.sort_by_key(|d| d.order);
        Ok(definitions)
    }

    /// Definitions the form shows for the given data.
    pub fn visible_attributes(
        &self,
        category_id: Uuid,
        form_data: &FormData,
    ) -> Result<Vec<AttributeDefinition>> {
        self.require_category(category_id)?;
        let definitions = self.backend.load_definitions(category_id)?;
        Ok(resolve_visible(&definitions, category_id, form_data))
    }

    /// Validate a submission; an empty list means it may be saved.
    pub fn validate_submission(
        &self,
        category_id: Uuid,
        values: &FormData,
    ) -> Result<Vec<ValidationError>> {
        let visible = self.visible_attributes(category_id, values)?;
        let errors: Vec<ValidationError> = visible
            .iter()
            .filter_map(|def| validate_value(def, values.get(&def.slug)))
            .collect();

        if !errors.is_empty() {
            debug!(
                category = %category_id,
                errors = errors.len(),
                fields = ?errors.iter().map(|e| e.slug.as_str()).collect::<Vec<_>>(),
                "rejected attribute submission"
            );
        }
        Ok(errors)
    }

    /// Validate then store a ticket's custom-field values.
    pub fn submit_values(
        &self,
        ticket_id: Uuid,
        category_id: Uuid,
        values: &FormData,
    ) -> Result<Submission> {
        let errors = self.validate_submission(category_id, values)?;
        if !errors.is_empty() {
            return Ok(Submission::Rejected(errors));
        }

        let visible = self.visible_attributes(category_id, values)?;
        let mut existing = self.backend.load_values(ticket_id)?;
        let mut stored = Vec::new();

        for def in &visible {
            let Some(value) = values.get(&def.slug) else {
                continue;
            };
            let record = match existing.iter_mut().find(|v| v.definition_id == def.id) {
                Some(current) => {
                    current.replace(value.clone());
                    current.clone()
                }
                None => AttributeValue::new(ticket_id, def.id, value.clone()),
            };
            stored.push(record);
        }

        // One batch, so a storage failure leaves the ticket's values untouched.
        self.backend.save_values(&stored)?;

        info!(
            ticket = %ticket_id,
            category = %category_id,
            values = stored.len(),
            "stored attribute values"
        );
        Ok(Submission::Accepted(stored))
    }

    /// Every value stored for a ticket, including those of retired fields.
    pub fn values_for_ticket(&self, ticket_id: Uuid) -> Result<Vec<AttributeValue>> {
        self.backend.load_values(ticket_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{ConfigError, SlugError, TypeConfig, ValidationErrorKind};
    use crate::conditions::Condition;
    use crate::store::fixtures::DeskFixture;
    use crate::store::MemBackend;
    use serde_json::json;

    fn notes() -> NewAttribute {
        NewAttribute::new("Notes", "notes", TypeConfig::text_bounded(None, Some(100)))
    }

    fn form(pairs: &[(&str, serde_json::Value)]) -> FormData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_create_requires_category() {
        let registry = AttributeRegistry::with_backend(MemBackend::new());
        let missing = Uuid::new_v4();
        let result = registry.create(missing, notes());
        assert!(matches!(result, Err(DeskError::CategoryNotFound(id)) if id == missing));
    }

    #[test]
    fn test_create_persists_active_definition() {
        let fx = DeskFixture::new();
        let def = fx.create(notes());

        assert!(def.active);
        assert_eq!(def.category_id, fx.category_id());
        let listed = fx
            .registry
            .list_for_category(fx.category_id(), ListFilter::default())
            .unwrap();
        assert_eq!(listed, vec![def]);
    }

    #[test]
    fn test_create_rejects_bad_slug_and_config() {
        let fx = DeskFixture::new();

        let bad_slug = fx.registry.create(
            fx.category_id(),
            NewAttribute::new("Notes", "1notes", TypeConfig::text()),
        );
        assert!(matches!(
            bad_slug,
            Err(DeskError::InvalidSlug(SlugError::InvalidStart('1')))
        ));

        let no_options = fx.registry.create(
            fx.category_id(),
            NewAttribute::new("Colour", "colour", TypeConfig::select(Vec::<String>::new())),
        );
        assert!(matches!(
            no_options,
            Err(DeskError::InvalidConfig(ConfigError::MissingOptions(_)))
        ));
    }

    #[test]
    fn test_duplicate_slug_until_deactivated() {
        let fx = DeskFixture::new();
        let first = fx.create(notes());

        let dup = fx.registry.create(fx.category_id(), notes());
        assert!(matches!(dup, Err(DeskError::DuplicateSlug { ref slug, .. }) if slug == "notes"));

        fx.registry.deactivate(first.id).unwrap();
        let second = fx.registry.create(fx.category_id(), notes()).unwrap();
        assert_ne!(second.id, first.id);
    }

    #[test]
    fn test_same_slug_in_other_category_is_fine() {
        let fx = DeskFixture::new();
        fx.create(notes());

        let other = Category::new("Billing");
        fx.backend().insert_category(other.clone());
        assert!(fx.registry.create(other.id, notes()).is_ok());
    }

    #[test]
    fn test_update_rename_checks_uniqueness_excluding_self() {
        let fx = DeskFixture::new();
        let notes_def = fx.create(notes());
        fx.create(NewAttribute::new("Phone", "phone", TypeConfig::text()));

        // Re-stating its own slug is not a conflict.
        let same = fx
            .registry
            .update(notes_def.id, AttributePatch::new().slug("notes").name("Remarks"))
            .unwrap();
        assert_eq!(same.name, "Remarks");

        let clash = fx
            .registry
            .update(notes_def.id, AttributePatch::new().slug("phone"));
        assert!(matches!(clash, Err(DeskError::DuplicateSlug { .. })));

        let renamed = fx
            .registry
            .update(notes_def.id, AttributePatch::new().slug("remarks"))
            .unwrap();
        assert_eq!(renamed.slug, "remarks");
    }

    #[test]
    fn test_update_validates_merged_config() {
        let fx = DeskFixture::new();
        let def = fx.create(NewAttribute::new("Age", "age", TypeConfig::number(Some(0.0), None)));

        let inverted = fx.registry.update(
            def.id,
            AttributePatch::new().config(TypeConfig::number(Some(10.0), Some(1.0))),
        );
        assert!(matches!(
            inverted,
            Err(DeskError::InvalidConfig(ConfigError::InvertedBounds { .. }))
        ));

        // Rejected updates are not persisted.
        let stored = fx.backend().load_definition(def.id).unwrap().unwrap();
        assert_eq!(stored.config, def.config);
    }

    #[test]
    fn test_update_of_inactive_definition_fails() {
        let fx = DeskFixture::new();
        let def = fx.create(notes());
        fx.registry.deactivate(def.id).unwrap();

        let result = fx.registry.update(def.id, AttributePatch::new().required(true));
        assert!(matches!(result, Err(DeskError::DefinitionNotFound(id)) if id == def.id));
        assert!(fx
            .registry
            .update(Uuid::new_v4(), AttributePatch::new())
            .unwrap_err()
            .is_reference_error());
    }

    #[test]
    fn test_deactivate_is_idempotent() {
        let fx = DeskFixture::new();
        let def = fx.create(notes());

        let first = fx.registry.deactivate(def.id).unwrap();
        let again = fx.registry.deactivate(def.id).unwrap();
        assert!(!first.active);
        assert_eq!(first, again);
        assert!(matches!(
            fx.registry.deactivate(Uuid::new_v4()),
            Err(DeskError::DefinitionNotFound(_))
        ));
    }

    #[test]
    fn test_list_filters_and_order() {
        let fx = DeskFixture::new()
            .attribute(NewAttribute::new("C", "c", TypeConfig::text()).order(3))
            .attribute(
                NewAttribute::new("Internal", "internal", TypeConfig::text())
                    .order(1)
                    .hidden_in_creation(),
            )
            .attribute(NewAttribute::new("A", "a", TypeConfig::text()).order(0).hidden_in_list());

        let slugs = |defs: Vec<AttributeDefinition>| defs.into_iter().map(|d| d.slug).collect::<Vec<_>>();
        let id = fx.category_id();

        assert_eq!(
            slugs(fx.registry.list_for_category(id, ListFilter::default()).unwrap()),
            vec!["a", "internal", "c"]
        );
        assert_eq!(
            slugs(fx.registry.list_for_category(id, ListFilter::creation_form()).unwrap()),
            vec!["a", "c"]
        );
        assert_eq!(
            slugs(fx.registry.list_for_category(id, ListFilter::list_columns()).unwrap()),
            vec!["internal", "c"]
        );
    }

    #[test]
    fn test_validate_submission_collects_all_errors() {
        let fx = DeskFixture::new()
            .attribute(notes())
            .attribute(NewAttribute::new("Phone", "phone", TypeConfig::text()).required())
            .attribute(NewAttribute::new("Age", "age", TypeConfig::number(Some(0.0), Some(130.0))));

        let errors = fx
            .registry
            .validate_submission(
                fx.category_id(),
                &form(&[("notes", json!("x".repeat(101))), ("age", json!(200))]),
            )
            .unwrap();

        let mut slugs: Vec<&str> = errors.iter().map(|e| e.slug.as_str()).collect();
        slugs.sort();
        assert_eq!(slugs, vec!["age", "notes", "phone"]);
    }

    #[test]
    fn test_hidden_required_field_does_not_block() {
        let fx = DeskFixture::new()
            .attribute(NewAttribute::new("Insured", "hasInsurance", TypeConfig::boolean()))
            .attribute(
                NewAttribute::new("Policy", "policyNumber", TypeConfig::text())
                    .required()
                    .condition(Condition::equals("hasInsurance", json!(true))),
            );

        let hidden = fx
            .registry
            .validate_submission(fx.category_id(), &form(&[("hasInsurance", json!(false))]))
            .unwrap();
        assert!(hidden.is_empty());

        let shown = fx
            .registry
            .validate_submission(fx.category_id(), &form(&[("hasInsurance", json!(true))]))
            .unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].slug, "policyNumber");
        assert_eq!(shown[0].kind, ValidationErrorKind::Required);
    }

    #[test]
    fn test_submit_values_rejects_without_writing() {
        let fx = DeskFixture::new().attribute(notes());
        let ticket = Uuid::new_v4();

        let outcome = fx
            .registry
            .submit_values(ticket, fx.category_id(), &form(&[("notes", json!(42))]))
            .unwrap();

        assert!(!outcome.is_accepted());
        assert_eq!(outcome.errors().len(), 1);
        assert!(fx.registry.values_for_ticket(ticket).unwrap().is_empty());
    }

    #[test]
    fn test_submit_values_upserts() {
        let fx = DeskFixture::new().attribute(notes());
        let ticket = Uuid::new_v4();

        let first = fx
            .registry
            .submit_values(
                ticket,
                fx.category_id(),
                &form(&[("notes", json!("first")), ("unknown", json!(1))]),
            )
            .unwrap();
        let Submission::Accepted(first) = first else {
            panic!("expected accepted submission");
        };
        assert_eq!(first.len(), 1);

        fx.registry
            .submit_values(ticket, fx.category_id(), &form(&[("notes", json!("second"))]))
            .unwrap();

        let stored = fx.registry.values_for_ticket(ticket).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, first[0].id);
        assert_eq!(stored[0].value, json!("second"));
    }

    #[test]
    fn test_values_survive_deactivation() {
        let fx = DeskFixture::new().attribute(notes());
        let ticket = Uuid::new_v4();
        fx.registry
            .submit_values(ticket, fx.category_id(), &form(&[("notes", json!("kept"))]))
            .unwrap();

        let def = fx
            .registry
            .list_for_category(fx.category_id(), ListFilter::default())
            .unwrap()
            .remove(0);
        fx.registry.deactivate(def.id).unwrap();

        let stored = fx.registry.values_for_ticket(ticket).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].definition_id, def.id);
    }

    /// Refuses any value batch that touches one definition.
    struct RefusesDefinition {
        inner: MemBackend,
        refused: Uuid,
    }

    impl StorageBackend for RefusesDefinition {
        fn load_category(&self, id: Uuid) -> Result<Option<Category>> {
            self.inner.load_category(id)
        }
        fn load_definitions(&self, category_id: Uuid) -> Result<Vec<AttributeDefinition>> {
            self.inner.load_definitions(category_id)
        }
        fn load_definition(&self, id: Uuid) -> Result<Option<AttributeDefinition>> {
            self.inner.load_definition(id)
        }
        fn save_definition(&self, definition: &AttributeDefinition) -> Result<()> {
            self.inner.save_definition(definition)
        }
        fn load_values(&self, ticket_id: Uuid) -> Result<Vec<AttributeValue>> {
            self.inner.load_values(ticket_id)
        }
        fn save_values(&self, values: &[AttributeValue]) -> Result<()> {
            if values.iter().any(|v| v.definition_id == self.refused) {
                return Err(DeskError::Store("refused".to_string()));
            }
            self.inner.save_values(values)
        }
        fn load_rules(&self, society_id: Option<Uuid>) -> Result<Vec<crate::sla::SlaRule>> {
            self.inner.load_rules(society_id)
        }
    }

    #[test]
    fn test_failed_write_stores_no_values() {
        let category = Category::new("Lab");
        let inner = MemBackend::new().with_category(category.clone());
        let setup = AttributeRegistry::with_backend(inner);
        setup
            .create(category.id, NewAttribute::new("First", "first", TypeConfig::text()).order(0))
            .unwrap();
        let last = setup
            .create(category.id, NewAttribute::new("Last", "last", TypeConfig::text()).order(1))
            .unwrap();

        let registry = AttributeRegistry::with_backend(RefusesDefinition {
            inner: setup.backend,
            refused: last.id,
        });
        let ticket = Uuid::new_v4();
        let result = registry.submit_values(
            ticket,
            category.id,
            &form(&[("first", json!("a")), ("last", json!("b"))]),
        );

        assert!(matches!(result, Err(DeskError::Store(_))));
        assert!(registry.values_for_ticket(ticket).unwrap().is_empty());
    }

    #[test]
    fn test_storage_failure_propagates() {
        let fx = DeskFixture::new();
        fx.backend().set_simulate_write_error(true);
        assert!(matches!(
            fx.registry.create(fx.category_id(), notes()),
            Err(DeskError::Store(_))
        ));
    }
}
