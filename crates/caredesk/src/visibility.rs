//! Conditional field visibility.
//!
//! Given a category's definitions and the form data typed so far, decide
//! which custom fields the form shows. Pure and cheap, so the UI can call it
//! on every keystroke.

use crate::attributes::AttributeDefinition;
use crate::conditions::evaluate;
use crate::model::FormData;
use uuid::Uuid;

/// Whether one definition is visible for the given form data.
///
/// Definitions without a condition are always visible.
pub fn is_visible(definition: &AttributeDefinition, form_data: &FormData) -> bool {
    match &definition.condition {
        None => true,
        Some(condition) => evaluate(form_data.get(&condition.field), condition),
    }
}

/// The category's active, currently visible definitions, sorted by `order`.
///
/// Definitions of other categories and inactive ones are skipped. Ties in
/// `order` keep their input order.
pub fn resolve_visible(
    definitions: &[AttributeDefinition],
    category_id: Uuid,
    form_data: &FormData,
) -> Vec<AttributeDefinition> {
    let mut visible: Vec<AttributeDefinition> = definitions
        .iter()
        .filter(|def| def.category_id == category_id && def.active)
        .filter(|def| is_visible(def, form_data))
        .cloned()
        .collect();
    visible.sort_by_key(|def| def.order);
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{NewAttribute, TypeConfig};
    use crate::conditions::Condition;
    use serde_json::json;

    fn def(category: Uuid, slug: &str, order: i32) -> AttributeDefinition {
        AttributeDefinition::from_new(
            category,
            NewAttribute::new(slug, slug, TypeConfig::text()).order(order),
        )
    }

    fn slugs(defs: &[AttributeDefinition]) -> Vec<&str> {
        defs.iter().map(|d| d.slug.as_str()).collect()
    }

    #[test]
    fn unconditional_fields_are_always_visible() {
        let category = Uuid::new_v4();
        let defs = vec![def(category, "notes", 0)];
        let visible = resolve_visible(&defs, category, &FormData::new());
        assert_eq!(slugs(&visible), vec!["notes"]);
    }

    #[test]
    fn condition_controls_visibility() {
        let category = Uuid::new_v4();
        let mut policy = def(category, "policyNumber", 1);
        policy.condition = Some(Condition::equals("hasInsurance", json!(true)));
        let defs = vec![def(category, "hasInsurance", 0), policy];

        let mut form = FormData::new();
        form.insert("hasInsurance".into(), json!(false));
        assert_eq!(
            slugs(&resolve_visible(&defs, category, &form)),
            vec!["hasInsurance"]
        );

        form.insert("hasInsurance".into(), json!(true));
        assert_eq!(
            slugs(&resolve_visible(&defs, category, &form)),
            vec!["hasInsurance", "policyNumber"]
        );
    }

    #[test]
    fn sorted_by_order_and_stable_on_ties() {
        let category = Uuid::new_v4();
        let defs = vec![
            def(category, "c", 2),
            def(category, "a1", 1),
            def(category, "z", 0),
            def(category, "a2", 1),
        ];

        let visible = resolve_visible(&defs, category, &FormData::new());
        assert_eq!(slugs(&visible), vec!["z", "a1", "a2", "c"]);
    }

    #[test]
    fn skips_inactive_and_foreign_definitions() {
        let category = Uuid::new_v4();
        let mut retired = def(category, "retired", 0);
        retired.active = false;
        let defs = vec![retired, def(Uuid::new_v4(), "other", 0), def(category, "mine", 5)];

        assert_eq!(
            slugs(&resolve_visible(&defs, category, &FormData::new())),
            vec!["mine"]
        );
    }

    #[test]
    fn repeated_calls_are_identical() {
        let category = Uuid::new_v4();
        let mut gated = def(category, "gated", 1);
        gated.condition = Some(Condition::greater_than("age", json!(18)));
        let defs = vec![gated, def(category, "a", 1), def(category, "b", 0)];
        let mut form = FormData::new();
        form.insert("age".into(), json!(30));

        let first = resolve_visible(&defs, category, &form);
        let second = resolve_visible(&defs, category, &form);
        assert_eq!(first, second);
        assert_eq!(slugs(&first), vec!["b", "gated", "a"]);
    }
}
