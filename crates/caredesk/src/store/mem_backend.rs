use super::backend::StorageBackend;
use crate::attributes::AttributeDefinition;
use crate::error::{DeskError, Result};
use crate::model::{AttributeValue, Category};
use crate::sla::SlaRule;
use std::cell::RefCell;
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory storage backend for tests and embedding.
///
/// Uses `RefCell` for interior mutability so the `StorageBackend` trait can
/// take `&self` everywhere. Single-threaded.
#[derive(Default)]
pub struct MemBackend {
    categories: RefCell<HashMap<Uuid, Category>>,
    /// Insertion order is kept so listings are stable.
    definitions: RefCell<Vec<AttributeDefinition>>,
    values: RefCell<HashMap<(Uuid, Uuid), AttributeValue>>,
    rules: RefCell<Vec<SlaRule>>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    pub fn insert_category(&self, category: Category) {
        self.categories.borrow_mut().insert(category.id, category);
    }

    pub fn insert_rule(&self, rule: SlaRule) {
        let mut rules = self.rules.borrow_mut();
        match rules.iter_mut().find(|r| r.id == rule.id) {
            Some(existing) => *existing = rule,
            None => rules.push(rule),
        }
    }

    /// Builder form of [`insert_category`](Self::insert_category).
    pub fn with_category(self, category: Category) -> Self {
        self.insert_category(category);
        self
    }

    /// Builder form of [`insert_rule`](Self::insert_rule).
    pub fn with_rule(self, rule: SlaRule) -> Self {
        self.insert_rule(rule);
        self
    }

    fn check_writable(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(DeskError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn load_category(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.categories.borrow().get(&id).cloned())
    }

    fn load_definitions(&self, category_id: Uuid) -> Result<Vec<AttributeDefinition>> {
        let definitions = self.definitions.borrow();
        Ok(definitions
            .iter()
            .filter(|d| d.category_id == category_id)
            .cloned()
            .collect())
    }

    fn load_definition(&self, id: Uuid) -> Result<Option<AttributeDefinition>> {
        let definitions = self.definitions.borrow();
        Ok(definitions.iter().find(|d| d.id == id).cloned())
    }

    fn save_definition(&self, definition: &AttributeDefinition) -> Result<()> {
        self.check_writable()?;
        let mut definitions = self.definitions.borrow_mut();
        match definitions.iter_mut().find(|d| d.id == definition.id) {
            Some(existing) => *existing = definition.clone(),
            None => definitions.push(definition.clone()),
        }
        Ok(())
    }

    fn load_values(&self, ticket_id: Uuid) -> Result<Vec<AttributeValue>> {
        let values = self.values.borrow();
        let mut found: Vec<AttributeValue> = values
            .values()
            .filter(|v| v.ticket_id == ticket_id)
            .cloned()
            .collect();
        found.sort_by_key(|v| (v.created_at, v.definition_id));
        Ok(found)
    }

    fn save_values(&self, new_values: &[AttributeValue]) -> Result<()> {
        self.check_writable()?;
        let mut values = self.values.borrow_mut();
        for value in new_values {
            values.insert((value.ticket_id, value.definition_id), value.clone());
        }
        Ok(())
    }

    fn load_rules(&self, society_id: Option<Uuid>) -> Result<Vec<SlaRule>> {
        let rules = self.rules.borrow();
        Ok(rules
            .iter()
            .filter(|r| r.applies_to_society(society_id))
            .cloned()
            .collect())
    }
}
