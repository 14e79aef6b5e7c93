use super::mem_backend::MemBackend;
use crate::attributes::{AttributeDefinition, NewAttribute};
use crate::model::Category;
use crate::registry::AttributeRegistry;
use crate::sla::SlaRule;
use uuid::Uuid;

/// A registry over a fresh [`MemBackend`] holding one category.
pub struct DeskFixture {
    pub registry: AttributeRegistry<MemBackend>,
    pub category: Category,
}

impl Default for DeskFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl DeskFixture {
    pub fn new() -> Self {
        Self::with_category(Category::new("General enquiries"))
    }

    pub fn with_category(category: Category) -> Self {
        let backend = MemBackend::new().with_category(category.clone());
        Self {
            registry: AttributeRegistry::with_backend(backend),
            category,
        }
    }

    pub fn category_id(&self) -> Uuid {
        self.category.id
    }

    /// Create an attribute in the fixture's category, panicking on rejection.
    pub fn create(&self, attribute: NewAttribute) -> AttributeDefinition {
        self.registry
            .create(self.category.id, attribute)
            .expect("fixture attribute should be valid")
    }

    pub fn attribute(self, attribute: NewAttribute) -> Self {
        self.create(attribute);
        self
    }

    pub fn rule(self, rule: SlaRule) -> Self {
        self.registry.backend().insert_rule(rule);
        self
    }

    pub fn backend(&self) -> &MemBackend {
        self.registry.backend()
    }
}
