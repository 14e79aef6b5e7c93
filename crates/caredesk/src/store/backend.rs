use crate::attributes::AttributeDefinition;
use crate::error::Result;
use crate::model::{AttributeValue, Category};
use crate::sla::SlaRule;
use uuid::Uuid;

/// Abstract interface for the records the engine reads and writes.
///
/// This trait covers the "how" of storage (document store, memory), while
/// [`AttributeRegistry`](crate::registry::AttributeRegistry) and the SLA
/// entry points handle the "what".
pub trait StorageBackend {
    // --- Categories ---

    /// Look up a category. `Ok(None)` if it does not exist.
    fn load_category(&self, id: Uuid) -> Result<Option<Category>>;

    // --- Attribute Definitions ---

    /// All definitions of a category, active and inactive, in storage order.
    fn load_definitions(&self, category_id: Uuid) -> Result<Vec<AttributeDefinition>>;

    /// Look up one definition by id. `Ok(None)` if it does not exist.
    fn load_definition(&self, id: Uuid) -> Result<Option<AttributeDefinition>>;

    /// Insert or replace a definition, keyed by its id.
    fn save_definition(&self, definition: &AttributeDefinition) -> Result<()>;

    // --- Attribute Values ---

    /// Every stored value of a ticket.
    fn load_values(&self, ticket_id: Uuid) -> Result<Vec<AttributeValue>>;

    /// Insert or replace each value under its (ticket, definition) pair.
    ///
    /// All or nothing: on `Err` none of the values may have been written.
    fn save_values(&self, values: &[AttributeValue]) -> Result<()>;

    // --- SLA Rules ---

    /// Candidate rules visible to a society.
    ///
    /// Rules without a society apply everywhere; rules scoped to another
    /// society are left out. `None` asks for platform-wide rules only.
    fn load_rules(&self, society_id: Option<Uuid>) -> Result<Vec<SlaRule>>;
}
