//! SLA rules and the priority label table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Level a priority label maps to when the label is not in the table.
pub const DEFAULT_PRIORITY_LEVEL: u8 = 3;

/// Canonical label → ticket priority table used by rule matching.
///
/// Nothing maps to 1 ("very low"); rules cannot target priority-1 tickets.
pub const PRIORITY_LEVELS: &[(&str, u8)] = &[("low", 2), ("medium", 3), ("high", 4), ("urgent", 5)];

/// Map a rule's priority label to a ticket priority level.
///
/// Labels match exactly; anything else (including `"Urgent"` or `" high"`)
/// maps to [`DEFAULT_PRIORITY_LEVEL`].
pub fn priority_level(label: &str) -> u8 {
    PRIORITY_LEVELS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, level)| *level)
        .unwrap_or(DEFAULT_PRIORITY_LEVEL)
}

/// Which tickets a rule applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaConditions {
    /// Category ids; empty applies to every category.
    #[serde(default)]
    pub categories: Vec<Uuid>,
    /// Priority label (`low`, `medium`, `high`, `urgent`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_hours_only: Option<bool>,
}

impl SlaConditions {
    pub fn applies_to_category(&self, category_id: Uuid) -> bool {
        self.categories.is_empty() || self.categories.contains(&category_id)
    }

    /// The ticket priority this rule is restricted to, if any.
    pub fn priority_level(&self) -> Option<u8> {
        self.priority.as_deref().map(priority_level)
    }
}

/// A resolution-time policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaRule {
    pub id: Uuid,
    pub name: String,
    /// Resolution budget in hours; smaller is stricter.
    pub target_hours: u32,
    pub is_active: bool,
    #[serde(default)]
    pub requires_approval: bool,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub conditions: SlaConditions,
    /// Owning society; `None` applies to every society.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub society_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SlaRule {
    /// An active, unconditional rule.
    pub fn new(name: impl Into<String>, target_hours: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target_hours,
            is_active: true,
            requires_approval: false,
            is_approved: false,
            conditions: SlaConditions::default(),
            society_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn for_categories(mut self, categories: impl IntoIterator<Item = Uuid>) -> Self {
        self.conditions.categories = categories.into_iter().collect();
        self
    }

    pub fn for_priority(mut self, label: impl Into<String>) -> Self {
        self.conditions.priority = Some(label.into());
        self
    }

    pub fn business_hours_only(mut self, value: bool) -> Self {
        self.conditions.business_hours_only = Some(value);
        self
    }

    pub fn for_society(mut self, society_id: Uuid) -> Self {
        self.society_id = Some(society_id);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Gate the rule behind approval.
    pub fn pending_approval(mut self) -> Self {
        self.requires_approval = true;
        self.is_approved = false;
        self
    }

    pub fn approved(mut self) -> Self {
        self.requires_approval = true;
        self.is_approved = true;
        self
    }

    /// Active, with a positive target, and not waiting on approval.
    pub fn is_enforceable(&self) -> bool {
        self.is_active && self.target_hours > 0 && !(self.requires_approval && !self.is_approved)
    }

    pub fn applies_to_society(&self, society_id: Option<Uuid>) -> bool {
        match (self.society_id, society_id) {
            (None, _) => true,
            (Some(own), Some(wanted)) => own == wanted,
            (Some(_), None) => false,
        }
    }
}
