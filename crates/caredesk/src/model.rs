//! # Domain Model
//!
//! The records this crate reads from and writes to the surrounding ticket
//! service. Categories and tickets are owned elsewhere; only the fields the
//! engine needs are modelled here.
//!
//! - [`Category`]: a ticket category, optionally scoped to tenant societies
//! - [`TicketSnapshot`]: what SLA matching needs to know about a ticket
//! - [`AttributeValue`]: a ticket's stored answer for one custom field
//! - [`FormData`]: slug → value map of a form submission

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Submitted form data / custom-field values, keyed by slug.
pub type FormData = HashMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// Societies this category belongs to; empty means platform-wide.
    #[serde(default)]
    pub society_ids: Vec<Uuid>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            society_ids: Vec::new(),
        }
    }

    pub fn with_society(mut self, society_id: Uuid) -> Self {
        self.society_ids.push(society_id);
        self
    }
}

/// The ticket fields SLA evaluation depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSnapshot {
    pub id: Uuid,
    pub category_id: Uuid,
    /// 1 (very low) to 5 (urgent).
    pub priority: u8,
    pub created_at: DateTime<Utc>,
}

impl TicketSnapshot {
    pub fn new(category_id: Uuid, priority: u8, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            priority,
            created_at,
        }
    }
}

/// One ticket's value for one attribute definition.
///
/// At most one exists per (ticket, definition); saving again replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValue {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub definition_id: Uuid,
    pub value: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AttributeValue {
    pub fn new(ticket_id: Uuid, definition_id: Uuid, value: Value) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            ticket_id,
            definition_id,
            value,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the stored value, keeping identity and creation time.
    pub fn replace(&mut self, value: Value) {
        self.value = value;
        self.updated_at = Utc::now();
    }
}
