//! # SLA Evaluation
//!
//! Picks the service-level rule governing a ticket and derives its
//! resolution deadline.
//!
//! - [`rule`]: [`SlaRule`] records and the priority label table
//! - [`matcher`]: strictest applicable rule for a ticket
//! - [`deadline`]: deadline arithmetic, breach and urgency at read time
//!
//! Absence of a matching rule is a normal outcome: the evaluation carries no
//! deadline and the ticket can never breach. Nothing in here fails except
//! loading rules from storage.

pub mod deadline;
pub mod matcher;
pub mod rule;

pub use deadline::{
    compute_deadline, is_breached, remaining_label, DeadlineStatus, DeadlineTracker, SlaState,
    Urgency,
};
pub use matcher::{match_rule, rule_applies};
pub use rule::{priority_level, SlaConditions, SlaRule, DEFAULT_PRIORITY_LEVEL, PRIORITY_LEVELS};

use crate::error::Result;
use crate::model::TicketSnapshot;
use crate::store::StorageBackend;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Derived SLA outcome for a ticket. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaEvaluation {
    pub deadline: Option<DateTime<Utc>>,
    pub applied_rule_name: Option<String>,
    pub target_hours: Option<u32>,
}

impl SlaEvaluation {
    pub fn has_sla(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_breached(&self, now: DateTime<Utc>) -> bool {
        is_breached(self.deadline, now)
    }

    /// Read model for countdown displays.
    pub fn status(&self, tracker: &DeadlineTracker, now: DateTime<Utc>) -> DeadlineStatus {
        tracker.status(self.deadline, now)
    }
}

/// Match the ticket against `rules` and compute its deadline.
pub fn evaluate(ticket: &TicketSnapshot, rules: &[SlaRule]) -> SlaEvaluation {
    let rule = match_rule(ticket, rules);
    SlaEvaluation {
        deadline: compute_deadline(ticket, rule),
        applied_rule_name: rule.map(|r| r.name.clone()),
        target_hours: rule.map(|r| r.target_hours),
    }
}

/// [`evaluate`] against the rules the backend holds for `society_id`.
pub fn evaluate_stored<B: StorageBackend>(
    backend: &B,
    ticket: &TicketSnapshot,
    society_id: Option<Uuid>,
) -> Result<SlaEvaluation> {
    let rules = backend.load_rules(society_id)?;
    Ok(evaluate(ticket, &rules))
}
