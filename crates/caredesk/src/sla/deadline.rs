//! SLA deadlines and their read-time state.
//!
//! Nothing here is stored. The deadline is derived from the ticket's creation
//! time and the matched rule; breach, urgency and the countdown label are
//! recomputed on every read for whatever `now` the caller passes in.
//!
//! ```text
//! NoSla            (no rule matched)
//! Pending   ──▶   Breached          (now > deadline)
//! ```
//!
//! Urgency bands by hours remaining (thresholds configurable):
//!
//! | Urgency | Remaining |
//! |---------|-----------|
//! | `Breached` | ≤ 0 |
//! | `Critical` | under `critical_hours` (2) |
//! | `Warning` | under `warning_hours` (12) |
//! | `Ok` | the rest |

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use super::rule::SlaRule;
use crate::config::EngineConfig;
use crate::model::TicketSnapshot;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Deadline for a ticket under the matched rule; `None` when nothing matched.
pub fn compute_deadline(
    ticket: &TicketSnapshot,
    rule: Option<&SlaRule>,
) -> Option<DateTime<Utc>> {
    let rule = rule?;
    ticket
        .created_at
        .checked_add_signed(TimeDelta::hours(i64::from(rule.target_hours)))
}

/// True once `now` is past the deadline. A ticket without SLA never breaches.
pub fn is_breached(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    deadline.is_some_and(|deadline| now > deadline)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlaState {
    NoSla,
    Pending,
    Breached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Breached,
    Critical,
    Warning,
    Ok,
}

/// Deadline state at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineStatus {
    pub state: SlaState,
    pub deadline: Option<DateTime<Utc>>,
    pub urgency: Option<Urgency>,
    /// Time left; negative once overdue.
    #[serde(skip)]
    pub remaining: Option<TimeDelta>,
    /// Countdown text, e.g. "1 hour 30 minutes left".
    pub label: Option<String>,
}

impl DeadlineStatus {
    fn no_sla() -> Self {
        Self {
            state: SlaState::NoSla,
            deadline: None,
            urgency: None,
            remaining: None,
            label: None,
        }
    }
}

/// Classifies deadlines against urgency thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineTracker {
    critical_hours: u32,
    warning_hours: u32,
}

impl Default for DeadlineTracker {
    fn default() -> Self {
        Self {
            critical_hours: 2,
            warning_hours: 12,
        }
    }
}

impl DeadlineTracker {
    pub fn new(critical_hours: u32, warning_hours: u32) -> Self {
        Self {
            critical_hours,
            warning_hours,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.critical_hours, config.warning_hours)
    }

    /// Urgency band for a deadline as seen at `now`.
    pub fn urgency(&self, deadline: DateTime<Utc>, now: DateTime<Utc>) -> Urgency {
        let hours = (deadline - now).num_milliseconds() as f64 / MILLIS_PER_HOUR;
        if hours <= 0.0 {
            Urgency::Breached
        } else if hours < f64::from(self.critical_hours) {
            Urgency::Critical
        } else if hours < f64::from(self.warning_hours) {
            Urgency::Warning
        } else {
            Urgency::Ok
        }
    }

    /// Full read model for a (possibly absent) deadline.
    pub fn status(&self, deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DeadlineStatus {
        let Some(deadline) = deadline else {
            return DeadlineStatus::no_sla();
        };

        let remaining = deadline - now;
        let state = if is_breached(Some(deadline), now) {
            SlaState::Breached
        } else {
            SlaState::Pending
        };

        DeadlineStatus {
            state,
            deadline: Some(deadline),
            urgency: Some(self.urgency(deadline, now)),
            remaining: Some(remaining),
            label: Some(remaining_label(remaining)),
        }
    }
}

/// Countdown text with day/hour/minute precision.
pub fn remaining_label(remaining: TimeDelta) -> String {
    if remaining > TimeDelta::zero() {
        match format_span(remaining) {
            Some(span) => format!("{} left", span),
            None => "less than a minute left".to_string(),
        }
    } else if remaining == TimeDelta::zero() {
        "due now".to_string()
    } else {
        match format_span(-remaining) {
            Some(span) => format!("{} overdue", span),
            None => "less than a minute overdue".to_string(),
        }
    }
}

/// Format a positive span as at most two units between minutes and days.
/// `None` for spans under a minute.
fn format_span(span: TimeDelta) -> Option<String> {
    if span < TimeDelta::minutes(1) {
        return None;
    }
    let span = span.to_std().ok()?;

    let mut formatter = timeago::Formatter::new();
    formatter
        .num_items(2)
        .min_unit(timeago::TimeUnit::Minutes)
        .max_unit(timeago::TimeUnit::Days);
    let text = formatter.convert(span);
    Some(text.trim().trim_end_matches("ago").trim_end().to_string())
}
