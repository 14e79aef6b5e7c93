//! SLA rule selection.
//!
//! Filters run in a fixed order:
//! 1. enforceable (active, a positive target, approved when approval is required)
//! 2. category (empty category list applies to all)
//! 3. priority (label mapped through the priority table, exact match)
//!
//! Of the survivors the strictest rule (fewest target hours) wins. Equal
//! target hours fall back to rule name, then id, so the choice never depends
//! on the order rules were loaded in.

use tracing::debug;

use super::rule::SlaRule;
use crate::model::TicketSnapshot;

/// Whether `rule` applies to `ticket`.
pub fn rule_applies(rule: &SlaRule, ticket: &TicketSnapshot) -> bool {
    if !rule.is_enforceable() {
        return false;
    }
    if !rule.conditions.applies_to_category(ticket.category_id) {
        return false;
    }
    match rule.conditions.priority_level() {
        Some(level) => level == ticket.priority,
        None => true,
    }
}

/// Select the applicable rule for a ticket, if any.
pub fn match_rule<'a>(ticket: &TicketSnapshot, rules: &'a [SlaRule]) -> Option<&'a SlaRule> {
    let matched = rules
        .iter()
        .filter(|rule| rule_applies(rule, ticket))
        .min_by(|a, b| {
            a.target_hours
                .cmp(&b.target_hours)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });

    match matched {
        Some(rule) => debug!(
            ticket = %ticket.id,
            rule = %rule.name,
            target_hours = rule.target_hours,
            "matched SLA rule"
        ),
        None => debug!(ticket = %ticket.id, candidates = rules.len(), "no SLA rule applies"),
    }
    matched
}
