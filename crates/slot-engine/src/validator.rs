//! Write-time validation for proposed availability rules.
//!
//! A proposed rule passes through three gates, in order:
//!
//! 1. Field invariants (`day_of_week` in 0..=6, `start < end`, `slot_minutes > 0`).
//! 2. Exact-duplicate lookup (same barber, day, range and slot size).
//! 3. Overlap against the barber's other active rules for that day.
//!
//! Overlap candidates are examined in ascending `start_time` order (ties by id),
//! so the conflict reported for a given rule set is always the same one.

use tracing::debug;

use crate::error::{Result, SlotError};
use crate::interval::overlaps;
use crate::model::{AvailabilityRule, ProposedRule, RuleField, RuleId};
use crate::store::RuleStore;

/// What the caller should do with a proposed rule that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleDecision {
    /// Persist the rule as a new row.
    Create(ProposedRule),
    /// An identical inactive rule exists; flip it back to active instead.
    Reactivate(AvailabilityRule),
}

/// Check the structural invariants of a rule. No storage access.
pub fn validate_rule_fields(proposed: &ProposedRule) -> Result<()> {
    if proposed.day_of_week > 6 {
        return Err(SlotError::field(
            RuleField::DayOfWeek,
            "day_of_week must be between 0 and 6",
        ));
    }
    if proposed.start_time >= proposed.end_time {
        return Err(SlotError::field(
            RuleField::StartTime,
            "start_time must be less than end_time",
        ));
    }
    if proposed.slot_minutes <= 0 {
        return Err(SlotError::field(
            RuleField::SlotMinutes,
            "slot_minutes must be greater than 0",
        ));
    }
    Ok(())
}

/// Find the first rule in `existing` whose range overlaps the proposed one.
///
/// Callers pass the barber's other active rules for the same day.
pub fn find_overlap<'a>(
    existing: &'a [AvailabilityRule],
    proposed: &ProposedRule,
) -> Option<&'a AvailabilityRule> {
    let mut ordered: Vec<&AvailabilityRule> = existing.iter().collect();
    ordered.sort_by_key(|r| (r.start_time, r.id));
    ordered
        .into_iter()
        .find(|r| overlaps(proposed.start_time, proposed.end_time, r.start_time, r.end_time))
}

/// Validate a proposed rule against the store and decide how to apply it.
///
/// `exclude_id` is `None` when creating and the id of the rule being edited
/// when updating. The two modes differ only when an inactive exact duplicate
/// exists: a create reactivates it, an update is rejected with
/// [`SlotError::DuplicateInactiveExists`].
///
/// # Errors
/// - [`SlotError::InvalidRuleField`] when a field invariant fails.
/// - [`SlotError::DuplicateRule`] when an active exact duplicate exists.
/// - [`SlotError::DuplicateInactiveExists`] on update into an inactive duplicate.
/// - [`SlotError::OverlapConflict`] naming the first colliding active rule.
pub fn validate_and_prepare_rule<S: RuleStore + ?Sized>(
    store: &S,
    proposed: &ProposedRule,
    exclude_id: Option<RuleId>,
) -> Result<RuleDecision> {
    validate_rule_fields(proposed)?;

    if let Some(dup) = store.find_rule(proposed, exclude_id)? {
        if dup.is_active() {
            return Err(SlotError::DuplicateRule);
        }
        return match exclude_id {
            None => {
                debug!(rule_id = dup.id, "inactive exact duplicate found, reactivating");
                Ok(RuleDecision::Reactivate(dup))
            }
            Some(_) => Err(SlotError::DuplicateInactiveExists { rule_id: dup.id }),
        };
    }

    let existing = store.list_active_rules(proposed.barber_id, proposed.day_of_week, exclude_id)?;
    if let Some(conflict) = find_overlap(&existing, proposed) {
        debug!(
            rule_id = conflict.id,
            barber_id = proposed.barber_id,
            day_of_week = proposed.day_of_week,
            "proposed rule overlaps an active rule"
        );
        return Err(SlotError::OverlapConflict {
            rule_id: conflict.id,
            start: conflict.start_time,
            end: conflict.end_time,
        });
    }

    Ok(RuleDecision::Create(*proposed))
}
