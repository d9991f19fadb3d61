//! Rule write paths: create, update, soft delete, and listing.
//!
//! Each path validates through [`validate_and_prepare_rule`] and then calls the
//! store's mutation primitives. Slot sizes submitted here must also fall inside
//! the [`EngineConfig`] range.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{Entity, Result, SlotError};
use crate::model::{AvailabilityRule, BarberId, ProposedRule, RuleField, RuleId, Status};
use crate::store::RuleStore;
use crate::timefmt;
use crate::validator::{validate_and_prepare_rule, validate_rule_fields, RuleDecision};

/// A new rule as submitted for a barber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleInput {
    pub day_of_week: u8,
    #[serde(with = "timefmt::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "timefmt::hhmm")]
    pub end_time: NaiveTime,
    /// Falls back to [`EngineConfig::default_slot_minutes`].
    #[serde(default)]
    pub slot_minutes: Option<i64>,
}

/// A partial update. `None` keeps the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RulePatch {
    pub day_of_week: Option<u8>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub slot_minutes: Option<i64>,
    pub status: Option<Status>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
    Created,
    Reactivated,
}

/// The rule a create call produced, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleWrite {
    pub rule: AvailabilityRule,
    pub outcome: WriteOutcome,
}

/// Create a rule for `barber_id`, or reactivate an identical inactive one.
pub fn create_rule<S: RuleStore + ?Sized>(
    store: &mut S,
    config: &EngineConfig,
    barber_id: BarberId,
    input: &RuleInput,
) -> Result<RuleWrite> {
    require_barber(&*store, barber_id)?;

    let slot_minutes = input.slot_minutes.unwrap_or(config.default_slot_minutes);
    config.check_slot_minutes(slot_minutes)?;

    let proposed = ProposedRule {
        barber_id,
        day_of_week: input.day_of_week,
        start_time: input.start_time,
        end_time: input.end_time,
        slot_minutes,
    };

    match validate_and_prepare_rule(&*store, &proposed, None)? {
        RuleDecision::Create(proposed) => {
            let rule = store.persist(&proposed)?;
            debug!(rule_id = rule.id, barber_id, "availability rule created");
            Ok(RuleWrite {
                rule,
                outcome: WriteOutcome::Created,
            })
        }
        RuleDecision::Reactivate(existing) => {
            let rule = store.reactivate(existing.id)?;
            debug!(rule_id = rule.id, barber_id, "availability rule reactivated");
            Ok(RuleWrite {
                rule,
                outcome: WriteOutcome::Reactivated,
            })
        }
    }
}

/// Apply a partial update to an existing rule.
///
/// Field invariants are always enforced. Duplicate and overlap checks run only
/// when the rule ends up active, so deactivating through an update never
/// conflicts.
pub fn update_rule<S: RuleStore + ?Sized>(
    store: &mut S,
    config: &EngineConfig,
    rule_id: RuleId,
    patch: &RulePatch,
) -> Result<AvailabilityRule> {
    let current = store
        .get_rule(rule_id)?
        .ok_or_else(|| SlotError::not_found(Entity::Rule, rule_id))?;

    if let Some(slot_minutes) = patch.slot_minutes {
        config.check_slot_minutes(slot_minutes)?;
    }

    let updated = AvailabilityRule {
        day_of_week: patch.day_of_week.unwrap_or(current.day_of_week),
        start_time: patch.start_time.unwrap_or(current.start_time),
        end_time: patch.end_time.unwrap_or(current.end_time),
        slot_minutes: patch.slot_minutes.unwrap_or(current.slot_minutes),
        status: patch.status.unwrap_or(current.status),
        ..current
    };

    let proposed = ProposedRule::from(&updated);
    if updated.is_active() {
        validate_and_prepare_rule(&*store, &proposed, Some(rule_id))?;
    } else {
        validate_rule_fields(&proposed)?;
    }

    let rule = store.update(&updated)?;
    debug!(rule_id, status = ?rule.status, "availability rule updated");
    Ok(rule)
}

/// Soft delete: mark the rule inactive and return it.
pub fn delete_rule<S: RuleStore + ?Sized>(store: &mut S, rule_id: RuleId) -> Result<AvailabilityRule> {
    if store.get_rule(rule_id)?.is_none() {
        return Err(SlotError::not_found(Entity::Rule, rule_id));
    }
    let rule = store.deactivate(rule_id)?;
    debug!(rule_id, "availability rule deactivated");
    Ok(rule)
}

/// Deactivate every rule of a barber, e.g. when the barber is removed.
pub fn deactivate_barber_rules<S: RuleStore + ?Sized>(
    store: &mut S,
    barber_id: BarberId,
) -> Result<usize> {
    require_barber(&*store, barber_id)?;
    let changed = store.deactivate_barber_rules(barber_id)?;
    debug!(barber_id, changed, "barber rules deactivated");
    Ok(changed)
}

/// Column used to order [`list_rules`] output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    #[default]
    Id,
    DayOfWeek,
    StartTime,
    EndTime,
    CreatedAt,
}

impl FromStr for OrderBy {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "id" => Ok(OrderBy::Id),
            "day_of_week" => Ok(OrderBy::DayOfWeek),
            "start_time" => Ok(OrderBy::StartTime),
            "end_time" => Ok(OrderBy::EndTime),
            "created_at" => Ok(OrderBy::CreatedAt),
            other => Err(SlotError::InvalidQuery(format!(
                "invalid order_by '{}'. Allowed: id, day_of_week, start_time, end_time, created_at",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(SlotError::InvalidQuery(
                "order must be 'asc' or 'desc'".to_string(),
            )),
        }
    }
}

/// Filters and ordering for [`list_rules`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleQuery {
    pub active_only: bool,
    pub day_of_week: Option<u8>,
    pub order_by: OrderBy,
    pub order: SortOrder,
}

impl Default for RuleQuery {
    fn default() -> Self {
        Self {
            active_only: true,
            day_of_week: None,
            order_by: OrderBy::Id,
            order: SortOrder::Asc,
        }
    }
}

/// List a barber's rules. Ties on the ordering column fall back to ascending id.
///
/// A `day_of_week` filter outside 0..=6 is rejected with
/// [`SlotError::InvalidRuleField`].
pub fn list_rules<S: RuleStore + ?Sized>(
    store: &S,
    barber_id: BarberId,
    query: &RuleQuery,
) -> Result<Vec<AvailabilityRule>> {
    require_barber(store, barber_id)?;
    if query.day_of_week.is_some_and(|day| day > 6) {
        return Err(SlotError::field(
            RuleField::DayOfWeek,
            "day_of_week must be between 0 and 6",
        ));
    }

    let mut rules: Vec<AvailabilityRule> = store
        .list_barber_rules(barber_id)?
        .into_iter()
        .filter(|r| !query.active_only || r.is_active())
        .filter(|r| query.day_of_week.is_none_or(|day| r.day_of_week == day))
        .collect();

    rules.sort_by(|a, b| {
        let primary = compare_by(query.order_by, a, b);
        let primary = match query.order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };
        primary.then(a.id.cmp(&b.id))
    });
    Ok(rules)
}

fn compare_by(column: OrderBy, a: &AvailabilityRule, b: &AvailabilityRule) -> Ordering {
    match column {
        OrderBy::Id => a.id.cmp(&b.id),
        OrderBy::DayOfWeek => a.day_of_week.cmp(&b.day_of_week),
        OrderBy::StartTime => a.start_time.cmp(&b.start_time),
        OrderBy::EndTime => a.end_time.cmp(&b.end_time),
        OrderBy::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

fn require_barber<S: RuleStore + ?Sized>(store: &S, barber_id: BarberId) -> Result<()> {
    match store.get_barber(barber_id)? {
        Some(_) => Ok(()),
        None => Err(SlotError::not_found(Entity::Barber, barber_id)),
    }
}
