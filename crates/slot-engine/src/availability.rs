//! Bookable availability for one barber on one calendar date.
//!
//! Resolves the ISO weekday of the date, loads the barber's active rules for
//! that weekday, turns them into windows (merged or raw), generates slots per
//! window, and flattens everything into one sorted, de-duplicated list.
//!
//! This is a read-only path: nothing is written to the store.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{Entity, Result, SlotError};
use crate::merge::{merge_rules, rule_windows};
use crate::model::{BarberId, ServiceId, Window};
use crate::slots::generate_slots;
use crate::store::RuleStore;
use crate::timefmt;

/// Slots produced by a single window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotWindow {
    #[serde(with = "timefmt::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "timefmt::hhmm")]
    pub end_time: NaiveTime,
    pub slot_minutes: i64,
    /// Start times inside this window, ascending.
    pub slots: Vec<String>,
    /// Reserved for booking conflicts. Always empty for now.
    pub unavailable_slots: Vec<String>,
}

/// Availability of one barber on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResult {
    pub date: NaiveDate,
    pub barber_id: BarberId,
    /// 0 = Monday .. 6 = Sunday.
    pub day_of_week: u8,
    /// True when the barber has no active rules for this weekday.
    pub is_closed: bool,
    pub service_id: Option<ServiceId>,
    pub duration_min: Option<i64>,
    pub items: Vec<SlotWindow>,
    /// Union of every window's slots, de-duplicated and sorted.
    pub slots: Vec<String>,
}

/// Parse a `YYYY-MM-DD` date. Surrounding whitespace is rejected.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| SlotError::InvalidDate(date.to_string()))
}

/// ISO weekday index: 0 = Monday .. 6 = Sunday.
pub fn iso_weekday(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

/// Compute bookable slots for `barber_id` on `date`.
///
/// When `service_id` is given, only starts where the full service fits inside
/// a window are kept. With `merge_windows` false each active rule becomes its
/// own window, so overlapping granularities stay visible per rule.
///
/// The barber only has to exist. An inactive barber still reports the slots of
/// their active rules.
///
/// # Errors
/// - [`SlotError::NotFound`] for an unknown barber or service.
/// - [`SlotError::InvalidDate`] when `date` is not `YYYY-MM-DD`.
/// - [`SlotError::InactiveService`] / [`SlotError::InvalidService`] when the
///   service cannot be booked.
pub fn compute_availability<S: RuleStore + ?Sized>(
    store: &S,
    barber_id: BarberId,
    date: &str,
    service_id: Option<ServiceId>,
    merge_windows: bool,
) -> Result<AvailabilityResult> {
    if store.get_barber(barber_id)?.is_none() {
        return Err(SlotError::not_found(Entity::Barber, barber_id));
    }

    let date = parse_date(date)?;
    let day_of_week = iso_weekday(date);
    let duration_min = match service_id {
        Some(id) => Some(resolve_service_duration(store, id)?),
        None => None,
    };

    let rules = store.list_active_rules(barber_id, day_of_week, None)?;
    debug!(barber_id, %date, day_of_week, rules = rules.len(), "computing availability");

    if rules.is_empty() {
        return Ok(AvailabilityResult {
            date,
            barber_id,
            day_of_week,
            is_closed: true,
            service_id,
            duration_min,
            items: vec![],
            slots: vec![],
        });
    }

    let windows = if merge_windows {
        merge_rules(&rules)
    } else {
        rule_windows(&rules)
    };

    let items = windows
        .iter()
        .map(|w| slot_window(w, date, duration_min))
        .collect::<Result<Vec<_>>>()
        .inspect_err(|e| {
            if e.is_internal() {
                error!(barber_id, %date, error = %e, "slot generation rejected its parameters");
            }
        })?;

    let slots: Vec<String> = items
        .iter()
        .flat_map(|item| item.slots.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    Ok(AvailabilityResult {
        date,
        barber_id,
        day_of_week,
        is_closed: false,
        service_id,
        duration_min,
        items,
        slots,
    })
}

fn resolve_service_duration<S: RuleStore + ?Sized>(store: &S, id: ServiceId) -> Result<i64> {
    let service = store
        .get_service(id)?
        .ok_or_else(|| SlotError::not_found(Entity::Service, id))?;
    if !service.status.is_active() {
        return Err(SlotError::InactiveService(id));
    }
    if service.duration_min <= 0 {
        return Err(SlotError::InvalidService {
            id,
            duration_min: service.duration_min,
        });
    }
    Ok(service.duration_min)
}

fn slot_window(window: &Window, date: NaiveDate, duration_min: Option<i64>) -> Result<SlotWindow> {
    Ok(SlotWindow {
        start_time: window.start_time,
        end_time: window.end_time,
        slot_minutes: window.slot_minutes,
        slots: generate_slots(window, date, duration_min)?,
        unavailable_slots: Vec::new(),
    })
}
