//! Enumerate bookable start times inside a window.

use chrono::{Duration, NaiveDate};

use crate::error::{Result, SlotError};
use crate::model::Window;

/// Generate `HH:MM` start times for `window` on `date`.
///
/// Steps through the half-open interval `[start, end)` every
/// `window.slot_minutes`. When `service_duration_minutes` is given, a start is
/// kept only if the whole service fits: `start + duration <= end`.
///
/// Output is ascending and not de-duplicated. An empty or inverted window
/// yields an empty list. Sizes larger than the window simply produce fewer
/// (or no) slots.
///
/// # Errors
/// Returns [`SlotError::InvalidParameter`] when the slot size or the service
/// duration is not positive. Upstream validation should make this unreachable.
pub fn generate_slots(
    window: &Window,
    date: NaiveDate,
    service_duration_minutes: Option<i64>,
) -> Result<Vec<String>> {
    let step = positive_minutes(window.slot_minutes, "slot_minutes")?;
    let duration = service_duration_minutes
        .map(|d| positive_minutes(d, "service_duration_minutes"))
        .transpose()?;

    let start = date.and_time(window.start_time);
    let end = date.and_time(window.end_time);
    if start >= end {
        return Ok(Vec::new());
    }

    let mut slots = Vec::new();
    let mut cur = start;
    while cur < end {
        // An end past the representable range cannot fit either.
        let fits = match duration {
            Some(d) => cur.checked_add_signed(d).is_some_and(|svc_end| svc_end <= end),
            None => true,
        };
        if fits {
            slots.push(cur.format("%H:%M").to_string());
        }
        match cur.checked_add_signed(step) {
            Some(next) => cur = next,
            None => break,
        }
    }

    Ok(slots)
}

fn positive_minutes(minutes: i64, name: &str) -> Result<Duration> {
    if minutes <= 0 {
        return Err(SlotError::InvalidParameter(format!(
            "{} must be > 0 (got {})",
            name, minutes
        )));
    }
    Duration::try_minutes(minutes)
        .ok_or_else(|| SlotError::InvalidParameter(format!("{} out of range ({})", name, minutes)))
}
