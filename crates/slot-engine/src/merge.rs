//! Consolidate a day's availability rules into slot-generation windows.
//!
//! Sorts by `(start_time, end_time)`, then folds each entry into the last
//! emitted window when the slot size matches and the entry starts at or before
//! that window's end. Touching windows of the same granularity therefore join
//! into one continuous window, even though the overlap predicate in
//! [`crate::interval`] treats touching ranges as disjoint.
//!
//! Windows of different slot size are never joined. When such windows overlap
//! in time they are all returned, and slots from each granularity may cover the
//! same clock time.

use crate::model::{AvailabilityRule, Window};

/// Merge one barber's active rules for one day.
///
/// Input is assumed pre-filtered (same barber, same day, active only).
pub fn merge_rules(rules: &[AvailabilityRule]) -> Vec<Window> {
    merge_windows(rules.iter().map(AvailabilityRule::window).collect())
}

/// Merge overlapping or touching windows that share a slot size.
///
/// Returns windows ordered by `start_time`. Merging the output again yields
/// the same list.
pub fn merge_windows(mut windows: Vec<Window>) -> Vec<Window> {
    // Sort is stable, so equal keys keep their input order.
    windows.sort_by_key(|w| (w.start_time, w.end_time));

    let mut merged: Vec<Window> = Vec::with_capacity(windows.len());
    for window in windows {
        if let Some(last) = merged.last_mut() {
            if last.slot_minutes == window.slot_minutes && window.start_time <= last.end_time {
                last.end_time = last.end_time.max(window.end_time);
                continue;
            }
        }
        merged.push(window);
    }

    merged
}

/// One window per rule, unmerged, ordered by `start_time`.
pub fn rule_windows(rules: &[AvailabilityRule]) -> Vec<Window> {
    let mut windows: Vec<Window> = rules.iter().map(AvailabilityRule::window).collect();
    windows.sort_by_key(|w| w.start_time);
    windows
}
