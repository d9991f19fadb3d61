//! Overlap predicate for half-open time-of-day ranges.
//!
//! Touching ranges (one ends exactly when the other starts) do NOT overlap.

use chrono::NaiveTime;

/// True iff `[start_a, end_a)` and `[start_b, end_b)` share at least one instant.
///
/// Both ranges are assumed well-formed (`start < end`); this is not re-checked.
pub fn overlaps(start_a: NaiveTime, end_a: NaiveTime, start_b: NaiveTime, end_b: NaiveTime) -> bool {
    start_a < end_b && start_b < end_a
}
