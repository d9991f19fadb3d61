//! Rules, windows, and the records they reference.

use std::fmt;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timefmt;

pub type BarberId = u64;
pub type ServiceId = u64;
pub type RuleId = u64;

/// Soft-delete state shared by rules, barbers and services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

impl Status {
    pub fn is_active(self) -> bool {
        self == Status::Active
    }
}

impl From<bool> for Status {
    fn from(active: bool) -> Self {
        if active {
            Status::Active
        } else {
            Status::Inactive
        }
    }
}

/// A recurring weekly availability window for one barber.
///
/// `day_of_week` follows the ISO convention: 0 = Monday .. 6 = Sunday.
/// `[start_time, end_time)` is half-open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRule {
    pub id: RuleId,
    pub barber_id: BarberId,
    pub day_of_week: u8,
    #[serde(with = "timefmt::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "timefmt::hhmm")]
    pub end_time: NaiveTime,
    pub slot_minutes: i64,
    #[serde(default)]
    pub status: Status,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl AvailabilityRule {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// True when barber, day, range and slot size all match `proposed`.
    pub fn is_exact_match(&self, proposed: &ProposedRule) -> bool {
        self.barber_id == proposed.barber_id
            && self.day_of_week == proposed.day_of_week
            && self.start_time == proposed.start_time
            && self.end_time == proposed.end_time
            && self.slot_minutes == proposed.slot_minutes
    }

    pub fn window(&self) -> Window {
        Window {
            start_time: self.start_time,
            end_time: self.end_time,
            slot_minutes: self.slot_minutes,
        }
    }
}

/// The fields of a rule as submitted by a caller, before storage assigns an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedRule {
    pub barber_id: BarberId,
    pub day_of_week: u8,
    #[serde(with = "timefmt::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "timefmt::hhmm")]
    pub end_time: NaiveTime,
    pub slot_minutes: i64,
}

impl From<&AvailabilityRule> for ProposedRule {
    fn from(rule: &AvailabilityRule) -> Self {
        Self {
            barber_id: rule.barber_id,
            day_of_week: rule.day_of_week,
            start_time: rule.start_time,
            end_time: rule.end_time,
            slot_minutes: rule.slot_minutes,
        }
    }
}

/// A contiguous, single-granularity range used as the basis for slot generation.
///
/// Ephemeral: produced per availability request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    #[serde(with = "timefmt::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "timefmt::hhmm")]
    pub end_time: NaiveTime,
    pub slot_minutes: i64,
}

/// Rule fields that can fail structural validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleField {
    DayOfWeek,
    StartTime,
    EndTime,
    SlotMinutes,
}

impl fmt::Display for RuleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleField::DayOfWeek => "day_of_week",
            RuleField::StartTime => "start_time",
            RuleField::EndTime => "end_time",
            RuleField::SlotMinutes => "slot_minutes",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barber {
    pub id: BarberId,
    pub name: String,
    /// Informational. Deactivating a barber does not hide their availability;
    /// use [`crate::rules::deactivate_barber_rules`] to close their calendar.
    #[serde(default)]
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub duration_min: i64,
    #[serde(default)]
    pub status: Status,
}
