//! `HH:MM` time-of-day formatting and parsing.
//!
//! Slots, windows and rules all render as zero-padded `HH:MM`, which makes
//! lexicographic order equal to chronological order. Parsing also accepts
//! `HH:MM:SS` so rules exported with seconds load unchanged.

use chrono::NaiveTime;

/// Format a time of day as zero-padded `HH:MM`.
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// Serde adapter for `NaiveTime` fields stored as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid time '{}', expected HH:MM", raw)))
    }
}
