//! Input-boundary limits and defaults for the rule write paths.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::model::RuleField;

/// Engine configuration.
///
/// The core only requires `slot_minutes > 0`. The tighter range here is applied
/// where callers submit rules (see [`crate::rules`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Smallest slot size a caller may submit, in minutes.
    pub min_slot_minutes: i64,
    /// Largest slot size a caller may submit, in minutes.
    pub max_slot_minutes: i64,
    /// Slot size used when a new rule omits it.
    pub default_slot_minutes: i64,
    /// Whether availability queries merge windows unless told otherwise.
    pub merge_windows: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_slot_minutes: 5,
            max_slot_minutes: 240,
            default_slot_minutes: 30,
            merge_windows: true,
        }
    }
}

impl EngineConfig {
    /// Reject slot sizes outside `[min_slot_minutes, max_slot_minutes]`.
    pub fn check_slot_minutes(&self, slot_minutes: i64) -> Result<()> {
        if slot_minutes < self.min_slot_minutes || slot_minutes > self.max_slot_minutes {
            return Err(SlotError::field(
                RuleField::SlotMinutes,
                format!(
                    "slot_minutes must be between {} and {}",
                    self.min_slot_minutes, self.max_slot_minutes
                ),
            ));
        }
        Ok(())
    }
}
