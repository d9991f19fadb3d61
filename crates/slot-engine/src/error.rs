//! Error types for slot-engine operations.

use std::fmt;

use chrono::NaiveTime;
use thiserror::Error;

use crate::model::{RuleField, RuleId};

/// The kind of record a [`SlotError::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Barber,
    Service,
    Rule,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Barber => "Barber",
            Entity::Service => "Service",
            Entity::Rule => "Availability rule",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    /// A structural rule field violates its invariant.
    #[error("Invalid {field}: {message}")]
    InvalidRuleField { field: RuleField, message: String },

    /// An active rule with the same barber, day, range and slot size exists.
    #[error("Availability rule already exists")]
    DuplicateRule,

    /// An exact duplicate exists but is inactive. Only raised on update.
    #[error("Exact duplicate exists but is inactive (rule_id={rule_id}). Restore it instead of updating into it.")]
    DuplicateInactiveExists { rule_id: RuleId },

    /// The proposed range intersects another active rule of the same barber and day.
    #[error(
        "Availability rule overlaps with rule_id={rule_id} ({}-{})",
        .start.format("%H:%M"),
        .end.format("%H:%M")
    )]
    OverlapConflict {
        rule_id: RuleId,
        start: NaiveTime,
        end: NaiveTime,
    },

    #[error("{entity} not found (id={id})")]
    NotFound { entity: Entity, id: u64 },

    #[error("Service is inactive (id={0})")]
    InactiveService(u64),

    #[error("Service duration_min must be > 0 (id={id}, duration_min={duration_min})")]
    InvalidService { id: u64, duration_min: i64 },

    #[error("Invalid date format '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),

    /// A listing option (ordering column or direction) is not recognised.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Defensive internal check. Reaching it means a caller skipped validation.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Opaque failure reported by a storage collaborator.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl SlotError {
    pub(crate) fn field(field: RuleField, message: impl Into<String>) -> Self {
        SlotError::InvalidRuleField {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn not_found(entity: Entity, id: u64) -> Self {
        SlotError::NotFound { entity, id }
    }

    /// True for errors that signal a programming error rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, SlotError::InvalidParameter(_) | SlotError::Storage(_))
    }
}

pub type Result<T> = std::result::Result<T, SlotError>;
