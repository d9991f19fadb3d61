//! # slot-engine
//!
//! Availability computation for a multi-barber booking service.
//!
//! Barbers declare recurring weekly availability rules ("Mondays 09:00-12:00,
//! 30-minute slots"). The engine keeps those rules consistent on write and turns
//! them into concrete, bookable start times for a given calendar date and,
//! optionally, a service of known duration.
//!
//! ## Modules
//!
//! - [`interval`] — half-open time range overlap predicate
//! - [`validator`] — exact-duplicate and overlap checks for proposed rules
//! - [`merge`] — consolidate a day's rules into single-granularity windows
//! - [`slots`] — enumerate `HH:MM` start times inside a window
//! - [`availability`] — barber + date (+ service) → windows and flattened slots
//! - [`rules`] — create / update / delete / list write paths over a store
//! - [`store`] — storage collaborator trait and an in-memory implementation
//! - [`model`] — rules, windows, barbers, services
//! - [`config`] — input-boundary limits and defaults
//! - [`timefmt`] — `HH:MM` formatting and parsing
//! - [`error`] — Error types

pub mod availability;
pub mod config;
pub mod error;
pub mod interval;
pub mod merge;
pub mod model;
pub mod rules;
pub mod slots;
pub mod store;
pub mod timefmt;
pub mod validator;

pub use availability::{compute_availability, AvailabilityResult, SlotWindow};
pub use config::EngineConfig;
pub use error::{Entity, SlotError};
pub use interval::overlaps;
pub use merge::{merge_rules, merge_windows};
pub use model::{AvailabilityRule, Barber, ProposedRule, RuleField, Service, Status, Window};
pub use slots::generate_slots;
pub use store::{MemoryStore, RuleStore};
pub use validator::{validate_and_prepare_rule, RuleDecision};
