//! Storage collaborator interface and an in-memory implementation.
//!
//! The engine never owns persistence. Everything it needs from storage goes
//! through [`RuleStore`]; the write paths in [`crate::rules`] decide *what* to
//! mutate and call the mutation primitives here to do it.
//!
//! Validation is a read-then-decide sequence and is not atomic on its own.
//! Implementations must re-check the "no two active rules of one barber and day
//! overlap" invariant when they mutate, and report a violation as
//! [`SlotError::DuplicateRule`] or [`SlotError::OverlapConflict`].

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Entity, Result, SlotError};
use crate::interval::overlaps;
use crate::model::{
    AvailabilityRule, Barber, BarberId, ProposedRule, RuleId, Service, ServiceId, Status,
};

pub trait RuleStore {
    fn get_barber(&self, id: BarberId) -> Result<Option<Barber>>;

    fn get_service(&self, id: ServiceId) -> Result<Option<Service>>;

    fn get_rule(&self, id: RuleId) -> Result<Option<AvailabilityRule>>;

    /// Exact-duplicate lookup: same barber, day, start, end and slot size,
    /// in any status, skipping `exclude_id`.
    fn find_rule(
        &self,
        proposed: &ProposedRule,
        exclude_id: Option<RuleId>,
    ) -> Result<Option<AvailabilityRule>>;

    /// Active rules of one barber and day, ordered by `start_time` ascending.
    fn list_active_rules(
        &self,
        barber_id: BarberId,
        day_of_week: u8,
        exclude_id: Option<RuleId>,
    ) -> Result<Vec<AvailabilityRule>>;

    /// Every rule of a barber, in any status and any order.
    fn list_barber_rules(&self, barber_id: BarberId) -> Result<Vec<AvailabilityRule>>;

    /// Store a new active rule and return it with its assigned id.
    fn persist(&mut self, proposed: &ProposedRule) -> Result<AvailabilityRule>;

    /// Overwrite the mutable fields of an existing rule.
    fn update(&mut self, rule: &AvailabilityRule) -> Result<AvailabilityRule>;

    fn reactivate(&mut self, id: RuleId) -> Result<AvailabilityRule>;

    fn deactivate(&mut self, id: RuleId) -> Result<AvailabilityRule>;

    /// Deactivate every rule owned by a barber. Returns how many changed.
    fn deactivate_barber_rules(&mut self, barber_id: BarberId) -> Result<usize>;
}

/// A [`RuleStore`] backed by plain vectors, serializable as one JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStore {
    barbers: Vec<Barber>,
    services: Vec<Service>,
    rules: Vec<AvailabilityRule>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SlotError::Storage(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SlotError::Storage(e.to_string()))
    }

    pub fn with_barber(mut self, id: BarberId, name: &str) -> Self {
        self.barbers.push(Barber {
            id,
            name: name.to_string(),
            status: Status::Active,
        });
        self
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    /// Insert a rule verbatim, bypassing every check. Intended for seeding.
    pub fn with_rule(mut self, rule: AvailabilityRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn barbers(&self) -> &[Barber] {
        &self.barbers
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn rules(&self) -> &[AvailabilityRule] {
        &self.rules
    }

    fn next_rule_id(&self) -> RuleId {
        self.rules.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }

    fn rule_mut(&mut self, id: RuleId) -> Result<&mut AvailabilityRule> {
        self.rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| SlotError::not_found(Entity::Rule, id))
    }

    /// Storage-level safety net for the one-active-rule-per-range invariant.
    fn check_invariant(&self, candidate: &ProposedRule, exclude_id: Option<RuleId>) -> Result<()> {
        let mut others: Vec<&AvailabilityRule> = self
            .rules
            .iter()
            .filter(|r| {
                r.is_active()
                    && r.barber_id == candidate.barber_id
                    && r.day_of_week == candidate.day_of_week
                    && Some(r.id) != exclude_id
            })
            .collect();
        others.sort_by_key(|r| (r.start_time, r.id));

        if others.iter().any(|r| r.is_exact_match(candidate)) {
            return Err(SlotError::DuplicateRule);
        }
        if let Some(r) = others.iter().find(|r| {
            overlaps(candidate.start_time, candidate.end_time, r.start_time, r.end_time)
        }) {
            return Err(SlotError::OverlapConflict {
                rule_id: r.id,
                start: r.start_time,
                end: r.end_time,
            });
        }
        Ok(())
    }

    fn set_status(&mut self, id: RuleId, status: Status) -> Result<AvailabilityRule> {
        if status.is_active() {
            let candidate = ProposedRule::from(
                self.rules
                    .iter()
                    .find(|r| r.id == id)
                    .ok_or_else(|| SlotError::not_found(Entity::Rule, id))?,
            );
            self.check_invariant(&candidate, Some(id))?;
        }
        let rule = self.rule_mut(id)?;
        rule.status = status;
        Ok(rule.clone())
    }
}

impl RuleStore for MemoryStore {
    fn get_barber(&self, id: BarberId) -> Result<Option<Barber>> {
        Ok(self.barbers.iter().find(|b| b.id == id).cloned())
    }

    fn get_service(&self, id: ServiceId) -> Result<Option<Service>> {
        Ok(self.services.iter().find(|s| s.id == id).cloned())
    }

    fn get_rule(&self, id: RuleId) -> Result<Option<AvailabilityRule>> {
        Ok(self.rules.iter().find(|r| r.id == id).cloned())
    }

    fn find_rule(
        &self,
        proposed: &ProposedRule,
        exclude_id: Option<RuleId>,
    ) -> Result<Option<AvailabilityRule>> {
        let mut matches: Vec<&AvailabilityRule> = self
            .rules
            .iter()
            .filter(|r| r.is_exact_match(proposed) && Some(r.id) != exclude_id)
            .collect();
        // An active duplicate takes precedence over an inactive one.
        matches.sort_by_key(|r| (!r.is_active(), r.id));
        Ok(matches.first().map(|r| (*r).clone()))
    }

    fn list_active_rules(
        &self,
        barber_id: BarberId,
        day_of_week: u8,
        exclude_id: Option<RuleId>,
    ) -> Result<Vec<AvailabilityRule>> {
        let mut rules: Vec<AvailabilityRule> = self
            .rules
            .iter()
            .filter(|r| {
                r.is_active()
                    && r.barber_id == barber_id
                    && r.day_of_week == day_of_week
                    && Some(r.id) != exclude_id
            })
            .cloned()
            .collect();
        rules.sort_by_key(|r| (r.start_time, r.id));
        Ok(rules)
    }

    fn list_barber_rules(&self, barber_id: BarberId) -> Result<Vec<AvailabilityRule>> {
        Ok(self
            .rules
            .iter()
            .filter(|r| r.barber_id == barber_id)
            .cloned()
            .collect())
    }

    fn persist(&mut self, proposed: &ProposedRule) -> Result<AvailabilityRule> {
        self.check_invariant(proposed, None)?;
        let rule = AvailabilityRule {
            id: self.next_rule_id(),
            barber_id: proposed.barber_id,
            day_of_week: proposed.day_of_week,
            start_time: proposed.start_time,
            end_time: proposed.end_time,
            slot_minutes: proposed.slot_minutes,
            status: Status::Active,
            created_at: Utc::now(),
        };
        self.rules.push(rule.clone());
        Ok(rule)
    }

    fn update(&mut self, rule: &AvailabilityRule) -> Result<AvailabilityRule> {
        if rule.is_active() {
            self.check_invariant(&ProposedRule::from(rule), Some(rule.id))?;
        }
        let stored = self.rule_mut(rule.id)?;
        // id, barber_id and created_at are immutable.
        stored.day_of_week = rule.day_of_week;
        stored.start_time = rule.start_time;
        stored.end_time = rule.end_time;
        stored.slot_minutes = rule.slot_minutes;
        stored.status = rule.status;
        Ok(stored.clone())
    }

    fn reactivate(&mut self, id: RuleId) -> Result<AvailabilityRule> {
        self.set_status(id, Status::Active)
    }

    fn deactivate(&mut self, id: RuleId) -> Result<AvailabilityRule> {
        self.set_status(id, Status::Inactive)
    }

    fn deactivate_barber_rules(&mut self, barber_id: BarberId) -> Result<usize> {
        let mut changed = 0;
        for rule in self
            .rules
            .iter_mut()
            .filter(|r| r.barber_id == barber_id && r.is_active())
        {
            rule.status = Status::Inactive;
            changed += 1;
        }
        Ok(changed)
    }
}
