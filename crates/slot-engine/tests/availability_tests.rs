//! Tests for per-date availability computation.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use slot_engine::availability::{iso_weekday, parse_date};
use slot_engine::{
    compute_availability, AvailabilityRule, Entity, MemoryStore, Service, SlotError, Status,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn t(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

fn rule(id: u64, day: u8, start: &str, end: &str, slot_minutes: i64) -> AvailabilityRule {
    AvailabilityRule {
        id,
        barber_id: 1,
        day_of_week: day,
        start_time: t(start),
        end_time: t(end),
        slot_minutes,
        status: Status::Active,
        created_at: Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap(),
    }
}

fn service(id: u64, duration_min: i64, status: Status) -> Service {
    Service {
        id,
        name: format!("service-{}", id),
        duration_min,
        status,
    }
}

fn shop(rules: Vec<AvailabilityRule>) -> MemoryStore {
    rules.into_iter().fold(
        MemoryStore::new()
            .with_barber(1, "Ana")
            .with_service(service(10, 60, Status::Active))
            .with_service(service(11, 30, Status::Inactive))
            .with_service(service(12, 0, Status::Active)),
        |s, r| s.with_rule(r),
    )
}

/// 2026-03-16 is a Monday.
const MONDAY: &str = "2026-03-16";

// ── End-to-end ──────────────────────────────────────────────────────────────

#[test]
fn lunch_gap_is_preserved_and_service_must_fit() {
    let store = shop(vec![rule(1, 0, "09:00", "12:00", 30), rule(2, 0, "13:00", "17:00", 30)]);

    let result = compute_availability(&store, 1, MONDAY, Some(10), true).unwrap();

    assert_eq!(result.date, NaiveDate::from_ymd_opt(2026, 3, 16).unwrap());
    assert_eq!(result.day_of_week, 0);
    assert!(!result.is_closed);
    assert_eq!(result.service_id, Some(10));
    assert_eq!(result.duration_min, Some(60));

    assert_eq!(result.items.len(), 2);
    assert_eq!(result.items[0].start_time, t("09:00"));
    assert_eq!(result.items[0].end_time, t("12:00"));
    assert_eq!(result.items[1].start_time, t("13:00"));
    assert_eq!(result.items[1].end_time, t("17:00"));

    assert_eq!(
        result.slots,
        vec![
            "09:00", "09:30", "10:00", "10:30", "11:00", // 11:30 + 60 crosses 12:00
            "13:00", "13:30", "14:00", "14:30", "15:00", "15:30", "16:00", // 16:30 + 60 crosses 17:00
        ]
    );
}

#[test]
fn without_service_every_step_is_offered() {
    let store = shop(vec![rule(1, 0, "09:00", "11:00", 30)]);

    let result = compute_availability(&store, 1, MONDAY, None, true).unwrap();

    assert_eq!(result.duration_min, None);
    assert_eq!(result.slots, vec!["09:00", "09:30", "10:00", "10:30"]);
}

#[test]
fn closed_day_short_circuits() {
    let store = shop(vec![rule(1, 0, "09:00", "12:00", 30)]);

    // 2026-03-18 is a Wednesday (day_of_week 2).
    let result = compute_availability(&store, 1, "2026-03-18", Some(10), true).unwrap();

    assert_eq!(result.day_of_week, 2);
    assert!(result.is_closed);
    assert!(result.items.is_empty());
    assert!(result.slots.is_empty());
    assert_eq!(result.duration_min, Some(60), "service is still echoed");
}

#[test]
fn inactive_rules_do_not_open_the_day() {
    let mut inactive = rule(1, 0, "09:00", "12:00", 30);
    inactive.status = Status::Inactive;
    let store = shop(vec![inactive]);

    let result = compute_availability(&store, 1, MONDAY, None, true).unwrap();

    assert!(result.is_closed);
}

#[test]
fn inactive_barber_still_reports_active_rules() {
    let store = MemoryStore::from_json(
        r#"{
            "barbers": [{"id": 1, "name": "Ana", "status": "inactive"}],
            "rules": [{"id": 1, "barber_id": 1, "day_of_week": 0,
                       "start_time": "09:00", "end_time": "10:00", "slot_minutes": 30}]
        }"#,
    )
    .unwrap();

    let result = compute_availability(&store, 1, MONDAY, None, true).unwrap();

    assert!(!result.is_closed);
    assert_eq!(result.slots, vec!["09:00", "09:30"]);
}

// ── Merge modes ─────────────────────────────────────────────────────────────

#[test]
fn touching_rules_merge_into_one_item() {
    let store = shop(vec![rule(1, 0, "09:00", "10:00", 30), rule(2, 0, "10:00", "11:00", 30)]);

    let merged = compute_availability(&store, 1, MONDAY, Some(10), true).unwrap();
    let raw = compute_availability(&store, 1, MONDAY, Some(10), false).unwrap();

    // A 60-minute service at 09:30 only fits once the windows are joined.
    assert_eq!(merged.items.len(), 1);
    assert_eq!(merged.slots, vec!["09:00", "09:30", "10:00"]);

    assert_eq!(raw.items.len(), 2);
    assert_eq!(raw.slots, vec!["09:00", "10:00"]);
}

#[test]
fn unmerged_overlapping_windows_flatten_without_duplicates() {
    // Overlapping active rules cannot be created through validation; seed them directly.
    let store = shop(vec![rule(1, 0, "10:00", "11:00", 30), rule(2, 0, "10:30", "11:30", 30)]);

    let result = compute_availability(&store, 1, MONDAY, None, false).unwrap();

    assert_eq!(result.items[0].slots, vec!["10:00", "10:30"]);
    assert_eq!(result.items[1].slots, vec!["10:30", "11:00"]);
    assert_eq!(result.slots, vec!["10:00", "10:30", "11:00"]);
}

#[test]
fn mixed_granularities_are_not_reconciled() {
    let store = shop(vec![rule(1, 0, "09:00", "10:00", 30), rule(2, 0, "09:30", "10:00", 15)]);

    let result = compute_availability(&store, 1, MONDAY, None, true).unwrap();

    assert_eq!(result.items.len(), 2);
    assert_eq!(result.items[0].slot_minutes, 30);
    assert_eq!(result.items[1].slot_minutes, 15);
    assert_eq!(result.slots, vec!["09:00", "09:30", "09:45"]);
}

#[test]
fn unavailable_slots_is_present_and_empty() {
    let store = shop(vec![rule(1, 0, "09:00", "10:00", 30)]);

    let result = compute_availability(&store, 1, MONDAY, None, true).unwrap();
    assert!(result.items[0].unavailable_slots.is_empty());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["items"][0]["unavailable_slots"], serde_json::json!([]));
    assert_eq!(json["items"][0]["start_time"], "09:00");
    assert_eq!(json["date"], "2026-03-16");
}

// ── Errors ──────────────────────────────────────────────────────────────────

#[test]
fn unknown_barber_is_not_found() {
    let err = compute_availability(&shop(vec![]), 9, MONDAY, None, true).unwrap_err();
    assert_eq!(
        err,
        SlotError::NotFound {
            entity: Entity::Barber,
            id: 9
        }
    );
}

#[test]
fn malformed_date_is_rejected() {
    let store = shop(vec![]);
    for bad in ["16/03/2026", "2026-02-30", "tomorrow", "", " 2026-03-16 "] {
        let err = compute_availability(&store, 1, bad, None, true).unwrap_err();
        assert!(matches!(err, SlotError::InvalidDate(_)), "{} should be invalid", bad);
    }
}

#[test]
fn service_preconditions_are_enforced() {
    let store = shop(vec![rule(1, 0, "09:00", "12:00", 30)]);

    assert_eq!(
        compute_availability(&store, 1, MONDAY, Some(99), true).unwrap_err(),
        SlotError::NotFound {
            entity: Entity::Service,
            id: 99
        }
    );
    assert_eq!(
        compute_availability(&store, 1, MONDAY, Some(11), true).unwrap_err(),
        SlotError::InactiveService(11)
    );
    assert_eq!(
        compute_availability(&store, 1, MONDAY, Some(12), true).unwrap_err(),
        SlotError::InvalidService {
            id: 12,
            duration_min: 0
        }
    );
}

#[test]
fn seeded_zero_slot_rule_surfaces_as_internal_error() {
    let store = shop(vec![rule(1, 0, "09:00", "12:00", 0)]);

    let err = compute_availability(&store, 1, MONDAY, None, true).unwrap_err();

    assert!(err.is_internal());
}

#[test]
fn oversized_service_leaves_windows_empty() {
    let store = shop(vec![rule(1, 0, "09:00", "12:00", 30)])
        .with_service(service(13, 1_000_000_000_000, Status::Active));

    let result = compute_availability(&store, 1, MONDAY, Some(13), true).unwrap();

    assert!(!result.is_closed);
    assert_eq!(result.items.len(), 1);
    assert!(result.items[0].slots.is_empty());
    assert!(result.slots.is_empty());
}

#[test]
fn seeded_oversized_slot_rule_offers_its_start_only() {
    let store = shop(vec![rule(1, 0, "09:00", "12:00", 1_000_000_000_000)]);

    let result = compute_availability(&store, 1, MONDAY, None, true).unwrap();

    assert_eq!(result.slots, vec!["09:00"]);
}

// ── Date helpers ────────────────────────────────────────────────────────────

#[test]
fn weekday_uses_iso_monday_zero() {
    assert_eq!(iso_weekday(parse_date("2026-03-16").unwrap()), 0);
    assert_eq!(iso_weekday(parse_date("2026-03-17").unwrap()), 1);
    assert_eq!(iso_weekday(parse_date("2026-03-22").unwrap()), 6);
}
