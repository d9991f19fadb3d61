//! Tests for slot generation inside a single window.

use chrono::{NaiveDate, NaiveTime};
use slot_engine::{generate_slots, SlotError, Window};

fn t(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

fn window(start: &str, end: &str, slot_minutes: i64) -> Window {
    Window {
        start_time: t(start),
        end_time: t(end),
        slot_minutes,
    }
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

#[test]
fn end_of_window_is_excluded() {
    let slots = generate_slots(&window("10:00", "11:00", 30), monday(), None).unwrap();
    assert_eq!(slots, vec!["10:00", "10:30"]);
}

#[test]
fn service_must_fit_inside_window() {
    // 10:30 + 45 min = 11:15 runs past closing.
    let slots = generate_slots(&window("10:00", "11:00", 30), monday(), Some(45)).unwrap();
    assert_eq!(slots, vec!["10:00"]);
}

#[test]
fn service_ending_exactly_at_close_is_kept() {
    let slots = generate_slots(&window("10:00", "11:00", 30), monday(), Some(30)).unwrap();
    assert_eq!(slots, vec!["10:00", "10:30"]);
}

#[test]
fn service_longer_than_window_yields_nothing() {
    let slots = generate_slots(&window("10:00", "11:00", 15), monday(), Some(90)).unwrap();
    assert!(slots.is_empty());
}

#[test]
fn step_that_does_not_divide_window_stops_before_end() {
    // 09:00, 09:45, 10:30 — 11:15 is past 11:00.
    let slots = generate_slots(&window("09:00", "11:00", 45), monday(), None).unwrap();
    assert_eq!(slots, vec!["09:00", "09:45", "10:30"]);
}

#[test]
fn labels_are_zero_padded() {
    let slots = generate_slots(&window("08:05", "08:20", 5), monday(), None).unwrap();
    assert_eq!(slots, vec!["08:05", "08:10", "08:15"]);
}

#[test]
fn late_window_does_not_wrap_past_midnight() {
    let slots = generate_slots(&window("23:00", "23:59", 30), monday(), None).unwrap();
    assert_eq!(slots, vec!["23:00", "23:30"]);
}

#[test]
fn inverted_window_yields_empty_list() {
    let slots = generate_slots(&window("12:00", "09:00", 30), monday(), None).unwrap();
    assert!(slots.is_empty());

    let slots = generate_slots(&window("12:00", "12:00", 30), monday(), None).unwrap();
    assert!(slots.is_empty());
}

#[test]
fn non_positive_slot_minutes_is_rejected() {
    let err = generate_slots(&window("10:00", "11:00", 0), monday(), None).unwrap_err();
    assert!(matches!(err, SlotError::InvalidParameter(_)));
    assert!(err.is_internal());

    let err = generate_slots(&window("10:00", "11:00", -15), monday(), None).unwrap_err();
    assert!(matches!(err, SlotError::InvalidParameter(_)));
}

#[test]
fn non_positive_service_duration_is_rejected() {
    let err = generate_slots(&window("10:00", "11:00", 30), monday(), Some(0)).unwrap_err();
    assert!(matches!(err, SlotError::InvalidParameter(_)));
}

#[test]
fn oversized_service_duration_yields_no_slots() {
    let slots =
        generate_slots(&window("09:00", "12:00", 30), monday(), Some(1_000_000_000_000)).unwrap();
    assert!(slots.is_empty());
}

#[test]
fn oversized_slot_step_offers_only_the_window_start() {
    let slots = generate_slots(&window("09:00", "12:00", 1_000_000_000_000), monday(), None).unwrap();
    assert_eq!(slots, vec!["09:00"]);
}
