//! Tests for the recurring reservation date calculation.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use field_engine::error::FieldError;
use field_engine::{next_occurrence, next_occurrence_date, RecurrenceSpec, Weekday};

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

// ── Next occurrence ─────────────────────────────────────────────────────────

#[test]
fn monday_morning_to_wednesday_evening() {
    // 2024-01-01 is a Monday.
    let now = at("2024-01-01 10:00");
    let date = next_occurrence_date(Weekday::Wednesday, "20:00", 1, now).unwrap();
    assert_eq!(date, "2024-01-03");
}

#[test]
fn two_occurrences_ahead_adds_a_week() {
    let now = at("2024-01-01 10:00");
    let date = next_occurrence_date(Weekday::Wednesday, "20:00", 2, now).unwrap();
    assert_eq!(date, "2024-01-10");
}

#[test]
fn same_weekday_before_target_time_still_moves_a_week() {
    // Wednesday morning, target Wednesday evening: today never counts.
    let now = at("2024-01-03 08:00");
    let date = next_occurrence_date(Weekday::Wednesday, "20:00", 1, now).unwrap();
    assert_eq!(date, "2024-01-10");
}

#[test]
fn same_weekday_after_target_time_moves_a_week() {
    let now = at("2024-01-03 21:30");
    let date = next_occurrence_date(Weekday::Wednesday, "20:00", 1, now).unwrap();
    assert_eq!(date, "2024-01-10");
}

#[test]
fn earlier_weekday_wraps_into_next_week() {
    // Friday → next Monday.
    let date = next_occurrence_date(Weekday::Monday, "09:00", 1, at("2024-01-05 12:00")).unwrap();
    assert_eq!(date, "2024-01-08");
}

#[test]
fn crosses_month_and_year_boundaries() {
    let date = next_occurrence_date(Weekday::Tuesday, "18:30", 1, at("2024-12-30 10:00")).unwrap();
    assert_eq!(date, "2024-12-31");
    let date = next_occurrence_date(Weekday::Thursday, "18:30", 1, at("2024-12-30 10:00")).unwrap();
    assert_eq!(date, "2025-01-02");
}

#[test]
fn leap_day_is_reachable() {
    // 2024-02-29 is a Thursday.
    let date = next_occurrence(Weekday::Thursday, "07:00", 1, at("2024-02-26 07:00")).unwrap();
    assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
}

#[test]
fn seconds_are_accepted_and_ignored() {
    let with = next_occurrence(Weekday::Friday, "20:00:45", 1, at("2024-01-01 10:00")).unwrap();
    let without = next_occurrence(Weekday::Friday, "20:00", 1, at("2024-01-01 10:00")).unwrap();
    assert_eq!(with, without);
}

#[test]
fn result_falls_on_the_requested_weekday() {
    for day in Weekday::ALL {
        let date = next_occurrence(day, "12:00", 3, at("2024-05-15 12:00")).unwrap();
        assert_eq!(date.weekday(), day.to_chrono());
    }
}

// ── Validation ──────────────────────────────────────────────────────────────

#[test]
fn zero_occurrences_is_rejected() {
    let err = next_occurrence(Weekday::Monday, "20:00", 0, at("2024-01-01 10:00")).unwrap_err();
    assert!(matches!(err, FieldError::Validation(_)));
}

#[test]
fn non_numeric_time_is_rejected() {
    let bad_times = [
        "eight:00",
        "20:xx",
        "",
        "20",
        "20:00:00:00",
        "25:00",
        "20:60",
    ];
    for bad in bad_times {
        let err = next_occurrence(Weekday::Monday, bad, 1, at("2024-01-01 10:00")).unwrap_err();
        assert!(
            matches!(err, FieldError::Validation(_)),
            "expected validation error for {:?}",
            bad
        );
    }
}

#[test]
fn absurd_occurrence_count_is_out_of_range_not_a_panic() {
    let now = at("2024-01-01 10:00");
    let err = next_occurrence(Weekday::Monday, "20:00", u32::MAX, now).unwrap_err();
    assert!(matches!(err, FieldError::Validation(_)));
}

// ── RecurrenceSpec ──────────────────────────────────────────────────────────

#[test]
fn spec_constructor_validates() {
    assert!(RecurrenceSpec::new(Weekday::Monday, "20:00", 1).is_ok());
    assert!(RecurrenceSpec::new(Weekday::Monday, "8 PM", 1).is_err());
    assert!(RecurrenceSpec::new(Weekday::Monday, "20:00", 0).is_err());
}

#[test]
fn request_date_uses_local_wall_clock() {
    // 2024-01-03 05:00 UTC is still Tuesday 2024-01-02 21:00 in Los Angeles.
    let spec = RecurrenceSpec::new(Weekday::Wednesday, "20:00", 1).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 1, 3, 5, 0, 0).unwrap();

    let la = spec
        .request_date_in(chrono_tz::America::Los_Angeles, now)
        .unwrap();
    assert_eq!(la, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());

    // In UTC it is already Wednesday, so the target moves a week out.
    let utc = spec.request_date_in(chrono_tz::UTC, now).unwrap();
    assert_eq!(utc, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
}
