//! Tests for 24-hour / 12-hour conversion and calendar labels.

use chrono::{NaiveDate, NaiveTime};
use field_engine::error::FieldError;
use field_engine::timefmt::{canonical_time, parse_time_of_day};
use field_engine::{american_to_military, format_date_for_calendar, military_to_american};

#[test]
fn military_to_american_examples() {
    assert_eq!(military_to_american("20:00:00").unwrap(), "8:00 PM");
    assert_eq!(military_to_american("09:30:00").unwrap(), "9:30 AM");
    assert_eq!(military_to_american("00:15:00").unwrap(), "12:15 AM");
    assert_eq!(military_to_american("12:00:00").unwrap(), "12:00 PM");
}

#[test]
fn american_to_military_examples() {
    assert_eq!(american_to_military("8:00 PM").unwrap(), "20:00:00");
    assert_eq!(american_to_military("08:00 PM").unwrap(), "20:00:00");
    assert_eq!(american_to_military("12:00 AM").unwrap(), "00:00:00");
    assert_eq!(american_to_military("12:45 PM").unwrap(), "12:45:00");
    assert_eq!(american_to_military("7:05 am").unwrap(), "07:05:00");
}

#[test]
fn american_to_military_rejects_garbage() {
    for bad in ["20:00", "13:00 PM", "8 PM", "noon"] {
        assert!(
            matches!(american_to_military(bad), Err(FieldError::Validation(_))),
            "expected rejection of {:?}",
            bad
        );
    }
}

#[test]
fn military_to_american_rejects_garbage() {
    assert!(military_to_american("8:00 PM").is_err());
    assert!(military_to_american("24:00:00").is_err());
}

#[test]
fn parse_accepts_both_widths() {
    assert_eq!(
        parse_time_of_day("20:00").unwrap(),
        NaiveTime::from_hms_opt(20, 0, 0).unwrap()
    );
    assert_eq!(
        parse_time_of_day("8:05:09").unwrap(),
        NaiveTime::from_hms_opt(8, 5, 9).unwrap()
    );
}

#[test]
fn parse_rejects_malformed_components() {
    let bad_widths = ["08:005", "8:5", "123:00", "08::00"];
    let bad_chars = ["+8:00", "-1:00", "ab:cd"];
    for bad in bad_widths.into_iter().chain(bad_chars) {
        assert!(parse_time_of_day(bad).is_err(), "accepted {:?}", bad);
    }
}

#[test]
fn canonical_time_pads_seconds() {
    assert_eq!(canonical_time("9:00").unwrap(), "09:00:00");
    assert_eq!(canonical_time("21:15:30").unwrap(), "21:15:30");
}

#[test]
fn calendar_label_drops_leading_zero() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
    assert_eq!(format_date_for_calendar(date), "Jan 3, 2024");
    let date = NaiveDate::from_ymd_opt(2025, 11, 21).unwrap();
    assert_eq!(format_date_for_calendar(date), "Nov 21, 2025");
}
