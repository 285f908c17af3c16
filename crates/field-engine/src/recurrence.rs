//! Target date calculation for recurring weekly reservations.
//!
//! Booking windows open a fixed number of days ahead, so the reservation a run
//! goes after is not necessarily the very next occurrence of the desired
//! weekday. `occurrences_ahead` selects which future occurrence to target:
//! 1 is the next one, 2 the one a week after that, and so on. The result is
//! always strictly in the future relative to `now` and always falls on the
//! requested weekday.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};
use crate::timefmt::parse_time_of_day;
use crate::weekday::Weekday;

pub const DEFAULT_OCCURRENCES_AHEAD: u32 = 2;

/// A weekly reservation target: which weekday, what time, how far ahead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceSpec {
    pub weekday: Weekday,
    /// `HH:MM` or `HH:MM:SS`; seconds are validated and then ignored.
    pub time_of_day: String,
    pub occurrences_ahead: u32,
}

impl RecurrenceSpec {
    /// # Errors
    /// Returns `FieldError::Validation` for a malformed time or a zero count.
    pub fn new(weekday: Weekday, time_of_day: &str, occurrences_ahead: u32) -> Result<Self> {
        parse_time_of_day(time_of_day)?;
        check_occurrences(occurrences_ahead)?;
        Ok(RecurrenceSpec {
            weekday,
            time_of_day: time_of_day.to_string(),
            occurrences_ahead,
        })
    }

    pub fn next_date(&self, now: NaiveDateTime) -> Result<NaiveDate> {
        next_occurrence(self.weekday, &self.time_of_day, self.occurrences_ahead, now)
    }

    /// Target date with "now" taken as the wall-clock time in `tz`.
    pub fn request_date_in(&self, tz: Tz, now: DateTime<Utc>) -> Result<NaiveDate> {
        self.next_date(now.with_timezone(&tz).naive_local())
    }
}

/// Date of the `occurrences_ahead`-th future occurrence of `weekday` at
/// `time_of_day`, counted from `now`.
///
/// # Errors
/// Returns `FieldError::Validation` if `time_of_day` is malformed, if
/// `occurrences_ahead` is zero, or if the target falls outside the
/// representable date range.
pub fn next_occurrence(
    weekday: Weekday,
    time_of_day: &str,
    occurrences_ahead: u32,
    now: NaiveDateTime,
) -> Result<NaiveDate> {
    check_occurrences(occurrences_ahead)?;
    let parsed = parse_time_of_day(time_of_day)?;
    let target_time = NaiveTime::from_hms_opt(parsed.hour(), parsed.minute(), 0)
        .ok_or_else(|| FieldError::Validation(format!("invalid time of day: '{}'", time_of_day)))?;

    // Today never counts as the next occurrence, even before the target time.
    let current = i64::from(now.weekday().num_days_from_monday());
    let mut days_ahead = (i64::from(weekday.index()) - current).rem_euclid(7) as u64;
    if days_ahead == 0 {
        days_ahead = 7;
    }
    days_ahead += 7 * u64::from(occurrences_ahead - 1);

    let out_of_range = || {
        FieldError::Validation(format!(
            "{} occurrences ahead of {} is out of range",
            occurrences_ahead,
            now.date()
        ))
    };

    let mut candidate = now
        .date()
        .checked_add_days(Days::new(days_ahead))
        .ok_or_else(out_of_range)?
        .and_time(target_time);

    if candidate <= now {
        candidate = candidate
            .checked_add_days(Days::new(7))
            .ok_or_else(out_of_range)?;
    }

    Ok(candidate.date())
}

/// [`next_occurrence`] formatted as `YYYY-MM-DD`.
pub fn next_occurrence_date(
    weekday: Weekday,
    time_of_day: &str,
    occurrences_ahead: u32,
    now: NaiveDateTime,
) -> Result<String> {
    next_occurrence(weekday, time_of_day, occurrences_ahead, now)
        .map(|date| date.format("%Y-%m-%d").to_string())
}

fn check_occurrences(occurrences_ahead: u32) -> Result<()> {
    if occurrences_ahead == 0 {
        return Err(FieldError::Validation(
            "occurrences_ahead must be at least 1".to_string(),
        ));
    }
    Ok(())
}
