//! Time-of-day parsing and display formatting.
//!
//! The availability API labels slots in 24-hour form (`20:00:00`) while the
//! booking page labels its grid cells in 12-hour form (`8:00 PM`). Every time
//! the resolver hands back has to survive the trip between the two.

use chrono::{NaiveDate, NaiveTime};

use crate::error::{FieldError, Result};

/// Parse `HH:MM` or `HH:MM:SS` (hour may be a single digit).
///
/// # Errors
/// Returns `FieldError::Validation` for non-numeric components, wrong component
/// counts, or out-of-range values.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime> {
    let invalid = || FieldError::Validation(format!("invalid time of day: '{}'", value));

    let parts: Vec<&str> = value.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(invalid());
    }

    let mut fields = [0u32; 3];
    for (i, part) in parts.iter().enumerate() {
        let width_ok = if i == 0 {
            (1..=2).contains(&part.len())
        } else {
            part.len() == 2
        };
        if !width_ok || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        fields[i] = part.parse().map_err(|_| invalid())?;
    }

    NaiveTime::from_hms_opt(fields[0], fields[1], fields[2]).ok_or_else(invalid)
}

/// Normalise a time of day to the canonical `HH:MM:SS` slot label.
pub fn canonical_time(value: &str) -> Result<String> {
    Ok(parse_time_of_day(value)?.format("%H:%M:%S").to_string())
}

/// Convert `HH:MM:SS` to `H:MM AM/PM`, e.g. `20:00:00` → `8:00 PM`.
pub fn military_to_american(military: &str) -> Result<String> {
    let time = parse_time_of_day(military)?;
    Ok(time.format("%-I:%M %p").to_string())
}

/// Convert `H:MM AM/PM` to `HH:MM:SS`, e.g. `8:00 PM` → `20:00:00`.
pub fn american_to_military(american: &str) -> Result<String> {
    let invalid = |e: chrono::ParseError| {
        FieldError::Validation(format!("invalid 12-hour time '{}': {}", american, e))
    };
    let time = NaiveTime::parse_from_str(american.trim(), "%I:%M %p").map_err(invalid)?;
    Ok(time.format("%H:%M:%S").to_string())
}

/// Calendar widget label for a date: `Jan 3, 2024` (no leading zero on the day).
pub fn format_date_for_calendar(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

