//! Booking configuration loaded from the environment.
//!
//! Built by each command that reads a setting, after `.env` is loaded. Every
//! variable has a default, so an empty environment yields a usable
//! configuration; values that are present but malformed are errors naming the
//! offending variable.
//!
//! | Variable | Default |
//! |---|---|
//! | `DESIRED_WEEKDAY` | `WEDNESDAY` |
//! | `DESIRED_TIME_MILITARY` | `20:00:00` |
//! | `ALT_DESIRED_TIMES_MILITARY` | `19:00:00` (comma separated) |
//! | `OCCURRENCES_AHEAD` | `2` |
//! | `DESIRED_FIELD_STARTS_WITH` | unset, every field eligible |
//! | `FACILITY_GROUP_ID` | `28` |
//! | `GROUP_QUANTITY` | `15` |
//! | `RESERVATION_NAME` | `Field Reservation` |
//! | `SPORT` | `Soccer` |
//! | `MAX_RETRIES` / `RETRY_DELAY` | `3` / `5` seconds |
//! | `SCHEDULE_FREQUENCY` | `WEEKLY` |
//! | `SCHEDULE_WEEKDAY` / `SCHEDULE_TIME` | `WEDNESDAY` / `10:00` |
//! | `TIMEZONE` | `America/Los_Angeles` |

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use field_engine::recurrence::DEFAULT_OCCURRENCES_AHEAD;
use field_engine::schedule::parse_timezone;
use field_engine::{
    RecurrenceSpec, RunSchedule, ScheduleFrequency, SelectionCriteria, TimeSlot, Weekday,
};

#[derive(Debug, Clone)]
pub struct BookingConfig {
    pub desired_weekday: Weekday,
    pub desired_time_military: TimeSlot,
    pub alt_desired_times_military: Vec<TimeSlot>,
    pub occurrences_ahead: u32,
    pub desired_field_starts_with: Option<String>,
    pub facility_group_id: i64,
    pub group_quantity: u32,
    pub reservation_name: String,
    pub sport: String,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    pub schedule: RunSchedule,
    pub timezone: Tz,
}

impl BookingConfig {
    /// Read the process environment. Upper-case names take precedence over
    /// lower-case ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| {
            env::var(key)
                .or_else(|_| env::var(key.to_ascii_lowercase()))
                .ok()
        })
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let timezone_name = get("TIMEZONE", "America/Los_Angeles");
        let timezone = parse_timezone(&timezone_name).context("Invalid TIMEZONE value")?;

        let desired_time_military = TimeSlot::parse(&get("DESIRED_TIME_MILITARY", "20:00:00"))
            .context("Invalid DESIRED_TIME_MILITARY value")?;

        let alt_desired_times_military = get("ALT_DESIRED_TIMES_MILITARY", "19:00:00")
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(TimeSlot::parse)
            .collect::<field_engine::error::Result<Vec<_>>>()
            .context("Invalid ALT_DESIRED_TIMES_MILITARY value")?;

        let occurrences_ahead: u32 = parse_var(
            &get("OCCURRENCES_AHEAD", &DEFAULT_OCCURRENCES_AHEAD.to_string()),
            "OCCURRENCES_AHEAD",
        )?;
        if occurrences_ahead == 0 {
            anyhow::bail!("Invalid OCCURRENCES_AHEAD value: must be at least 1");
        }

        let desired_field_starts_with =
            lookup("DESIRED_FIELD_STARTS_WITH").filter(|p| !p.is_empty());

        let schedule_frequency: ScheduleFrequency =
            parse_var(&get("SCHEDULE_FREQUENCY", "WEEKLY"), "SCHEDULE_FREQUENCY")?;
        let schedule_weekday: Weekday =
            parse_var(&get("SCHEDULE_WEEKDAY", "WEDNESDAY"), "SCHEDULE_WEEKDAY")?;
        let schedule = RunSchedule::new(
            schedule_frequency,
            schedule_weekday,
            &get("SCHEDULE_TIME", "10:00"),
            &timezone_name,
        )
        .context("Invalid SCHEDULE_TIME value")?;

        Ok(Self {
            desired_weekday: parse_var(&get("DESIRED_WEEKDAY", "WEDNESDAY"), "DESIRED_WEEKDAY")?,
            desired_time_military,
            alt_desired_times_military,
            occurrences_ahead,
            desired_field_starts_with,
            facility_group_id: parse_var(&get("FACILITY_GROUP_ID", "28"), "FACILITY_GROUP_ID")?,
            group_quantity: parse_var(&get("GROUP_QUANTITY", "15"), "GROUP_QUANTITY")?,
            reservation_name: get("RESERVATION_NAME", "Field Reservation"),
            sport: get("SPORT", "Soccer"),
            max_retries: parse_var(&get("MAX_RETRIES", "3"), "MAX_RETRIES")?,
            retry_delay_secs: parse_var(&get("RETRY_DELAY", "5"), "RETRY_DELAY")?,
            schedule,
            timezone,
        })
    }

    /// Selection criteria from the desired/alternate times and field prefix.
    pub fn criteria(&self) -> SelectionCriteria {
        let criteria = SelectionCriteria::new(self.desired_time_military.clone())
            .with_alternates(self.alt_desired_times_military.iter().cloned());
        match &self.desired_field_starts_with {
            Some(prefix) => criteria.with_prefix(prefix.clone()),
            None => criteria,
        }
    }

    pub fn recurrence(&self) -> RecurrenceSpec {
        RecurrenceSpec {
            weekday: self.desired_weekday,
            time_of_day: self.desired_time_military.to_string(),
            occurrences_ahead: self.occurrences_ahead,
        }
    }
}

fn parse_var<T>(value: &str, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid {} value: '{}'", name, value))
}
