//! Trigger times for the recurring booking job.
//!
//! The job itself is started by an external scheduler; this module only
//! answers "when does it fire next", evaluated as wall-clock time in the
//! schedule's own timezone.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Days, LocalResult, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};
use crate::timefmt::parse_time_of_day;
use crate::weekday::Weekday;

/// Longest run of non-existent local minutes skipped over at a DST change.
const MAX_GAP_MINUTES: i64 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScheduleFrequency {
    Daily,
    #[default]
    Weekly,
}

impl FromStr for ScheduleFrequency {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Ok(ScheduleFrequency::Daily),
            "WEEKLY" => Ok(ScheduleFrequency::Weekly),
            _ => Err(FieldError::Validation(format!(
                "unknown schedule frequency: '{}' (expected DAILY or WEEKLY)",
                s
            ))),
        }
    }
}

impl fmt::Display for ScheduleFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleFrequency::Daily => f.write_str("DAILY"),
            ScheduleFrequency::Weekly => f.write_str("WEEKLY"),
        }
    }
}

/// Parse an IANA timezone name such as `America/Los_Angeles`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| FieldError::InvalidTimezone(name.to_string()))
}

/// When the booking job runs. `weekday` is ignored for daily schedules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSchedule {
    pub frequency: ScheduleFrequency,
    pub weekday: Weekday,
    pub time: NaiveTime,
    pub timezone: Tz,
}

impl RunSchedule {
    /// # Errors
    /// Returns `FieldError::Validation` for a malformed time and
    /// `FieldError::InvalidTimezone` for an unknown zone.
    pub fn new(
        frequency: ScheduleFrequency,
        weekday: Weekday,
        time: &str,
        timezone: &str,
    ) -> Result<Self> {
        Ok(RunSchedule {
            frequency,
            weekday,
            time: parse_time_of_day(time)?,
            timezone: parse_timezone(timezone)?,
        })
    }

    fn fires_on(&self, day: chrono::Weekday) -> bool {
        match self.frequency {
            ScheduleFrequency::Daily => true,
            ScheduleFrequency::Weekly => day == self.weekday.to_chrono(),
        }
    }

    /// First trigger instant strictly after `now`.
    ///
    /// Local times inside a DST gap fire at the first valid minute after the
    /// gap; ambiguous local times fire at the earlier instant.
    pub fn next_run_after(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let today = now.with_timezone(&self.timezone).date_naive();

        // Eight days covers a full week plus today's already-passed slot.
        for offset in 0..=8 {
            let Some(date) = today.checked_add_days(Days::new(offset)) else {
                break;
            };
            if !self.fires_on(date.weekday()) {
                continue;
            }
            let instant = self.resolve_local(date.and_time(self.time))?;
            if instant > now {
                return Ok(instant);
            }
        }

        Err(FieldError::Validation(format!(
            "no run of {} found after {}",
            self.describe(),
            now
        )))
    }

    /// The next `count` trigger instants after `now`, in order.
    pub fn upcoming_runs(&self, now: DateTime<Utc>, count: usize) -> Result<Vec<DateTime<Utc>>> {
        let mut runs = Vec::with_capacity(count);
        let mut cursor = now;
        for _ in 0..count {
            cursor = self.next_run_after(cursor)?;
            runs.push(cursor);
        }
        Ok(runs)
    }

    pub fn describe(&self) -> String {
        let time = self.time.format("%H:%M");
        match self.frequency {
            ScheduleFrequency::Daily => format!("daily at {} ({})", time, self.timezone),
            ScheduleFrequency::Weekly => {
                format!("every {} at {} ({})", self.weekday, time, self.timezone)
            }
        }
    }

    fn resolve_local(&self, local: NaiveDateTime) -> Result<DateTime<Utc>> {
        for minutes in 0..=MAX_GAP_MINUTES {
            let shifted = local + TimeDelta::minutes(minutes);
            match self.timezone.from_local_datetime(&shifted) {
                LocalResult::Single(t) => return Ok(t.with_timezone(&Utc)),
                LocalResult::Ambiguous(earliest, _) => return Ok(earliest.with_timezone(&Utc)),
                LocalResult::None => continue,
            }
        }
        Err(FieldError::Validation(format!(
            "local time {} does not exist in {}",
            local, self.timezone
        )))
    }
}
