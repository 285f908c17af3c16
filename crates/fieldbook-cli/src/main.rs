//! `fieldbook` CLI: plan recurring athletic field reservations.
//!
//! Configuration comes from the environment (and a `.env` file if present);
//! flags override individual settings. Only commands that read a setting load
//! the configuration, so `time` works with any environment. Logs go to stderr,
//! results to stdout.
//!
//! ## Usage
//!
//! ```sh
//! # Date the next booking run should target
//! fieldbook next-date --weekday WEDNESDAY --time 20:00 --ahead 2
//!
//! # Pick a field from a saved availability response
//! fieldbook resolve -i availability.json --primary 20:00:00 --alt 19:00:00,21:00:00
//!
//! # Full dry run from configuration
//! fieldbook plan -i availability.json --customer-id 4242
//!
//! # 24-hour <-> 12-hour conversion
//! fieldbook time 20:00:00
//!
//! # Next trigger instants of the configured job schedule
//! fieldbook schedule --count 3
//! ```

mod config;

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use field_engine::{
    american_to_military, format_date_for_calendar, military_to_american, resolve,
    AvailabilityRequest, AvailabilitySnapshot, RecurrenceSpec, Selection, SelectionCriteria,
    TimeSlot, Weekday,
};
use serde::Serialize;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::config::BookingConfig;

#[derive(Parser)]
#[command(
    name = "fieldbook",
    version,
    about = "Plan recurring athletic field reservations"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the date a booking run should target
    NextDate {
        /// Desired weekday (defaults to DESIRED_WEEKDAY)
        #[arg(long)]
        weekday: Option<Weekday>,
        /// Desired time, HH:MM[:SS] (defaults to DESIRED_TIME_MILITARY)
        #[arg(long)]
        time: Option<String>,
        /// Which future occurrence to target (defaults to OCCURRENCES_AHEAD)
        #[arg(long)]
        ahead: Option<u32>,
        /// Evaluate as of this instant (RFC 3339, or local YYYY-MM-DDTHH:MM[:SS])
        #[arg(long)]
        now: Option<String>,
    },
    /// Select a field and time from an availability response
    Resolve {
        /// Availability response JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Primary time, HH:MM[:SS]
        #[arg(long)]
        primary: Option<String>,
        /// Comma-separated alternate times, tried in order
        #[arg(long)]
        alt: Option<String>,
        /// Only consider fields whose name starts with this
        #[arg(long)]
        prefix: Option<String>,
        /// Print the selection as JSON
        #[arg(long)]
        json: bool,
    },
    /// Dry-run a booking from configuration and an availability response
    Plan {
        /// Availability response JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Customer id sent with the availability query
        #[arg(long)]
        customer_id: i64,
        /// Evaluate as of this instant (RFC 3339, or local YYYY-MM-DDTHH:MM[:SS])
        #[arg(long)]
        now: Option<String>,
    },
    /// Convert a time between 24-hour and 12-hour display form
    Time {
        /// `20:00:00` or `8:00 PM`
        value: String,
    },
    /// Print upcoming trigger instants of the configured job schedule
    Schedule {
        /// Number of runs to list
        #[arg(long, default_value_t = 1)]
        count: usize,
        /// Evaluate as of this instant (RFC 3339, or local YYYY-MM-DDTHH:MM[:SS])
        #[arg(long)]
        now: Option<String>,
    },
}

/// Selection as printed by `resolve --json` and `plan`.
#[derive(Serialize)]
struct SelectionReport {
    resource_id: i64,
    resource_name: String,
    time: TimeSlot,
    label: String,
    /// Every slot the selected field has free, in response order.
    free_slots: Vec<TimeSlot>,
}

impl SelectionReport {
    fn from_selection(selection: &Selection) -> Result<Self> {
        let resource = &selection.resource;
        Ok(SelectionReport {
            resource_id: resource.resource_id,
            resource_name: resource.resource_name.clone(),
            time: selection.time.clone(),
            label: selection.ui_label()?,
            free_slots: resource.free_slots().into_iter().cloned().collect(),
        })
    }
}

#[derive(Serialize)]
struct RetryPolicy {
    max_retries: u32,
    delay_secs: u64,
}

#[derive(Serialize)]
struct BookingPlan {
    request_date: String,
    calendar_label: String,
    request: AvailabilityRequest,
    reservation_name: String,
    sport: String,
    group_quantity: u32,
    selection: SelectionReport,
    retry: RetryPolicy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenv::dotenv().ok();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::NextDate {
            weekday,
            time,
            ahead,
            now,
        } => {
            let config = load_config()?;
            let spec = RecurrenceSpec::new(
                weekday.unwrap_or(config.desired_weekday),
                time.as_deref()
                    .unwrap_or(config.desired_time_military.as_str()),
                ahead.unwrap_or(config.occurrences_ahead),
            )
            .context("Invalid recurrence")?;
            let now = parse_now(now.as_deref(), config.timezone)?;
            let date = spec.request_date_in(config.timezone, now)?;
            info!(
                weekday = %spec.weekday,
                time = %spec.time_of_day,
                occurrences_ahead = spec.occurrences_ahead,
                "computed request date"
            );
            println!("{}", date.format("%Y-%m-%d"));
        }
        Commands::Resolve {
            input,
            primary,
            alt,
            prefix,
            json,
        } => {
            let config = load_config()?;
            let snapshot = read_snapshot(input.as_deref())?;
            let criteria = build_criteria(&config, primary.as_deref(), alt.as_deref(), prefix)?;
            let selection = select(&snapshot, &criteria)?;
            let report = SelectionReport::from_selection(&selection)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.resource_name);
                println!("{}", report.time);
                println!("{}", report.label);
            }
        }
        Commands::Plan {
            input,
            customer_id,
            now,
        } => {
            let config = load_config()?;
            let now = parse_now(now.as_deref(), config.timezone)?;
            let request_date = config
                .recurrence()
                .request_date_in(config.timezone, now)
                .context("Invalid recurrence")?;
            info!(%request_date, "planning reservation");

            let snapshot = read_snapshot(input.as_deref())?;
            let selection = select(&snapshot, &config.criteria())?;

            let plan = BookingPlan {
                request_date: request_date.format("%Y-%m-%d").to_string(),
                calendar_label: format_date_for_calendar(request_date),
                request: AvailabilityRequest::for_date(
                    config.facility_group_id,
                    customer_id,
                    request_date,
                ),
                reservation_name: config.reservation_name.clone(),
                sport: config.sport.clone(),
                group_quantity: config.group_quantity,
                selection: SelectionReport::from_selection(&selection)?,
                retry: RetryPolicy {
                    max_retries: config.max_retries,
                    delay_secs: config.retry_delay_secs,
                },
            };
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Commands::Time { value } => {
            println!("{}", convert_time(&value)?);
        }
        Commands::Schedule { count, now } => {
            let config = load_config()?;
            let now = parse_now(now.as_deref(), config.timezone)?;
            info!(schedule = %config.schedule.describe(), "listing upcoming runs");
            for run in config.schedule.upcoming_runs(now, count)? {
                let local = run.with_timezone(&config.schedule.timezone);
                println!("{}", local.to_rfc3339());
            }
        }
    }

    Ok(())
}

fn load_config() -> Result<BookingConfig> {
    let config = BookingConfig::from_env().context("Failed to load configuration")?;
    debug!(?config, "configuration loaded");
    Ok(config)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Resolve and treat "no match" as the end of this run.
fn select(snapshot: &AvailabilitySnapshot, criteria: &SelectionCriteria) -> Result<Selection> {
    let selection = resolve(snapshot, criteria)
        .into_selection(criteria)
        .inspect_err(|e| error!("{}", e))?;
    info!(
        field = %selection.resource.resource_name,
        time = %selection.time,
        "selected field"
    );
    Ok(selection)
}

/// Config criteria with any command-line overrides applied.
fn build_criteria(
    config: &BookingConfig,
    primary: Option<&str>,
    alt: Option<&str>,
    prefix: Option<String>,
) -> Result<SelectionCriteria> {
    let mut criteria = config.criteria();
    if let Some(primary) = primary {
        criteria.primary_time = TimeSlot::parse(primary).context("Invalid --primary time")?;
    }
    if let Some(alt) = alt {
        criteria.alternate_times = alt
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(TimeSlot::parse)
            .collect::<field_engine::error::Result<Vec<_>>>()
            .context("Invalid --alt time")?;
    }
    if let Some(prefix) = prefix {
        criteria.name_prefix = Some(prefix).filter(|p| !p.is_empty());
    }
    Ok(criteria)
}

/// 12-hour input (ends in AM/PM) converts to 24-hour, anything else the other way.
fn convert_time(value: &str) -> Result<String> {
    let upper = value.trim().to_ascii_uppercase();
    let converted = if upper.ends_with("AM") || upper.ends_with("PM") {
        american_to_military(value)?
    } else {
        military_to_american(value)?
    };
    Ok(converted)
}

/// Local forms accepted by `--now`, tried in order.
const NOW_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// `--now` as an instant; local forms are read in the configured timezone.
fn parse_now(value: Option<&str>, tz: Tz) -> Result<DateTime<Utc>> {
    let Some(value) = value else {
        return Ok(Utc::now());
    };
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    let naive = NOW_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .with_context(|| format!("Invalid --now value: '{}'", value))?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .with_context(|| format!("--now '{}' does not exist in {}", value, tz))
}

fn read_snapshot(path: Option<&str>) -> Result<AvailabilitySnapshot> {
    let raw = read_input(path)?;
    AvailabilitySnapshot::from_response_json(&raw).context("Failed to read availability response")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
