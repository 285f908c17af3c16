//! # field-engine
//!
//! Deterministic booking decisions for recurring athletic field reservations.
//!
//! The engine is the pure core behind the booking automation: it turns a
//! snapshot of per-slot field availability into a single (field, time) choice,
//! and works out which calendar date a recurring weekly reservation should
//! target. Nothing here performs I/O; callers fetch the availability response
//! and drive the booking site themselves.
//!
//! ## Modules
//!
//! - [`snapshot`]: availability data model and strict response ingestion
//! - [`resolver`]: primary/alternate time selection over a snapshot
//! - [`recurrence`]: N-th future occurrence of a weekday/time
//! - [`schedule`]: next trigger instants for the daily/weekly booking job
//! - [`timefmt`]: 24-hour / 12-hour time and calendar label formatting
//! - [`weekday`]: weekday tokens used by configuration
//! - [`error`]: Error types

pub mod error;
pub mod recurrence;
pub mod resolver;
pub mod schedule;
pub mod snapshot;
pub mod timefmt;
pub mod weekday;

pub use error::FieldError;
pub use recurrence::{next_occurrence, next_occurrence_date, RecurrenceSpec};
pub use resolver::{resolve, Selection, SelectionCriteria, SelectionResult};
pub use schedule::{parse_timezone, RunSchedule, ScheduleFrequency};
pub use snapshot::{AvailabilityRequest, AvailabilitySnapshot, Resource, SlotStatus, TimeSlot};
pub use timefmt::{american_to_military, format_date_for_calendar, military_to_american};
pub use weekday::Weekday;
