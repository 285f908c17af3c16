//! Select one field and time from an availability snapshot.
//!
//! Times are tried in preference order: the primary time first, then each
//! alternate in the order given. The first time at which any eligible field
//! is free wins, and among the fields free at that time the first one in the
//! snapshot's resource order is taken. No other ordering (name, id) is applied.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FieldError, Result};
use crate::snapshot::{AvailabilitySnapshot, Resource, TimeSlot};

/// What the caller wants to book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCriteria {
    pub primary_time: TimeSlot,
    /// Tried in listed order after `primary_time`.
    pub alternate_times: Vec<TimeSlot>,
    /// Case-sensitive field name prefix. `None` (or an empty prefix) means
    /// every field is eligible.
    pub name_prefix: Option<String>,
}

impl SelectionCriteria {
    pub fn new(primary_time: impl Into<TimeSlot>) -> Self {
        SelectionCriteria {
            primary_time: primary_time.into(),
            alternate_times: Vec::new(),
            name_prefix: None,
        }
    }

    pub fn with_alternates<I, T>(mut self, alternates: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TimeSlot>,
    {
        self.alternate_times = alternates.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    /// Primary time followed by the alternates.
    pub fn candidate_times(&self) -> impl Iterator<Item = &TimeSlot> {
        std::iter::once(&self.primary_time).chain(self.alternate_times.iter())
    }

    fn is_eligible(&self, resource: &Resource) -> bool {
        match self.name_prefix.as_deref() {
            Some(prefix) => resource.resource_name.starts_with(prefix),
            None => true,
        }
    }
}

/// A chosen field and the time that satisfied the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub resource: Resource,
    pub time: TimeSlot,
}

impl Selection {
    /// Accessible label of the grid cell on the booking page,
    /// e.g. `FIELD - A 7:00 PM`.
    pub fn ui_label(&self) -> Result<String> {
        Ok(format!(
            "{} {}",
            self.resource.resource_name,
            self.time.to_american()?
        ))
    }
}

/// Outcome of [`resolve`]. "No match" is an ordinary result, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SelectionResult {
    Selected(Selection),
    NoMatch { primary_time: TimeSlot },
}

impl SelectionResult {
    pub fn is_match(&self) -> bool {
        matches!(self, SelectionResult::Selected(_))
    }

    pub fn resource(&self) -> Option<&Resource> {
        match self {
            SelectionResult::Selected(selection) => Some(&selection.resource),
            SelectionResult::NoMatch { .. } => None,
        }
    }

    /// Selected time, or the primary time when nothing matched.
    pub fn time(&self) -> &TimeSlot {
        match self {
            SelectionResult::Selected(selection) => &selection.time,
            SelectionResult::NoMatch { primary_time } => primary_time,
        }
    }

    /// Turn "no match" into `FieldError::NoAvailability` for callers that
    /// abort the run on it.
    pub fn into_selection(self, criteria: &SelectionCriteria) -> Result<Selection> {
        match self {
            SelectionResult::Selected(selection) => Ok(selection),
            SelectionResult::NoMatch { primary_time } => Err(FieldError::NoAvailability {
                primary: primary_time.to_string(),
                alternates: criteria
                    .alternate_times
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            }),
        }
    }
}

/// Pick the first eligible field free at the earliest-preferred candidate time.
pub fn resolve(snapshot: &AvailabilitySnapshot, criteria: &SelectionCriteria) -> SelectionResult {
    let eligible: Vec<&Resource> = snapshot
        .resources
        .iter()
        .filter(|r| criteria.is_eligible(r))
        .collect();

    debug!(
        eligible = eligible.len(),
        total = snapshot.resources.len(),
        prefix = criteria.name_prefix.as_deref().unwrap_or(""),
        "filtered resources"
    );

    for time in criteria.candidate_times() {
        let first_free = eligible.iter().find(|r| r.is_available_at(time));
        match first_free {
            Some(resource) => {
                debug!(time = %time, resource = %resource.resource_name, "slot available");
                return SelectionResult::Selected(Selection {
                    resource: (*resource).clone(),
                    time: time.clone(),
                });
            }
            None => debug!(time = %time, "no eligible field free"),
        }
    }

    SelectionResult::NoMatch {
        primary_time: criteria.primary_time.clone(),
    }
}
