//! Availability data model and strict ingestion of availability responses.
//!
//! An availability response lists the day's time slots once, then for every
//! field a parallel array of per-slot details. Pairing the two arrays is the
//! only fragile step: a short array must never shift or drop statuses, so
//! every length mismatch is reported as a `DataShape` error.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FieldError, Result};
use crate::timefmt;

/// A time-of-day column label in the availability grid (canonically `HH:MM:SS`).
///
/// Labels compare by exact string equality, the same way the booking site
/// keys its grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSlot(String);

impl TimeSlot {
    /// Wrap a label as received, without validation.
    pub fn new(label: impl Into<String>) -> Self {
        TimeSlot(label.into())
    }

    /// Validate `HH:MM[:SS]` and normalise it to `HH:MM:SS`.
    pub fn parse(value: &str) -> Result<Self> {
        timefmt::canonical_time(value).map(TimeSlot)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 12-hour display form used on the booking page (`8:00 PM`).
    pub fn to_american(&self) -> Result<String> {
        timefmt::military_to_american(&self.0)
    }
}

impl From<&str> for TimeSlot {
    fn from(label: &str) -> Self {
        TimeSlot::new(label)
    }
}

impl From<String> for TimeSlot {
    fn from(label: String) -> Self {
        TimeSlot(label)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Booked/free state of one field at one time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStatus {
    pub time: TimeSlot,
    pub is_booked: bool,
}

/// One bookable field or court.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Opaque identifier assigned by the booking provider.
    pub resource_id: i64,
    /// Display name, used for prefix filtering and page lookup.
    pub resource_name: String,
    /// One entry per snapshot time slot, in slot order.
    pub slot_statuses: Vec<SlotStatus>,
}

impl Resource {
    /// Pair a field's per-slot booked flags with the snapshot's time slots.
    ///
    /// # Errors
    /// Returns `FieldError::DataShape` when the two lists differ in length.
    pub fn from_booked_flags(
        resource_id: i64,
        resource_name: impl Into<String>,
        time_slots: &[TimeSlot],
        booked: &[bool],
    ) -> Result<Self> {
        let resource_name = resource_name.into();
        if booked.len() != time_slots.len() {
            return Err(FieldError::DataShape(format!(
                "resource '{}' ({}) has {} slot details for {} time slots",
                resource_name,
                resource_id,
                booked.len(),
                time_slots.len()
            )));
        }

        let slot_statuses = time_slots
            .iter()
            .zip(booked)
            .map(|(time, &is_booked)| SlotStatus {
                time: time.clone(),
                is_booked,
            })
            .collect();

        Ok(Resource {
            resource_id,
            resource_name,
            slot_statuses,
        })
    }

    /// True if some status entry for `time` is not booked.
    ///
    /// Matches by label, never by position, so a short status list can only
    /// make a slot look unavailable, not attribute another slot's state to it.
    pub fn is_available_at(&self, time: &TimeSlot) -> bool {
        self.slot_statuses
            .iter()
            .any(|status| status.time == *time && !status.is_booked)
    }

    /// Labels of every slot this field has free.
    pub fn free_slots(&self) -> Vec<&TimeSlot> {
        self.slot_statuses
            .iter()
            .filter(|status| !status.is_booked)
            .map(|status| &status.time)
            .collect()
    }
}

/// All fields' availability for one requested date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AvailabilitySnapshot {
    pub time_slots: Vec<TimeSlot>,
    pub resources: Vec<Resource>,
}

impl AvailabilitySnapshot {
    /// Build a snapshot, checking every resource against the slot list.
    ///
    /// # Errors
    /// Returns `FieldError::DataShape` if any resource's statuses differ from
    /// `time_slots` in length or order.
    pub fn new(time_slots: Vec<TimeSlot>, resources: Vec<Resource>) -> Result<Self> {
        let snapshot = AvailabilitySnapshot {
            time_slots,
            resources,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<()> {
        for resource in &self.resources {
            if resource.slot_statuses.len() != self.time_slots.len() {
                return Err(FieldError::DataShape(format!(
                    "resource '{}' ({}) has {} slot statuses for {} time slots",
                    resource.resource_name,
                    resource.resource_id,
                    resource.slot_statuses.len(),
                    self.time_slots.len()
                )));
            }
            let misplaced = resource
                .slot_statuses
                .iter()
                .zip(&self.time_slots)
                .position(|(status, slot)| status.time != *slot);
            if let Some(index) = misplaced {
                return Err(FieldError::DataShape(format!(
                    "resource '{}' ({}) lists '{}' at position {} where the snapshot has '{}'",
                    resource.resource_name,
                    resource.resource_id,
                    resource.slot_statuses[index].time,
                    index,
                    self.time_slots[index]
                )));
            }
        }
        Ok(())
    }

    /// Decode a raw availability response document.
    ///
    /// # Errors
    /// Returns `FieldError::DataShape` for invalid JSON, missing fields, status
    /// values that are not booleans (or 0/1), and slot/detail length mismatches.
    pub fn from_response_json(json: &str) -> Result<Self> {
        let response: AvailabilityResponse = serde_json::from_str(json)
            .map_err(|e| FieldError::DataShape(format!("availability response: {}", e)))?;
        Self::from_response(response)
    }

    /// Same as [`from_response_json`](Self::from_response_json) for an already parsed value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let response: AvailabilityResponse = serde_json::from_value(value)
            .map_err(|e| FieldError::DataShape(format!("availability response: {}", e)))?;
        Self::from_response(response)
    }

    fn from_response(response: AvailabilityResponse) -> Result<Self> {
        let availability = response.body.availability;
        let time_slots: Vec<TimeSlot> = availability
            .time_slots
            .into_iter()
            .map(TimeSlot::from)
            .collect();

        let mut resources = Vec::with_capacity(availability.resources.len());
        for raw in availability.resources {
            let booked = raw
                .time_slot_details
                .iter()
                .map(|detail| detail.status.is_booked(raw.resource_id))
                .collect::<Result<Vec<bool>>>()?;
            resources.push(Resource::from_booked_flags(
                raw.resource_id,
                raw.resource_name,
                &time_slots,
                &booked,
            )?);
        }

        debug!(
            time_slots = time_slots.len(),
            resources = resources.len(),
            "decoded availability snapshot"
        );

        Ok(AvailabilitySnapshot {
            time_slots,
            resources,
        })
    }
}

#[derive(Deserialize)]
struct AvailabilityResponse {
    body: ResponseBody,
}

#[derive(Deserialize)]
struct ResponseBody {
    availability: RawAvailability,
}

#[derive(Deserialize)]
struct RawAvailability {
    time_slots: Vec<String>,
    resources: Vec<RawResource>,
}

#[derive(Deserialize)]
struct RawResource {
    resource_id: i64,
    resource_name: String,
    time_slot_details: Vec<RawSlotDetail>,
}

#[derive(Deserialize)]
struct RawSlotDetail {
    status: RawStatus,
}

/// The provider reports `status` as a boolean, older payloads as 0/1.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawStatus {
    Flag(bool),
    Code(i64),
}

impl RawStatus {
    fn is_booked(&self, resource_id: i64) -> Result<bool> {
        match *self {
            RawStatus::Flag(flag) => Ok(flag),
            RawStatus::Code(0) => Ok(false),
            RawStatus::Code(1) => Ok(true),
            RawStatus::Code(other) => Err(FieldError::DataShape(format!(
                "resource {} has slot status {}, expected a boolean",
                resource_id, other
            ))),
        }
    }
}

/// JSON body of the availability query sent to the booking provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub facility_group_id: i64,
    pub customer_id: i64,
    pub company_id: i64,
    pub reserve_date: NaiveDate,
    pub resident: bool,
    pub reload: bool,
    pub change_time_range: bool,
}

impl AvailabilityRequest {
    /// Non-resident, non-reload query for one date.
    pub fn for_date(facility_group_id: i64, customer_id: i64, reserve_date: NaiveDate) -> Self {
        AvailabilityRequest {
            facility_group_id,
            customer_id,
            company_id: 0,
            reserve_date,
            resident: false,
            reload: false,
            change_time_range: false,
        }
    }
}
