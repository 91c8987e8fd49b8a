//! Event record mapping
//!
//! Storage keeps one timestamp per boundary and packs category and recurrence
//! into a JSON `metadata` column. Administrators work with split date/time
//! values and a reduced status set.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;

use crate::models::event::{
    EventItem, EventRow, EventStatus, EventType, Frequency, NewEventRow, RecurrencePattern,
    StorageStatus,
};
use crate::utils::errors::{ChurchHubError, Result};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Reduce a storage status to the administrator-facing set.
///
/// `draft` and `published` both read as `Open`. Writing an `Open` event back
/// always stores `published`, so `draft` does not survive an edit.
pub fn collapse_status(status: StorageStatus) -> EventStatus {
    match status {
        StorageStatus::Draft | StorageStatus::Published => EventStatus::Open,
        StorageStatus::Cancelled => EventStatus::Cancelled,
        StorageStatus::Upcoming => EventStatus::Upcoming,
        StorageStatus::Active => EventStatus::Active,
        StorageStatus::Ended => EventStatus::Ended,
    }
}

pub fn expand_status(status: EventStatus) -> StorageStatus {
    match status {
        EventStatus::Cancelled => StorageStatus::Cancelled,
        EventStatus::Upcoming => StorageStatus::Upcoming,
        EventStatus::Active => StorageStatus::Active,
        EventStatus::Ended => StorageStatus::Ended,
        EventStatus::Open => StorageStatus::Published,
    }
}

/// Append `:00` to an `HH:MM` time; anything with two colons passes through.
pub fn normalize_time(time: &str) -> String {
    let time = time.trim();
    match time.matches(':').count() {
        1 => format!("{}:00", time),
        _ => time.to_string(),
    }
}

/// Join a date and a wall-clock time into a storage timestamp
pub fn combine_timestamp(date: NaiveDate, time: &str) -> Result<NaiveDateTime> {
    let raw = format!("{}T{}", date.format("%Y-%m-%d"), normalize_time(time));
    NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
        .map_err(|e| ChurchHubError::InvalidInput(format!("invalid time '{}': {}", time, e)))
}

/// Unpack category, frequency and recurrence bounds, defaulting anything
/// missing or unrecognised.
pub fn read_metadata(metadata: &serde_json::Value) -> (EventType, Frequency, RecurrencePattern) {
    let event_type = metadata
        .get("type")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    let frequency = metadata
        .get("frequency")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    let recurrence_pattern = metadata
        .get("recurrencePattern")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default();

    (event_type, frequency, recurrence_pattern)
}

pub fn pack_metadata(
    event_type: EventType,
    frequency: Frequency,
    recurrence_pattern: &RecurrencePattern,
) -> serde_json::Value {
    json!({
        "type": event_type.as_str(),
        "frequency": frequency.as_str(),
        "recurrencePattern": recurrence_pattern,
    })
}

pub fn to_domain(row: &EventRow) -> EventItem {
    let (event_type, frequency, recurrence_pattern) = read_metadata(&row.metadata);
    let end = row.end_date.unwrap_or(row.start_date);

    EventItem {
        id: Some(row.id),
        title: row.title.clone(),
        description: row.description.clone(),
        date: row.start_date.date(),
        time: row.start_date.format("%H:%M").to_string(),
        end_date: end.date(),
        end_time: end.format("%H:%M").to_string(),
        status: collapse_status(row.status),
        event_level: row.event_level,
        owner_scope_id: row.owner_scope_id,
        requires_registration: row.requires_registration,
        is_paid: row.is_paid,
        registration_fee: row.registration_fee,
        visibility: row.visibility,
        target_audience: row.target_audience.clone(),
        location: row.location.clone(),
        event_type,
        frequency,
        recurrence_pattern,
    }
}

pub fn to_storage(item: &EventItem) -> Result<NewEventRow> {
    let start_date = combine_timestamp(item.date, &item.time)?;
    let end_date = combine_timestamp(item.end_date, &item.end_time)?;

    Ok(NewEventRow {
        title: item.title.clone(),
        description: item.description.clone(),
        start_date,
        end_date,
        status: expand_status(item.status),
        event_level: item.event_level,
        owner_scope_id: item.owner_scope_id,
        requires_registration: item.requires_registration,
        is_paid: item.is_paid,
        registration_fee: item.registration_fee,
        visibility: item.visibility,
        target_audience: item.target_audience.clone(),
        location: item.location.clone(),
        metadata: pack_metadata(item.event_type, item.frequency, &item.recurrence_pattern),
    })
}
