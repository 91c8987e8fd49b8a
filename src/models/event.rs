//! Event model
//!
//! `EventRow` mirrors the `events` table. `EventItem` is the shape handlers and
//! services work with: dates and times split apart, metadata unpacked and the
//! status reduced to what administrators choose from. Conversions live in
//! [`crate::mapper`].

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use super::role::HierarchyLevel;

/// Status values persisted in `events.status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum StorageStatus {
    Draft,
    Published,
    Cancelled,
    Upcoming,
    Active,
    Ended,
}

impl StorageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageStatus::Draft => "draft",
            StorageStatus::Published => "published",
            StorageStatus::Cancelled => "cancelled",
            StorageStatus::Upcoming => "upcoming",
            StorageStatus::Active => "active",
            StorageStatus::Ended => "ended",
        }
    }
}

/// Status shown to and chosen by administrators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventStatus {
    Open,
    Upcoming,
    Active,
    Ended,
    Cancelled,
}

impl EventStatus {
    pub const ALL: [EventStatus; 5] = [
        EventStatus::Open,
        EventStatus::Upcoming,
        EventStatus::Active,
        EventStatus::Ended,
        EventStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Open => "Open",
            EventStatus::Upcoming => "Upcoming",
            EventStatus::Active => "Active",
            EventStatus::Ended => "Ended",
            EventStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(EventStatus::Open),
            "upcoming" => Ok(EventStatus::Upcoming),
            "active" => Ok(EventStatus::Active),
            "ended" => Ok(EventStatus::Ended),
            "cancelled" | "canceled" => Ok(EventStatus::Cancelled),
            other => Err(format!("unknown event status: {}", other)),
        }
    }
}

/// Event category; only used for filtering and labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    General,
    Service,
    Conference,
    Crusade,
    Youth,
    Fellowship,
    Training,
    Meeting,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::General => "General",
            EventType::Service => "Service",
            EventType::Conference => "Conference",
            EventType::Crusade => "Crusade",
            EventType::Youth => "Youth",
            EventType::Fellowship => "Fellowship",
            EventType::Training => "Training",
            EventType::Meeting => "Meeting",
        }
    }
}

impl Default for EventType {
    fn default() -> Self {
        EventType::General
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(EventType::General),
            "service" => Ok(EventType::Service),
            "conference" => Ok(EventType::Conference),
            "crusade" => Ok(EventType::Crusade),
            "youth" => Ok(EventType::Youth),
            "fellowship" => Ok(EventType::Fellowship),
            "training" => Ok(EventType::Training),
            "meeting" => Ok(EventType::Meeting),
            other => Err(format!("unknown event type: {}", other)),
        }
    }
}

/// How often an event repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "One-time")]
    OneTime,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::OneTime => "One-time",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
        }
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency::OneTime
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "one-time" | "onetime" | "once" => Ok(Frequency::OneTime),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" | "annual" => Ok(Frequency::Yearly),
            other => Err(format!("unknown frequency: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Public
    }
}

/// Bounds on a repeating event, stored as `metadata.recurrencePattern`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrencePattern {
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

fn default_interval() -> u32 {
    1
}

impl Default for RecurrencePattern {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            until: None,
            count: None,
        }
    }
}

/// Row of the `events` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
    pub status: StorageStatus,
    pub event_level: HierarchyLevel,
    pub owner_scope_id: Option<Uuid>,
    pub requires_registration: bool,
    pub is_paid: bool,
    pub registration_fee: Option<Decimal>,
    pub visibility: Visibility,
    pub target_audience: Option<String>,
    pub location: Option<String>,
    pub metadata: serde_json::Value,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable columns of the `events` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEventRow {
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub status: StorageStatus,
    pub event_level: HierarchyLevel,
    pub owner_scope_id: Option<Uuid>,
    pub requires_registration: bool,
    pub is_paid: bool,
    pub registration_fee: Option<Decimal>,
    pub visibility: Visibility,
    pub target_audience: Option<String>,
    pub location: Option<String>,
    pub metadata: serde_json::Value,
}

/// Event as handled by services and handlers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventItem {
    /// `None` until storage assigns one
    pub id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    /// Wall-clock time as `HH:MM` (seconds are accepted on input)
    pub time: String,
    pub end_date: NaiveDate,
    pub end_time: String,
    pub status: EventStatus,
    pub event_level: HierarchyLevel,
    pub owner_scope_id: Option<Uuid>,
    pub requires_registration: bool,
    pub is_paid: bool,
    pub registration_fee: Option<Decimal>,
    pub visibility: Visibility,
    pub target_audience: Option<String>,
    pub location: Option<String>,
    pub event_type: EventType,
    pub frequency: Frequency,
    pub recurrence_pattern: RecurrencePattern,
}

/// Administrator input for creating or editing an event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<String>,
    pub status: Option<EventStatus>,
    pub requires_registration: bool,
    pub is_paid: bool,
    pub registration_fee: Option<Decimal>,
    pub visibility: Visibility,
    pub target_audience: Option<String>,
    pub location: Option<String>,
    pub event_type: EventType,
    pub frequency: Frequency,
    pub recurrence_pattern: Option<RecurrencePattern>,
}

impl EventDraft {
    pub fn new(title: &str, date: NaiveDate) -> Self {
        Self {
            title: title.to_string(),
            date: Some(date),
            ..Default::default()
        }
    }

    pub fn with_time(mut self, time: &str) -> Self {
        self.time = Some(time.to_string());
        self
    }

    pub fn with_end(mut self, end_date: NaiveDate, end_time: &str) -> Self {
        self.end_date = Some(end_date);
        self.end_time = Some(end_time.to_string());
        self
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_type(mut self, event_type: EventType) -> Self {
        self.event_type = event_type;
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_registration(mut self, requires_registration: bool) -> Self {
        self.requires_registration = requires_registration;
        self
    }

    pub fn with_fee(mut self, fee: Decimal) -> Self {
        self.is_paid = true;
        self.registration_fee = Some(fee);
        self
    }
}

/// Event annotated with whether the current actor may manage it
#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    pub item: EventItem,
    pub can_edit: bool,
}

/// In-memory filter applied after the full event list is fetched
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub status: Option<EventStatus>,
    pub event_type: Option<EventType>,
    pub level: Option<HierarchyLevel>,
    pub search: Option<String>,
}

impl EventFilter {
    pub fn matches(&self, item: &EventItem) -> bool {
        if self.status.is_some_and(|status| status != item.status) {
            return false;
        }
        if self.event_type.is_some_and(|event_type| event_type != item.event_type) {
            return false;
        }
        if self.level.is_some_and(|level| level != item.event_level) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                item.title.to_lowercase().contains(&needle)
                    || item
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
                    || item
                        .location
                        .as_deref()
                        .is_some_and(|l| l.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }
}
