//! Registration and attendance model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub member_id: Uuid,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
    pub checked_in_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum RegistrationStatus {
    Registered,
    Cancelled,
    Attended,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Registered => "registered",
            RegistrationStatus::Cancelled => "cancelled",
            RegistrationStatus::Attended => "attended",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRegistrationRequest {
    pub event_id: Uuid,
    pub member_id: Uuid,
    pub status: RegistrationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventQuota {
    pub event_id: Uuid,
    pub capacity: i32,
}

/// Head count of one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistrationSummary {
    /// Registrations that were not cancelled
    pub registered: i64,
    pub checked_in: i64,
    pub capacity: Option<i32>,
}

impl RegistrationSummary {
    /// Places left, when a quota is set
    pub fn remaining(&self) -> Option<i64> {
        self.capacity.map(|capacity| (i64::from(capacity) - self.registered).max(0))
    }
}
