//! District and branch model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct District {
    pub id: Uuid,
    pub name: String,
    /// User who administers this district
    pub head_admin_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Branch {
    pub id: Uuid,
    pub district_id: Uuid,
    pub name: String,
    pub is_district_hq: bool,
    pub created_at: DateTime<Utc>,
}
