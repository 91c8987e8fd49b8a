//! Event repository implementation

use sqlx::PgPool;
use chrono::Utc;
use uuid::Uuid;
use crate::models::event::{EventRow, NewEventRow};
use crate::models::registration::EventQuota;
use crate::utils::errors::ChurchHubError;

const EVENT_COLUMNS: &str = "id, title, description, start_date, end_date, status, event_level, \
    owner_scope_id, requires_registration, is_paid, registration_fee, visibility, target_audience, \
    location, metadata, created_by, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(&self, row: NewEventRow, created_by: Option<Uuid>) -> Result<EventRow, ChurchHubError> {
        let sql = format!(
            r#"
            INSERT INTO events (title, description, start_date, end_date, status, event_level, owner_scope_id,
                requires_registration, is_paid, registration_fee, visibility, target_audience, location, metadata,
                created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $16)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );

        let event = sqlx::query_as::<_, EventRow>(&sql)
            .bind(row.title)
            .bind(row.description)
            .bind(row.start_date)
            .bind(row.end_date)
            .bind(row.status)
            .bind(row.event_level)
            .bind(row.owner_scope_id)
            .bind(row.requires_registration)
            .bind(row.is_paid)
            .bind(row.registration_fee)
            .bind(row.visibility)
            .bind(row.target_audience)
            .bind(row.location)
            .bind(row.metadata)
            .bind(created_by)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EventRow>, ChurchHubError> {
        let sql = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);
        let event = sqlx::query_as::<_, EventRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(event)
    }

    /// Replace the writable columns of an event. Level and owner are kept as stored.
    pub async fn update(&self, id: Uuid, row: NewEventRow) -> Result<EventRow, ChurchHubError> {
        let sql = format!(
            r#"
            UPDATE events
            SET title = $2,
                description = $3,
                start_date = $4,
                end_date = $5,
                status = $6,
                requires_registration = $7,
                is_paid = $8,
                registration_fee = $9,
                visibility = $10,
                target_audience = $11,
                location = $12,
                metadata = $13,
                updated_at = $14
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );

        let event = sqlx::query_as::<_, EventRow>(&sql)
            .bind(id)
            .bind(row.title)
            .bind(row.description)
            .bind(row.start_date)
            .bind(row.end_date)
            .bind(row.status)
            .bind(row.requires_registration)
            .bind(row.is_paid)
            .bind(row.registration_fee)
            .bind(row.visibility)
            .bind(row.target_audience)
            .bind(row.location)
            .bind(row.metadata)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        event.ok_or(ChurchHubError::EventNotFound { event_id: id })
    }

    /// Delete event
    pub async fn delete(&self, id: Uuid) -> Result<(), ChurchHubError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List every event, soonest first
    pub async fn list(&self) -> Result<Vec<EventRow>, ChurchHubError> {
        let sql = format!("SELECT {} FROM events ORDER BY start_date ASC", EVENT_COLUMNS);
        let events = sqlx::query_as::<_, EventRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    /// Set or replace the registration quota of an event
    pub async fn set_quota(&self, event_id: Uuid, capacity: i32) -> Result<EventQuota, ChurchHubError> {
        let quota = sqlx::query_as::<_, EventQuota>(
            r#"
            INSERT INTO event_quotas (event_id, capacity)
            VALUES ($1, $2)
            ON CONFLICT (event_id) DO UPDATE SET capacity = EXCLUDED.capacity
            RETURNING event_id, capacity
            "#
        )
        .bind(event_id)
        .bind(capacity)
        .fetch_one(&self.pool)
        .await?;

        Ok(quota)
    }

    /// Get the registration quota of an event, if one was set
    pub async fn get_quota(&self, event_id: Uuid) -> Result<Option<EventQuota>, ChurchHubError> {
        let quota = sqlx::query_as::<_, EventQuota>(
            "SELECT event_id, capacity FROM event_quotas WHERE event_id = $1"
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quota)
    }
}
