//! Registration repository implementation

use sqlx::PgPool;
use chrono::Utc;
use uuid::Uuid;
use crate::models::registration::{CreateRegistrationRequest, Registration};
use crate::utils::errors::ChurchHubError;

#[derive(Clone, Debug)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a member for an event
    pub async fn create(&self, request: CreateRegistrationRequest) -> Result<Registration, ChurchHubError> {
        let now = Utc::now();
        let checked_in_at = match request.status {
            crate::models::RegistrationStatus::Attended => Some(now),
            _ => None,
        };

        let registration = sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (event_id, member_id, status, registered_at, checked_in_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, event_id, member_id, status, registered_at, checked_in_at
            "#
        )
        .bind(request.event_id)
        .bind(request.member_id)
        .bind(request.status)
        .bind(now)
        .bind(checked_in_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Find the registration of a member for an event
    pub async fn find(&self, event_id: Uuid, member_id: Uuid) -> Result<Option<Registration>, ChurchHubError> {
        let registration = sqlx::query_as::<_, Registration>(
            "SELECT id, event_id, member_id, status, registered_at, checked_in_at FROM registrations WHERE event_id = $1 AND member_id = $2"
        )
        .bind(event_id)
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Mark a registration as attended, keeping the first check-in time
    pub async fn mark_attended(&self, registration_id: Uuid) -> Result<Registration, ChurchHubError> {
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            UPDATE registrations
            SET status = 'attended',
                checked_in_at = COALESCE(checked_in_at, $2)
            WHERE id = $1
            RETURNING id, event_id, member_id, status, registered_at, checked_in_at
            "#
        )
        .bind(registration_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Count registrations that were not cancelled
    pub async fn count_for_event(&self, event_id: Uuid) -> Result<i64, ChurchHubError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status <> 'cancelled'"
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Count members checked in to an event
    pub async fn attendance_for_event(&self, event_id: Uuid) -> Result<i64, ChurchHubError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status = 'attended'"
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}
