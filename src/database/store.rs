//! Data-access seams
//!
//! Services talk to storage through [`EventStore`] and [`UserDirectory`] so
//! they can run against the Postgres-backed
//! [`DatabaseService`](super::DatabaseService) or an in-memory store in tests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::event::{EventRow, NewEventRow};
use crate::models::registration::{CreateRegistrationRequest, EventQuota, Registration};
use crate::models::role::Role;
use crate::models::user::User;
use crate::utils::errors::Result;

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn list_events(&self) -> Result<Vec<EventRow>>;

    async fn find_event(&self, id: Uuid) -> Result<Option<EventRow>>;

    async fn insert_event(&self, row: NewEventRow, created_by: Option<Uuid>) -> Result<EventRow>;

    /// Overwrite the writable columns; `event_level` and `owner_scope_id` are ignored
    async fn update_event(&self, id: Uuid, row: NewEventRow) -> Result<EventRow>;

    async fn delete_event(&self, id: Uuid) -> Result<()>;

    async fn set_quota(&self, event_id: Uuid, capacity: i32) -> Result<EventQuota>;

    async fn quota(&self, event_id: Uuid) -> Result<Option<EventQuota>>;

    /// Registrations that were not cancelled
    async fn registration_count(&self, event_id: Uuid) -> Result<i64>;

    /// Registrations marked attended
    async fn attendance_count(&self, event_id: Uuid) -> Result<i64>;

    async fn find_registration(&self, event_id: Uuid, member_id: Uuid) -> Result<Option<Registration>>;

    async fn create_registration(&self, request: CreateRegistrationRequest) -> Result<Registration>;

    async fn mark_attended(&self, registration_id: Uuid) -> Result<Registration>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, telegram_id: i64) -> Result<Option<User>>;

    async fn user_roles(&self, user_id: Uuid) -> Result<Vec<Role>>;

    /// Granting a role the user already holds is a no-op
    async fn grant_role(&self, user_id: Uuid, role: Role) -> Result<()>;

    async fn set_user_branch(&self, user_id: Uuid, branch_id: Option<Uuid>) -> Result<User>;
}
