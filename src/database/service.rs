//! Database service layer
//!
//! This module provides a high-level interface to database operations

use std::time::Instant;
use async_trait::async_trait;
use uuid::Uuid;

use crate::database::{DatabasePool, UserRepository, HierarchyRepository, EventRepository, RegistrationRepository};
use crate::database::store::{EventStore, UserDirectory};
use crate::models::*;
use crate::policy::DistrictLookup;
use crate::utils::errors::Result;
use crate::utils::logging::log_database_operation;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub hierarchy: HierarchyRepository,
    pub events: EventRepository,
    pub registrations: RegistrationRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            hierarchy: HierarchyRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool),
        }
    }

    /// Register a Telegram user, refreshing their names if already known
    pub async fn initialize_user(&self, telegram_id: i64, username: Option<String>, first_name: Option<String>, last_name: Option<String>) -> Result<User> {
        let request = CreateUserRequest {
            telegram_id,
            username,
            first_name,
            last_name,
        };

        self.users.upsert(request).await
    }
}

#[async_trait]
impl EventStore for DatabaseService {
    async fn list_events(&self) -> Result<Vec<EventRow>> {
        let started = Instant::now();
        let result = self.events.list().await;
        log_database_operation("select", "events", started.elapsed().as_millis() as u64, result.is_ok());
        result
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        self.events.find_by_id(id).await
    }

    async fn insert_event(&self, row: NewEventRow, created_by: Option<Uuid>) -> Result<EventRow> {
        let started = Instant::now();
        let result = self.events.create(row, created_by).await;
        log_database_operation("insert", "events", started.elapsed().as_millis() as u64, result.is_ok());
        result
    }

    async fn update_event(&self, id: Uuid, row: NewEventRow) -> Result<EventRow> {
        self.events.update(id, row).await
    }

    async fn delete_event(&self, id: Uuid) -> Result<()> {
        self.events.delete(id).await
    }

    async fn set_quota(&self, event_id: Uuid, capacity: i32) -> Result<EventQuota> {
        self.events.set_quota(event_id, capacity).await
    }

    async fn quota(&self, event_id: Uuid) -> Result<Option<EventQuota>> {
        self.events.get_quota(event_id).await
    }

    async fn registration_count(&self, event_id: Uuid) -> Result<i64> {
        self.registrations.count_for_event(event_id).await
    }

    async fn attendance_count(&self, event_id: Uuid) -> Result<i64> {
        self.registrations.attendance_for_event(event_id).await
    }

    async fn find_registration(&self, event_id: Uuid, member_id: Uuid) -> Result<Option<Registration>> {
        self.registrations.find(event_id, member_id).await
    }

    async fn create_registration(&self, request: CreateRegistrationRequest) -> Result<Registration> {
        self.registrations.create(request).await
    }

    async fn mark_attended(&self, registration_id: Uuid) -> Result<Registration> {
        self.registrations.mark_attended(registration_id).await
    }
}

#[async_trait]
impl UserDirectory for DatabaseService {
    async fn find_user(&self, telegram_id: i64) -> Result<Option<User>> {
        self.users.find_by_telegram_id(telegram_id).await
    }

    async fn user_roles(&self, user_id: Uuid) -> Result<Vec<Role>> {
        self.users.roles(user_id).await
    }

    async fn grant_role(&self, user_id: Uuid, role: Role) -> Result<()> {
        let started = Instant::now();
        let result = self.users.assign_role(user_id, role).await;
        log_database_operation("insert", "user_roles", started.elapsed().as_millis() as u64, result.is_ok());
        result
    }

    async fn set_user_branch(&self, user_id: Uuid, branch_id: Option<Uuid>) -> Result<User> {
        self.users.set_branch(user_id, branch_id).await
    }
}

#[async_trait]
impl DistrictLookup for DatabaseService {
    async fn administered_district(&self, user_id: Uuid) -> Result<Option<Uuid>> {
        self.hierarchy.administered_district(user_id).await
    }
}
