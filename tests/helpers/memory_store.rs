//! In-memory event store
//!
//! Behaves like the Postgres repositories closely enough for service tests:
//! `update_event` leaves level and owner alone, registrations are unique per
//! member and event, and a quota write can be made to fail. Users and their
//! roles are kept too, for the auth service.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use ChurchHub::database::{EventStore, UserDirectory};
use ChurchHub::models::*;
use ChurchHub::policy::DistrictLookup;
use ChurchHub::{ChurchHubError, Result};

#[derive(Default)]
pub struct MemoryStore {
    pub events: Mutex<HashMap<Uuid, EventRow>>,
    pub quotas: Mutex<HashMap<Uuid, i32>>,
    pub registrations: Mutex<Vec<Registration>>,
    /// head admin user id -> district id
    pub district_heads: Mutex<HashMap<Uuid, Uuid>>,
    pub users: Mutex<HashMap<i64, User>>,
    pub roles: Mutex<HashMap<Uuid, Vec<Role>>>,
    pub fail_quota: AtomicBool,
    pub district_lookups: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_district_head(self, user_id: Uuid, district_id: Uuid) -> Self {
        self.district_heads.lock().unwrap().insert(user_id, district_id);
        self
    }

    pub fn set_district_head(&self, user_id: Uuid, district_id: Uuid) {
        self.district_heads.lock().unwrap().insert(user_id, district_id);
    }

    pub fn failing_quota(self) -> Self {
        self.fail_quota.store(true, Ordering::SeqCst);
        self
    }

    pub fn put(&self, row: EventRow) -> Uuid {
        let id = row.id;
        self.events.lock().unwrap().insert(id, row);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<EventRow> {
        self.events.lock().unwrap().get(&id).cloned()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn stored_quota(&self, id: Uuid) -> Option<i32> {
        self.quotas.lock().unwrap().get(&id).copied()
    }

    /// Add a user with the given roles and default branch
    pub fn add_user(&self, telegram_id: i64, roles: &[Role], branch_id: Option<Uuid>) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            telegram_id,
            username: None,
            first_name: Some(format!("User {}", telegram_id)),
            last_name: None,
            branch_id,
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().insert(telegram_id, user.clone());
        self.roles.lock().unwrap().insert(user.id, roles.to_vec());
        user
    }

    pub fn roles_of(&self, user_id: Uuid) -> Vec<Role> {
        self.roles.lock().unwrap().get(&user_id).cloned().unwrap_or_default()
    }

    pub fn register(&self, event_id: Uuid, member_id: Uuid, status: RegistrationStatus) -> Registration {
        let registration = Registration {
            id: Uuid::new_v4(),
            event_id,
            member_id,
            status,
            registered_at: Utc::now(),
            checked_in_at: None,
        };
        self.registrations.lock().unwrap().push(registration.clone());
        registration
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn list_events(&self) -> Result<Vec<EventRow>> {
        Ok(self.events.lock().unwrap().values().cloned().collect())
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        Ok(self.get(id))
    }

    async fn insert_event(&self, row: NewEventRow, created_by: Option<Uuid>) -> Result<EventRow> {
        let now = Utc::now();
        let stored = EventRow {
            id: Uuid::new_v4(),
            title: row.title,
            description: row.description,
            start_date: row.start_date,
            end_date: Some(row.end_date),
            status: row.status,
            event_level: row.event_level,
            owner_scope_id: row.owner_scope_id,
            requires_registration: row.requires_registration,
            is_paid: row.is_paid,
            registration_fee: row.registration_fee,
            visibility: row.visibility,
            target_audience: row.target_audience,
            location: row.location,
            metadata: row.metadata,
            created_by,
            created_at: now,
            updated_at: now,
        };
        self.put(stored.clone());
        Ok(stored)
    }

    async fn update_event(&self, id: Uuid, row: NewEventRow) -> Result<EventRow> {
        let mut events = self.events.lock().unwrap();
        let stored = events.get_mut(&id).ok_or(ChurchHubError::EventNotFound { event_id: id })?;

        stored.title = row.title;
        stored.description = row.description;
        stored.start_date = row.start_date;
        stored.end_date = Some(row.end_date);
        stored.status = row.status;
        stored.requires_registration = row.requires_registration;
        stored.is_paid = row.is_paid;
        stored.registration_fee = row.registration_fee;
        stored.visibility = row.visibility;
        stored.target_audience = row.target_audience;
        stored.location = row.location;
        stored.metadata = row.metadata;
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn delete_event(&self, id: Uuid) -> Result<()> {
        self.events.lock().unwrap().remove(&id);
        self.quotas.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn set_quota(&self, event_id: Uuid, capacity: i32) -> Result<EventQuota> {
        if self.fail_quota.load(Ordering::SeqCst) {
            return Err(ChurchHubError::ServiceUnavailable("quota table unavailable".to_string()));
        }
        self.quotas.lock().unwrap().insert(event_id, capacity);
        Ok(EventQuota { event_id, capacity })
    }

    async fn quota(&self, event_id: Uuid) -> Result<Option<EventQuota>> {
        Ok(self.stored_quota(event_id).map(|capacity| EventQuota { event_id, capacity }))
    }

    async fn registration_count(&self, event_id: Uuid) -> Result<i64> {
        let count = self
            .registrations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.event_id == event_id && r.status != RegistrationStatus::Cancelled)
            .count();
        Ok(count as i64)
    }

    async fn attendance_count(&self, event_id: Uuid) -> Result<i64> {
        let count = self
            .registrations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.event_id == event_id && r.status == RegistrationStatus::Attended)
            .count();
        Ok(count as i64)
    }

    async fn find_registration(&self, event_id: Uuid, member_id: Uuid) -> Result<Option<Registration>> {
        Ok(self
            .registrations
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.event_id == event_id && r.member_id == member_id)
            .cloned())
    }

    async fn create_registration(&self, request: CreateRegistrationRequest) -> Result<Registration> {
        let mut registrations = self.registrations.lock().unwrap();
        if registrations
            .iter()
            .any(|r| r.event_id == request.event_id && r.member_id == request.member_id)
        {
            return Err(ChurchHubError::InvalidInput("duplicate registration".to_string()));
        }

        let now = Utc::now();
        let registration = Registration {
            id: Uuid::new_v4(),
            event_id: request.event_id,
            member_id: request.member_id,
            status: request.status,
            registered_at: now,
            checked_in_at: (request.status == RegistrationStatus::Attended).then_some(now),
        };
        registrations.push(registration.clone());
        Ok(registration)
    }

    async fn mark_attended(&self, registration_id: Uuid) -> Result<Registration> {
        let mut registrations = self.registrations.lock().unwrap();
        let registration = registrations
            .iter_mut()
            .find(|r| r.id == registration_id)
            .ok_or_else(|| ChurchHubError::InvalidInput("unknown registration".to_string()))?;

        registration.status = RegistrationStatus::Attended;
        registration.checked_in_at.get_or_insert_with(Utc::now);
        Ok(registration.clone())
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_user(&self, telegram_id: i64) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(&telegram_id).cloned())
    }

    async fn user_roles(&self, user_id: Uuid) -> Result<Vec<Role>> {
        Ok(self.roles_of(user_id))
    }

    async fn grant_role(&self, user_id: Uuid, role: Role) -> Result<()> {
        let mut roles = self.roles.lock().unwrap();
        let held = roles.entry(user_id).or_default();
        if !held.contains(&role) {
            held.push(role);
        }
        Ok(())
    }

    async fn set_user_branch(&self, user_id: Uuid, branch_id: Option<Uuid>) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .values_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(|| ChurchHubError::InvalidInput("unknown user".to_string()))?;
        user.branch_id = branch_id;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl DistrictLookup for MemoryStore {
    async fn administered_district(&self, user_id: Uuid) -> Result<Option<Uuid>> {
        self.district_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.district_heads.lock().unwrap().get(&user_id).copied())
    }
}
