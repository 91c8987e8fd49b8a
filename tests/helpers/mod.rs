//! Test helpers module
//!
//! In-memory storage fakes and fixtures shared by the integration tests.

#![allow(dead_code)]

pub mod memory_kv;
pub mod memory_store;

pub use memory_kv::MemoryKv;
pub use memory_store::MemoryStore;

use std::sync::Arc;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use ChurchHub::config::Settings;
use ChurchHub::models::*;
use ChurchHub::policy::ActorContext;
use ChurchHub::services::{AuthService, DashboardService, EventService};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(hour, minute, 0).unwrap()
}

/// Stored event with the given tier and owner
pub fn event_row(title: &str, level: HierarchyLevel, owner: Option<Uuid>, start: NaiveDateTime) -> EventRow {
    EventRow {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        start_date: start,
        end_date: None,
        status: StorageStatus::Published,
        event_level: level,
        owner_scope_id: owner,
        requires_registration: false,
        is_paid: false,
        registration_fee: None,
        visibility: Visibility::Public,
        target_audience: None,
        location: None,
        metadata: json!({ "type": "Service", "frequency": "One-time" }),
        created_by: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn national_admin() -> ActorContext {
    ActorContext::new(Uuid::new_v4(), [Role::SuperAdmin])
}

pub fn district_admin(district_id: Uuid) -> ActorContext {
    ActorContext::new(Uuid::new_v4(), [Role::DistrictAdmin]).with_administered_district(district_id)
}

pub fn branch_admin(branch_id: Uuid) -> ActorContext {
    ActorContext::new(Uuid::new_v4(), [Role::Admin]).with_branch(branch_id)
}

pub fn pastor(branch_id: Uuid) -> ActorContext {
    ActorContext::new(Uuid::new_v4(), [Role::Pastor]).with_branch(branch_id)
}

pub fn member(branch_id: Uuid) -> ActorContext {
    ActorContext::new(Uuid::new_v4(), [Role::Member]).with_branch(branch_id)
}

pub fn event_service(store: Arc<MemoryStore>) -> EventService<MemoryStore> {
    EventService::new(store, Settings::default().events)
}

pub fn auth_service(store: Arc<MemoryStore>, kv: Arc<MemoryKv>, admin_ids: &[i64]) -> AuthService<MemoryStore> {
    let mut settings = Settings::default();
    settings.bot.admin_ids = admin_ids.to_vec();
    AuthService::new(store, DashboardService::new(kv, 60), settings)
}
