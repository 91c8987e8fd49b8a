//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod role;
pub mod user;
pub mod hierarchy;
pub mod event;
pub mod registration;

// Re-export commonly used models
pub use role::{Role, RoleSet, HierarchyLevel};
pub use user::{User, CreateUserRequest};
pub use hierarchy::{District, Branch};
pub use event::{
    EventRow, NewEventRow, EventItem, EventDraft, EventView, EventFilter, EventStatus,
    StorageStatus, EventType, Frequency, Visibility, RecurrencePattern,
};
pub use registration::{Registration, RegistrationStatus, RegistrationSummary, CreateRegistrationRequest, EventQuota};
