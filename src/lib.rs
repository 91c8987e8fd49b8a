//! ChurchHub Telegram Bot
//!
//! Event administration for a church organised as a national office,
//! districts and branches. This library provides the scope and access policy
//! deciding who may create and manage events at which tier, the mapping
//! between stored event rows and the records administrators work with,
//! recurrence expansion, and the Telegram front end built on top of them.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod database;
pub mod policy;
pub mod mapper;
pub mod recurrence;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ChurchHubError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
