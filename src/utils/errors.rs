//! Error handling for ChurchHub
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for ChurchHub application
#[derive(Error, Debug)]
pub enum ChurchHubError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User not found: {telegram_id}")]
    UserNotFound { telegram_id: i64 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: Uuid },

    #[error("Registration not found for member {member_id} in event {event_id}")]
    RegistrationNotFound { event_id: Uuid, member_id: Uuid },

    #[error("Cannot resolve event scope: {0}")]
    ScopeUnresolved(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Result type alias for ChurchHub operations
pub type Result<T> = std::result::Result<T, ChurchHubError>;

impl ChurchHubError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            ChurchHubError::Database(_) => false,
            ChurchHubError::Migration(_) => false,
            ChurchHubError::Telegram(_) => true,
            ChurchHubError::Config(_) => false,
            ChurchHubError::PermissionDenied(_) => false,
            ChurchHubError::UserNotFound { .. } => false,
            ChurchHubError::EventNotFound { .. } => false,
            ChurchHubError::RegistrationNotFound { .. } => false,
            ChurchHubError::ScopeUnresolved(_) => false,
            ChurchHubError::Redis(_) => true,
            ChurchHubError::Serialization(_) => false,
            ChurchHubError::Io(_) => true,
            ChurchHubError::InvalidInput(_) => false,
            ChurchHubError::ServiceUnavailable(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ChurchHubError::Database(_) => ErrorSeverity::Critical,
            ChurchHubError::Migration(_) => ErrorSeverity::Critical,
            ChurchHubError::Config(_) => ErrorSeverity::Critical,
            ChurchHubError::PermissionDenied(_) => ErrorSeverity::Warning,
            ChurchHubError::ScopeUnresolved(_) => ErrorSeverity::Warning,
            ChurchHubError::InvalidInput(_) => ErrorSeverity::Info,
            ChurchHubError::EventNotFound { .. } => ErrorSeverity::Info,
            ChurchHubError::RegistrationNotFound { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// Message suitable for showing back to the user in chat
    pub fn user_message(&self) -> String {
        match self {
            ChurchHubError::Database(_) | ChurchHubError::Migration(_) => {
                "Storage is unavailable right now, please try again later.".to_string()
            }
            ChurchHubError::UserNotFound { .. } => {
                "You are not registered yet, send /start first.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
