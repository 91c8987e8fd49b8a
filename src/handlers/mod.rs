//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands
//! - Callback handlers for inline keyboard interactions

pub mod commands;
pub mod callbacks;

// Re-export commonly used handler functions
pub use commands::{Command, handle_command};
pub use callbacks::{CallbackAction, handle_callback_query};

use teloxide::{Bot, types::{ChatId, Message}, prelude::*};
use tracing::{debug, error, warn};
use crate::utils::logging::log_api_error;
use crate::policy::ActorContext;
use crate::services::ServiceFactory;
use crate::utils::errors::{ChurchHubError, ErrorSeverity, Result};

/// Telegram id of whoever sent the message
pub(crate) fn sender_id(msg: &Message) -> Result<i64> {
    msg.from
        .as_ref()
        .map(|user| user.id.0 as i64)
        .ok_or_else(|| ChurchHubError::InvalidInput("No user in message".to_string()))
}

/// Acting context of the message sender
pub(crate) async fn actor_for_message(services: &ServiceFactory, msg: &Message) -> Result<ActorContext> {
    let telegram_id = sender_id(msg)?;
    services.auth_service.actor_for(telegram_id).await
}

/// Log a failed action by severity
pub(crate) fn log_failure(telegram_id: i64, action: &str, error: &ChurchHubError) {
    match error.severity() {
        ErrorSeverity::Info => debug!(telegram_id = telegram_id, action = action, error = %error, "Action rejected"),
        ErrorSeverity::Warning => warn!(telegram_id = telegram_id, action = action, error = %error, "Action refused"),
        _ => error!(telegram_id = telegram_id, action = action, error = %error, "Action failed"),
    }
}

/// Reply with the error instead of failing the update
pub(crate) async fn report_error(bot: &Bot, chat_id: ChatId, error: &ChurchHubError) {
    let text = format!("⚠️ {}", error.user_message());
    if let Err(e) = bot.send_message(chat_id, text).await {
        log_api_error("telegram", &e.to_string(), Some("send_message"));
    }
}
