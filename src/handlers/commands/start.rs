//! Start command handler
//!
//! Registers the Telegram user and tells them at which tier they work.

use teloxide::{Bot, types::Message, prelude::*};
use tracing::debug;
use crate::models::User;
use crate::policy::ActorContext;
use crate::services::ServiceFactory;
use crate::utils::errors::{ChurchHubError, Result};
use crate::utils::logging::log_user_action;

/// Handle /start command
pub async fn handle_start(bot: &Bot, msg: &Message, services: &ServiceFactory) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        ChurchHubError::InvalidInput("No user in message".to_string())
    })?;

    let telegram_id = user.id.0 as i64;
    debug!(telegram_id = telegram_id, chat_id = ?msg.chat.id, "Processing /start command");

    let record = services
        .database
        .initialize_user(
            telegram_id,
            user.username.clone(),
            Some(user.first_name.clone()),
            user.last_name.clone(),
        )
        .await?;
    log_user_action(telegram_id, "start", None);

    let actor = services.auth_service.actor_for(telegram_id).await?;
    bot.send_message(msg.chat.id, welcome_text(&record, &actor)).await?;
    Ok(())
}

fn welcome_text(user: &User, actor: &ActorContext) -> String {
    let mut roles: Vec<&str> = actor.roles.iter().map(|role| role.as_str()).collect();
    roles.sort_unstable();

    let mut text = format!("👋 Welcome, {}!\n\n", user.display_name());
    if actor.is_manager() {
        text.push_str(&format!(
            "You manage events at {} level (roles: {}).\nSend /help to see what you can do.",
            actor.level(),
            roles.join(", ")
        ));
    } else {
        text.push_str(
            "You are registered. Event management needs an administrator or pastor role; \
             ask your branch office to assign one.",
        );
    }
    text
}
