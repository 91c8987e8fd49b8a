//! Attendance check-in command

use teloxide::{Bot, types::Message, prelude::*};
use uuid::Uuid;
use crate::handlers::actor_for_message;
use crate::services::ServiceFactory;
use crate::utils::errors::{ChurchHubError, Result};
use crate::utils::helpers::parse_uuid;

/// Handle /checkin command
pub async fn handle_check_in(bot: &Bot, msg: &Message, services: &ServiceFactory, args: &str) -> Result<()> {
    let (event_id, member_id) = parse_check_in(args)?;
    let actor = actor_for_message(services, msg).await?;

    let registration = services.event_service.check_in(&actor, event_id, member_id).await?;
    let at = registration
        .checked_in_at
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "now".to_string());

    bot.send_message(msg.chat.id, format!("✅ Member {} checked in ({})", member_id, at)).await?;
    Ok(())
}

/// `<event_id> <member_id>`
pub fn parse_check_in(args: &str) -> Result<(Uuid, Uuid)> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    match parts.as_slice() {
        [event_id, member_id] => Ok((parse_uuid(event_id)?, parse_uuid(member_id)?)),
        _ => Err(ChurchHubError::InvalidInput(
            "Usage: /checkin <event_id> <member_id>".to_string(),
        )),
    }
}
