//! Member administration commands
//!
//! `/grant <telegram_id> <role>` and `/setbranch <telegram_id> <branch_id|none>`.
//! The target must have sent /start once so a user record exists.

use teloxide::{Bot, types::Message, prelude::*};
use uuid::Uuid;
use crate::handlers::{actor_for_message, sender_id};
use crate::models::role::Role;
use crate::services::ServiceFactory;
use crate::utils::errors::{ChurchHubError, Result};
use crate::utils::helpers::parse_uuid;
use crate::utils::logging::log_user_action;

const GRANT_USAGE: &str = "Usage: /grant <telegram_id> <super_admin|district_admin|admin|pastor|member>";
const SET_BRANCH_USAGE: &str = "Usage: /setbranch <telegram_id> <branch_id|none>";

/// Handle /grant command
pub async fn handle_grant(bot: &Bot, msg: &Message, services: &ServiceFactory, args: &str) -> Result<()> {
    let (telegram_id, role) = parse_grant(args)?;
    let actor = actor_for_message(services, msg).await?;

    let user = services.auth_service.grant_role(&actor, telegram_id, role).await?;
    log_user_action(sender_id(msg)?, "grant", Some(args.trim()));

    let mut text = format!("✅ {} is now {}", user.display_name(), role);
    if role == Role::DistrictAdmin {
        text.push_str("\nThey act for the district they are recorded as head of.");
    }
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

/// Handle /setbranch command
pub async fn handle_set_branch(bot: &Bot, msg: &Message, services: &ServiceFactory, args: &str) -> Result<()> {
    let (telegram_id, branch_id) = parse_set_branch(args)?;
    let actor = actor_for_message(services, msg).await?;

    let branch_name = match branch_id {
        Some(branch_id) => Some(
            services
                .database
                .hierarchy
                .find_branch(branch_id)
                .await?
                .ok_or_else(|| ChurchHubError::InvalidInput(format!("unknown branch {}", branch_id)))?
                .name,
        ),
        None => None,
    };

    let user = services.auth_service.assign_branch(&actor, telegram_id, branch_id).await?;
    log_user_action(sender_id(msg)?, "setbranch", Some(args.trim()));

    let text = match branch_name {
        Some(name) => format!("✅ {} now belongs to branch {}", user.display_name(), name),
        None => format!("✅ {} no longer has a default branch", user.display_name()),
    };
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

fn parse_telegram_id(text: &str) -> Result<i64> {
    text.parse::<i64>()
        .map_err(|_| ChurchHubError::InvalidInput(format!("'{}' is not a Telegram id", text)))
}

pub fn parse_grant(args: &str) -> Result<(i64, Role)> {
    match args.split_whitespace().collect::<Vec<_>>().as_slice() {
        [telegram_id, role] => {
            let role = role.parse::<Role>().map_err(ChurchHubError::InvalidInput)?;
            Ok((parse_telegram_id(telegram_id)?, role))
        }
        _ => Err(ChurchHubError::InvalidInput(GRANT_USAGE.to_string())),
    }
}

pub fn parse_set_branch(args: &str) -> Result<(i64, Option<Uuid>)> {
    match args.split_whitespace().collect::<Vec<_>>().as_slice() {
        [telegram_id, branch] => {
            let branch_id = match branch.to_lowercase().as_str() {
                "none" | "-" => None,
                _ => Some(parse_uuid(branch)?),
            };
            Ok((parse_telegram_id(telegram_id)?, branch_id))
        }
        _ => Err(ChurchHubError::InvalidInput(SET_BRANCH_USAGE.to_string())),
    }
}
