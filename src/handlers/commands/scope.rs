//! Dashboard scope command
//!
//! `/scope branch <id>`, `/scope district <id>`, `/scope clear` and
//! `/scope show`. Only national administrators can change the scope; anyone
//! can see where their next event would be created. `/scope districts` and
//! `/scope branches <district_id>` list what can be selected.

use teloxide::{Bot, types::Message, prelude::*};
use uuid::Uuid;
use crate::handlers::{actor_for_message, sender_id};
use crate::policy::ActorContext;
use crate::services::ServiceFactory;
use crate::utils::errors::{ChurchHubError, Result};
use crate::utils::helpers::parse_uuid;
use crate::utils::logging::log_user_action;

const SCOPE_USAGE: &str = "Usage: /scope branch <id> | district <id> | clear | show | districts | branches <district_id>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeCommand {
    Branch(Uuid),
    District(Uuid),
    Clear,
    Show,
    Districts,
    Branches(Uuid),
}

impl ScopeCommand {
    pub fn parse(args: &str) -> Result<Self> {
        let mut parts = args.split_whitespace();
        let verb = parts.next().map(str::to_lowercase);
        let command = match (verb.as_deref(), parts.next()) {
            (None, _) | (Some("show"), None) => ScopeCommand::Show,
            (Some("clear"), None) => ScopeCommand::Clear,
            (Some("districts"), None) => ScopeCommand::Districts,
            (Some("branches"), Some(id)) => ScopeCommand::Branches(parse_uuid(id)?),
            (Some("branch"), Some(id)) => ScopeCommand::Branch(parse_uuid(id)?),
            (Some("district"), Some(id)) => ScopeCommand::District(parse_uuid(id)?),
            _ => return Err(ChurchHubError::InvalidInput(SCOPE_USAGE.to_string())),
        };
        match parts.next() {
            Some(_) => Err(ChurchHubError::InvalidInput(SCOPE_USAGE.to_string())),
            None => Ok(command),
        }
    }
}

/// Handle /scope command
pub async fn handle_scope(bot: &Bot, msg: &Message, services: &ServiceFactory, args: &str) -> Result<()> {
    let command = ScopeCommand::parse(args)?;
    let actor = actor_for_message(services, msg).await?;
    let dashboard = &services.dashboard_service;
    let hierarchy = &services.database.hierarchy;

    let text = match command {
        ScopeCommand::Branch(branch_id) => {
            let branch = hierarchy
                .find_branch(branch_id)
                .await?
                .ok_or_else(|| ChurchHubError::InvalidInput(format!("unknown branch {}", branch_id)))?;
            if let Some(district_id) = actor.selected_district_id {
                if !hierarchy.branch_in_district(branch_id, district_id).await? {
                    return Err(ChurchHubError::InvalidInput(format!(
                        "branch {} is not part of the selected district",
                        branch.name
                    )));
                }
            }
            dashboard.select_branch(&actor, branch_id).await?;
            format!("📍 Now working in branch {}", branch.name)
        }
        ScopeCommand::District(district_id) => {
            let district = hierarchy
                .find_district(district_id)
                .await?
                .ok_or_else(|| ChurchHubError::InvalidInput(format!("unknown district {}", district_id)))?;
            dashboard.select_district(&actor, district_id).await?;
            format!("📍 Now working in district {}", district.name)
        }
        ScopeCommand::Clear => {
            dashboard.clear(&actor).await?;
            "📍 Back to the national view".to_string()
        }
        ScopeCommand::Show => describe_scope(&actor),
        ScopeCommand::Districts => {
            let districts = hierarchy.list_districts().await?;
            if districts.is_empty() {
                "No districts yet.".to_string()
            } else {
                districts
                    .iter()
                    .map(|district| format!("• {}\n   {}", district.name, district.id))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        ScopeCommand::Branches(district_id) => {
            let branches = hierarchy.list_branches(district_id).await?;
            if branches.is_empty() {
                "No branches in this district.".to_string()
            } else {
                branches
                    .iter()
                    .map(|branch| {
                        let hq = if branch.is_district_hq { " (HQ)" } else { "" };
                        format!("• {}{}\n   {}", branch.name, hq, branch.id)
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
    };

    log_user_action(sender_id(msg)?, "scope", Some(args.trim()));
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

fn describe_scope(actor: &ActorContext) -> String {
    let mut text = format!("Level: {}\n", actor.level());
    if let Some(district_id) = actor.selected_district_id {
        text.push_str(&format!("Selected district: {}\n", district_id));
    }
    if let Some(branch_id) = actor.selected_branch_id {
        text.push_str(&format!("Selected branch: {}\n", branch_id));
    }
    match actor.creation_scope() {
        Ok(scope) => {
            let owner = scope
                .owner_scope_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "nationwide".to_string());
            text.push_str(&format!("New events: {} ({})", scope.event_level, owner));
        }
        Err(e) => text.push_str(&format!("New events: {}", e)),
    }
    text
}
