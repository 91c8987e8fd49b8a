//! Command handlers module
//!
//! This module contains handlers for all bot commands like /start, /help, etc.

pub mod start;
pub mod help;
pub mod events;
pub mod scope;
pub mod checkin;
pub mod members;

use teloxide::{Bot, types::Message, utils::command::BotCommands};
use crate::utils::errors::{ChurchHubError, Result};
use crate::services::ServiceFactory;
use super::{log_failure, report_error};

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "ChurchHub commands:")]
pub enum Command {
    #[command(description = "Register and show your role")]
    Start,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "List events: [status=Open] [type=Youth] [level=BRANCH] [text]")]
    Events(String),
    #[command(description = "Create an event: Title | YYYY-MM-DD | HH:MM [| type | frequency | capacity]")]
    NewEvent(String),
    #[command(description = "Edit an event: <event_id> | Title | YYYY-MM-DD | HH:MM [| type | frequency]")]
    EditEvent(String),
    #[command(description = "Change status: <event_id> [Status]")]
    Status(String),
    #[command(description = "Delete an event: <event_id>")]
    DeleteEvent(String),
    #[command(description = "Dashboard scope: branch <id> | district <id> | clear | show | districts | branches <district_id>")]
    Scope(String),
    #[command(description = "Check a member in: <event_id> <member_id>")]
    CheckIn(String),
    #[command(description = "Count registrations: <event_id>")]
    Count(String),
    #[command(description = "Upcoming dates of an event: <event_id> [days]")]
    Occurrences(String),
    #[command(description = "Grant a role: <telegram_id> <role>")]
    Grant(String),
    #[command(description = "Set a member's branch: <telegram_id> <branch_id|none>")]
    SetBranch(String),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Events(_) => "events",
            Command::NewEvent(_) => "newevent",
            Command::EditEvent(_) => "editevent",
            Command::Status(_) => "status",
            Command::DeleteEvent(_) => "deleteevent",
            Command::Scope(_) => "scope",
            Command::CheckIn(_) => "checkin",
            Command::Count(_) => "count",
            Command::Occurrences(_) => "occurrences",
            Command::Grant(_) => "grant",
            Command::SetBranch(_) => "setbranch",
        }
    }
}

/// Main command dispatcher.
///
/// Service errors are sent back to the chat and logged; only a failure to
/// talk to Telegram at all is returned.
pub async fn handle_command(bot: Bot, msg: Message, cmd: Command, services: ServiceFactory) -> Result<()> {
    let name = cmd.name();
    let chat_id = msg.chat.id;
    let telegram_id = msg.from.as_ref().map(|user| user.id.0 as i64).unwrap_or_default();

    let result = match cmd {
        Command::Start => start::handle_start(&bot, &msg, &services).await,
        Command::Help => help::handle_help(&bot, &msg).await,
        Command::Events(args) => events::handle_events_list(&bot, &msg, &services, &args).await,
        Command::NewEvent(args) => events::handle_new_event(&bot, &msg, &services, &args).await,
        Command::EditEvent(args) => events::handle_edit_event(&bot, &msg, &services, &args).await,
        Command::Status(args) => events::handle_status(&bot, &msg, &services, &args).await,
        Command::DeleteEvent(args) => events::handle_delete_event(&bot, &msg, &services, &args).await,
        Command::Scope(args) => scope::handle_scope(&bot, &msg, &services, &args).await,
        Command::CheckIn(args) => checkin::handle_check_in(&bot, &msg, &services, &args).await,
        Command::Count(args) => events::handle_count(&bot, &msg, &services, &args).await,
        Command::Occurrences(args) => events::handle_occurrences(&bot, &msg, &services, &args).await,
        Command::Grant(args) => members::handle_grant(&bot, &msg, &services, &args).await,
        Command::SetBranch(args) => members::handle_set_branch(&bot, &msg, &services, &args).await,
    };

    if let Err(e) = result {
        log_failure(telegram_id, name, &e);
        if matches!(e, ChurchHubError::Telegram(_)) {
            return Err(e);
        }
        report_error(&bot, chat_id, &e).await;
    }

    Ok(())
}
