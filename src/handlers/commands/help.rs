//! Help command handler

use teloxide::{Bot, types::Message, prelude::*, utils::command::BotCommands};
use crate::utils::errors::Result;
use super::Command;

/// Handle /help command
pub async fn handle_help(bot: &Bot, msg: &Message) -> Result<()> {
    let help_text = format!(
        "⛪ ChurchHub Help\n\n{}\n\n\
        Statuses: Open, Upcoming, Active, Ended, Cancelled.\n\
        National administrators pick a branch or district with /scope before \
        creating events for it.",
        Command::descriptions()
    );

    bot.send_message(msg.chat.id, help_text).await?;
    Ok(())
}
