//! Callback query handlers module
//!
//! This module contains handlers for the inline keyboard buttons attached to
//! event listings: editing, delete with confirmation and status changes.

use std::str::FromStr;
use teloxide::{Bot, types::{CallbackQuery, ChatId, InlineKeyboardButton, InlineKeyboardMarkup}, prelude::*};
use tracing::{debug, warn};
use uuid::Uuid;
use crate::models::event::EventStatus;
use crate::services::ServiceFactory;
use crate::utils::errors::{ChurchHubError, Result};
use super::log_failure;

/// Action encoded in a button's callback data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// `event_edit:<id>`
    Edit(Uuid),
    /// `event_delete:<id>`
    AskDelete(Uuid),
    /// `event_delete_confirm:<id>`
    ConfirmDelete(Uuid),
    /// `event_status:<id>:<Status>`
    SetStatus(Uuid, EventStatus),
}

impl CallbackAction {
    pub fn data(&self) -> String {
        match self {
            CallbackAction::Edit(id) => format!("event_edit:{}", id),
            CallbackAction::AskDelete(id) => format!("event_delete:{}", id),
            CallbackAction::ConfirmDelete(id) => format!("event_delete_confirm:{}", id),
            CallbackAction::SetStatus(id, status) => format!("event_status:{}:{}", id, status),
        }
    }
}

impl FromStr for CallbackAction {
    type Err = ChurchHubError;

    fn from_str(data: &str) -> Result<Self> {
        let parts: Vec<&str> = data.split(':').collect();
        let invalid = || ChurchHubError::InvalidInput(format!("unknown button: {}", data));
        let id = |text: &str| Uuid::parse_str(text).map_err(|_| invalid());

        match parts.as_slice() {
            ["event_edit", event_id] => Ok(CallbackAction::Edit(id(*event_id)?)),
            ["event_delete", event_id] => Ok(CallbackAction::AskDelete(id(*event_id)?)),
            ["event_delete_confirm", event_id] => Ok(CallbackAction::ConfirmDelete(id(*event_id)?)),
            ["event_status", event_id, status] => {
                let status = status.parse::<EventStatus>().map_err(|_| invalid())?;
                Ok(CallbackAction::SetStatus(id(*event_id)?, status))
            }
            _ => Err(invalid()),
        }
    }
}

/// Single "yes, delete" button
pub fn delete_confirmation_keyboard(event_id: Uuid) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "✅ Yes, delete",
        CallbackAction::ConfirmDelete(event_id).data(),
    )]])
}

/// One button per status
pub fn status_keyboard(event_id: Uuid) -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = EventStatus::ALL
        .iter()
        .map(|status| {
            InlineKeyboardButton::callback(status.as_str(), CallbackAction::SetStatus(event_id, *status).data())
        })
        .collect();
    InlineKeyboardMarkup::new(buttons.chunks(3).map(|row| row.to_vec()))
}

/// Main callback query dispatcher.
///
/// The query is always answered; failures show up as an alert on the
/// pressed button and leave the event untouched.
pub async fn handle_callback_query(bot: Bot, query: CallbackQuery, services: ServiceFactory) -> Result<()> {
    let telegram_id = query.from.id.0 as i64;
    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(telegram_id));

    debug!(telegram_id = telegram_id, chat_id = ?chat_id, callback_data = ?query.data, "Processing callback query");

    let outcome = match query.data.as_deref() {
        Some(data) => perform(&bot, chat_id, telegram_id, data, &services).await,
        None => Err(ChurchHubError::InvalidInput("empty button".to_string())),
    };

    match outcome {
        Ok(toast) => {
            bot.answer_callback_query(query.id.clone()).text(toast).await?;
        }
        Err(e) => {
            log_failure(telegram_id, "callback", &e);
            if let Err(send_error) = bot
                .answer_callback_query(query.id.clone())
                .text(e.user_message())
                .show_alert(true)
                .await
            {
                warn!(callback_id = ?query.id, error = %send_error, "Failed to answer callback query");
            }
        }
    }

    Ok(())
}

async fn perform(bot: &Bot, chat_id: ChatId, telegram_id: i64, data: &str, services: &ServiceFactory) -> Result<String> {
    let action: CallbackAction = data.parse()?;
    let actor = services.auth_service.actor_for(telegram_id).await?;
    let events = &services.event_service;

    match action {
        CallbackAction::Edit(event_id) => {
            let view = events.get_event(&actor, event_id).await?;
            if !view.can_edit {
                return Err(ChurchHubError::PermissionDenied("you cannot manage this event".to_string()));
            }
            let item = &view.item;
            let text = format!(
                "\"{}\" is {}. Pick a new status, or change the details with\n/editevent {} | {} | {} | {} | {} | {}",
                item.title,
                item.status,
                event_id,
                item.title,
                item.date.format("%Y-%m-%d"),
                item.time,
                item.event_type,
                item.frequency
            );
            bot.send_message(chat_id, text)
                .reply_markup(status_keyboard(event_id))
                .await?;
            Ok("Editing".to_string())
        }
        CallbackAction::AskDelete(event_id) => {
            let view = events.get_event(&actor, event_id).await?;
            if !view.can_edit {
                return Err(ChurchHubError::PermissionDenied("you cannot manage this event".to_string()));
            }
            bot.send_message(chat_id, format!("Delete \"{}\"? This cannot be undone.", view.item.title))
                .reply_markup(delete_confirmation_keyboard(event_id))
                .await?;
            Ok("Confirm below".to_string())
        }
        CallbackAction::ConfirmDelete(event_id) => {
            events.delete_event(&actor, event_id).await?;
            bot.send_message(chat_id, "🗑 Event deleted").await?;
            Ok("Deleted".to_string())
        }
        CallbackAction::SetStatus(event_id, status) => {
            let view = events.set_status(&actor, event_id, status).await?;
            bot.send_message(chat_id, format!("✅ \"{}\" is now {}", view.item.title, view.item.status))
                .await?;
            Ok(format!("Status: {}", status))
        }
    }
}
