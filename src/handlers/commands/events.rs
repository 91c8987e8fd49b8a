//! Event command handlers

use teloxide::{Bot, types::{Message, InlineKeyboardMarkup, InlineKeyboardButton}, prelude::*};
use tracing::{debug, info};
use chrono::Utc;
use uuid::Uuid;
use crate::handlers::actor_for_message;
use crate::handlers::callbacks::{delete_confirmation_keyboard, status_keyboard, CallbackAction};
use crate::models::event::{EventDraft, EventFilter, EventStatus, EventType, Frequency};
use crate::models::registration::RegistrationSummary;
use crate::models::role::HierarchyLevel;
use crate::services::ServiceFactory;
use crate::utils::errors::{ChurchHubError, Result};
use crate::utils::helpers::{format_event_line, parse_date, parse_uuid, split_fields, truncate_text};

/// Keeps `/occurrences` replies under Telegram's message size limit
const MAX_OCCURRENCES_LISTED: usize = 52;

const NEW_EVENT_USAGE: &str = "Usage: /newevent Title | YYYY-MM-DD | HH:MM [| type | frequency | capacity]";

pub(crate) const EDIT_EVENT_USAGE: &str = "Usage: /editevent <event_id> | Title | YYYY-MM-DD | HH:MM [| type | frequency]";

/// Handle /events command - list events with edit and delete buttons on manageable ones
pub async fn handle_events_list(bot: &Bot, msg: &Message, services: &ServiceFactory, args: &str) -> Result<()> {
    let actor = actor_for_message(services, msg).await?;
    let filter = parse_filter(args)?;
    debug!(user_id = %actor.user_id, filter = ?filter, "Processing /events command");

    let views = services.event_service.list_events(&actor, &filter).await?;
    if views.is_empty() {
        bot.send_message(msg.chat.id, "No events found.").await?;
        return Ok(());
    }

    let limit = services.settings.events.list_limit;
    let shown = &views[..views.len().min(limit)];

    let mut text = format!("📅 {} event(s)", views.len());
    if views.len() > limit {
        text.push_str(&format!(", showing the first {}", limit));
    }
    text.push_str("\n\n");
    text.push_str(&shown.iter().map(format_event_line).collect::<Vec<_>>().join("\n"));

    let rows: Vec<Vec<InlineKeyboardButton>> = shown
        .iter()
        .filter(|view| view.can_edit)
        .filter_map(|view| view.item.id.map(|id| (id, &view.item.title)))
        .map(|(id, title)| {
            let title = truncate_text(title, 20);
            vec![
                InlineKeyboardButton::callback(format!("✏️ {}", title), CallbackAction::Edit(id).data()),
                InlineKeyboardButton::callback(format!("🗑 {}", title), CallbackAction::AskDelete(id).data()),
            ]
        })
        .collect();

    if rows.is_empty() {
        bot.send_message(msg.chat.id, text).await?;
    } else {
        bot.send_message(msg.chat.id, text)
            .reply_markup(InlineKeyboardMarkup::new(rows))
            .await?;
    }
    Ok(())
}

/// Handle /newevent command
pub async fn handle_new_event(bot: &Bot, msg: &Message, services: &ServiceFactory, args: &str) -> Result<()> {
    let actor = actor_for_message(services, msg).await?;
    let (draft, capacity) = parse_new_event(args)?;

    let view = services.event_service.create_event(&actor, draft, capacity).await?;
    let item = &view.item;
    info!(user_id = %actor.user_id, event_id = ?item.id, level = %item.event_level, "Event created from chat");

    let mut text = format!(
        "✅ Created \"{}\" on {} at {} ({} event)\nid: {}",
        item.title,
        item.date.format("%Y-%m-%d"),
        item.time,
        item.event_level,
        item.id.map(|id| id.to_string()).unwrap_or_default()
    );
    if let Some(capacity) = capacity {
        text.push_str(&format!("\ncapacity: {}", capacity));
    }
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

/// Handle /editevent command
pub async fn handle_edit_event(bot: &Bot, msg: &Message, services: &ServiceFactory, args: &str) -> Result<()> {
    let actor = actor_for_message(services, msg).await?;
    let (event_id, draft) = parse_edit_event(args)?;

    let view = services.event_service.update_event(&actor, event_id, draft).await?;
    let item = &view.item;
    info!(user_id = %actor.user_id, event_id = %event_id, "Event edited from chat");

    bot.send_message(
        msg.chat.id,
        format!(
            "✅ Updated \"{}\" on {} at {} ({}, {})",
            item.title,
            item.date.format("%Y-%m-%d"),
            item.time,
            item.event_type,
            item.status
        ),
    )
    .await?;
    Ok(())
}

/// Handle /status command. Without a status a keyboard of statuses is shown.
pub async fn handle_status(bot: &Bot, msg: &Message, services: &ServiceFactory, args: &str) -> Result<()> {
    let actor = actor_for_message(services, msg).await?;
    let (event_id, status) = parse_status_args(args)?;

    match status {
        Some(status) => {
            let view = services.event_service.set_status(&actor, event_id, status).await?;
            bot.send_message(
                msg.chat.id,
                format!("✅ \"{}\" is now {}", view.item.title, view.item.status),
            )
            .await?;
        }
        None => {
            let view = services.event_service.get_event(&actor, event_id).await?;
            if !view.can_edit {
                return Err(ChurchHubError::PermissionDenied("you cannot manage this event".to_string()));
            }
            bot.send_message(
                msg.chat.id,
                format!("\"{}\" is {}. Choose a new status:", view.item.title, view.item.status),
            )
            .reply_markup(status_keyboard(event_id))
            .await?;
        }
    }
    Ok(())
}

/// Handle /deleteevent command by asking for confirmation
pub async fn handle_delete_event(bot: &Bot, msg: &Message, services: &ServiceFactory, args: &str) -> Result<()> {
    let actor = actor_for_message(services, msg).await?;
    let event_id = parse_event_id(args)?;

    let view = services.event_service.get_event(&actor, event_id).await?;
    if !view.can_edit {
        return Err(ChurchHubError::PermissionDenied("you cannot manage this event".to_string()));
    }

    bot.send_message(
        msg.chat.id,
        format!("Delete \"{}\" on {}?", view.item.title, view.item.date.format("%Y-%m-%d")),
    )
    .reply_markup(delete_confirmation_keyboard(event_id))
    .await?;
    Ok(())
}

/// Handle /count command
pub async fn handle_count(bot: &Bot, msg: &Message, services: &ServiceFactory, args: &str) -> Result<()> {
    let event_id = parse_event_id(args)?;
    let summary = services.event_service.registration_summary(event_id).await?;

    bot.send_message(msg.chat.id, describe_summary(&summary)).await?;
    Ok(())
}

fn describe_summary(summary: &RegistrationSummary) -> String {
    let registered = match summary.capacity {
        Some(capacity) => format!("{} / {}", summary.registered, capacity),
        None => summary.registered.to_string(),
    };
    let mut text = format!("👥 {} registered, {} checked in", registered, summary.checked_in);
    if let Some(0) = summary.remaining() {
        text.push_str("\nThe event is full.");
    }
    text
}

/// Handle /occurrences command
pub async fn handle_occurrences(bot: &Bot, msg: &Message, services: &ServiceFactory, args: &str) -> Result<()> {
    let mut parts = args.split_whitespace();
    let event_id = parse_uuid(parts.next().ok_or_else(|| {
        ChurchHubError::InvalidInput("Usage: /occurrences <event_id> [days]".to_string())
    })?)?;
    let days = parts
        .next()
        .map(|days| {
            days.parse::<u32>()
                .map_err(|_| ChurchHubError::InvalidInput(format!("'{}' is not a number of days", days)))
        })
        .transpose()?;

    let today = Utc::now().date_naive();
    let (item, dates) = services.event_service.upcoming_occurrences(event_id, today, days).await?;

    let text = if dates.is_empty() {
        format!("\"{}\" has no upcoming dates.", item.title)
    } else {
        let listed: Vec<String> = dates
            .iter()
            .take(MAX_OCCURRENCES_LISTED)
            .map(|date| format!("• {} {}", date.format("%a %Y-%m-%d"), item.time))
            .collect();
        format!("🔁 \"{}\" ({})\n{}", item.title, item.frequency, listed.join("\n"))
    };
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

pub(crate) fn parse_event_id(args: &str) -> Result<Uuid> {
    let first = args
        .split_whitespace()
        .next()
        .ok_or_else(|| ChurchHubError::InvalidInput("an event id is required".to_string()))?;
    parse_uuid(first)
}

/// `Title | YYYY-MM-DD | HH:MM | type | frequency | capacity`, trailing fields optional
pub fn parse_new_event(args: &str) -> Result<(EventDraft, Option<i32>)> {
    let fields = split_fields(args);
    let field = |index: usize| fields.get(index).map(String::as_str).filter(|value| !value.is_empty());

    let (title, date) = match (field(0), field(1)) {
        (Some(title), Some(date)) => (title, parse_date(date)?),
        _ => return Err(ChurchHubError::InvalidInput(NEW_EVENT_USAGE.to_string())),
    };

    let mut draft = EventDraft::new(title, date);
    if let Some(time) = field(2) {
        draft = draft.with_time(time);
    }
    if let Some(event_type) = field(3) {
        draft = draft.with_type(event_type.parse::<EventType>().map_err(ChurchHubError::InvalidInput)?);
    }
    if let Some(frequency) = field(4) {
        draft = draft.with_frequency(frequency.parse::<Frequency>().map_err(ChurchHubError::InvalidInput)?);
    }
    let capacity = field(5)
        .map(|capacity| {
            capacity
                .parse::<i32>()
                .map_err(|_| ChurchHubError::InvalidInput(format!("'{}' is not a capacity", capacity)))
        })
        .transpose()?;

    Ok((draft, capacity))
}

/// `<event_id> | Title | YYYY-MM-DD | HH:MM | type | frequency`; the quota is
/// not editable here
pub fn parse_edit_event(args: &str) -> Result<(Uuid, EventDraft)> {
    let (id, rest) = args
        .split_once('|')
        .ok_or_else(|| ChurchHubError::InvalidInput(EDIT_EVENT_USAGE.to_string()))?;
    let event_id = parse_uuid(id)?;

    let (draft, capacity) = parse_new_event(rest)
        .map_err(|_| ChurchHubError::InvalidInput(EDIT_EVENT_USAGE.to_string()))?;
    if capacity.is_some() {
        return Err(ChurchHubError::InvalidInput(
            "the capacity of an existing event cannot be changed".to_string(),
        ));
    }
    Ok((event_id, draft))
}

/// `<event_id> [Status]`
pub fn parse_status_args(args: &str) -> Result<(Uuid, Option<EventStatus>)> {
    let mut parts = args.split_whitespace();
    let event_id = parse_uuid(parts.next().ok_or_else(|| {
        ChurchHubError::InvalidInput("Usage: /status <event_id> [Status]".to_string())
    })?)?;
    let status = parts
        .next()
        .map(|status| status.parse::<EventStatus>().map_err(ChurchHubError::InvalidInput))
        .transpose()?;
    Ok((event_id, status))
}

/// `status=Open type=Youth level=BRANCH free text`
pub fn parse_filter(args: &str) -> Result<EventFilter> {
    let mut filter = EventFilter::default();
    let mut search = Vec::new();

    for token in args.split_whitespace() {
        match token.split_once('=') {
            Some(("status", value)) => {
                filter.status = Some(value.parse::<EventStatus>().map_err(ChurchHubError::InvalidInput)?);
            }
            Some(("type", value)) => {
                filter.event_type = Some(value.parse::<EventType>().map_err(ChurchHubError::InvalidInput)?);
            }
            Some(("level", value)) => {
                filter.level = Some(value.parse::<HierarchyLevel>().map_err(ChurchHubError::InvalidInput)?);
            }
            _ => search.push(token),
        }
    }

    if !search.is_empty() {
        filter.search = Some(search.join(" "));
    }
    Ok(filter)
}
