//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::NaiveDate;
use uuid::Uuid;
use crate::models::event::EventView;
use crate::utils::errors::{ChurchHubError, Result};

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse an identifier typed by a user
pub fn parse_uuid(text: &str) -> Result<Uuid> {
    Uuid::parse_str(text.trim())
        .map_err(|_| ChurchHubError::InvalidInput(format!("'{}' is not a valid id", text.trim())))
}

/// Parse a `YYYY-MM-DD` date typed by a user
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| ChurchHubError::InvalidInput(format!("'{}' is not a date (YYYY-MM-DD)", text.trim())))
}

/// Split `a | b | c` command arguments, trimming each field
pub fn split_fields(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split('|').map(normalize_whitespace).collect()
}

/// One line per event for list replies
pub fn format_event_line(view: &EventView) -> String {
    let item = &view.item;
    let marker = if view.can_edit { "✏️" } else { "•" };
    let id = item.id.map(|id| id.to_string()).unwrap_or_default();
    format!(
        "{} {} {} [{}] {} / {} / {}\n   {}",
        marker,
        item.date.format("%Y-%m-%d"),
        item.time,
        item.status,
        truncate_text(&item.title, 48),
        item.event_type,
        item.event_level,
        id
    )
}
