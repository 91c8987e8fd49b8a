//! Event service implementation
//!
//! Orchestrates event administration: listing with edit rights, creation
//! within the actor's scope, edits, status changes, deletion and attendance
//! check-in. Every mutating call goes through the same edit-rights gate.

use std::sync::Arc;
use chrono::{Days, NaiveDate};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::config::settings::EventsConfig;
use crate::database::EventStore;
use crate::mapper::{collapse_status, to_domain, to_storage};
use crate::models::*;
use crate::policy::{resolve_actor_scope, ActorContext, CreationScope, DistrictLookup};
use crate::utils::errors::{ChurchHubError, Result};
use crate::utils::logging::{log_access_denied, log_event_action, log_scope_resolution};

/// Start time used when a draft has none
const DEFAULT_START_TIME: &str = "00:00";

pub struct EventService<S> {
    store: Arc<S>,
    config: EventsConfig,
}

impl<S> Clone for EventService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S> EventService<S>
where
    S: EventStore + DistrictLookup,
{
    pub fn new(store: Arc<S>, config: EventsConfig) -> Self {
        Self { store, config }
    }

    /// All events matching `filter`, ordered by date then time
    pub async fn list_events(&self, actor: &ActorContext, filter: &EventFilter) -> Result<Vec<EventView>> {
        let rows = self.store.list_events().await?;

        let mut items: Vec<EventItem> = rows
            .iter()
            .map(to_domain)
            .filter(|item| filter.matches(item))
            .collect();
        items.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));

        debug!(user_id = %actor.user_id, total = rows.len(), shown = items.len(), "Events listed");

        Ok(items
            .into_iter()
            .map(|item| {
                let can_edit = actor.can_edit(&item);
                EventView { item, can_edit }
            })
            .collect())
    }

    pub async fn get_event(&self, actor: &ActorContext, event_id: Uuid) -> Result<EventView> {
        let row = self.load(event_id).await?;
        let item = to_domain(&row);
        let can_edit = actor.can_edit(&item);
        Ok(EventView { item, can_edit })
    }

    /// Create an event in the actor's current scope, optionally with a quota.
    ///
    /// When the quota cannot be written the freshly inserted event is deleted
    /// again and the quota error is returned.
    pub async fn create_event(&self, actor: &ActorContext, draft: EventDraft, capacity: Option<i32>) -> Result<EventView> {
        if !actor.is_manager() {
            log_access_denied(actor.user_id, "create_event", None);
            return Err(ChurchHubError::PermissionDenied(
                "only administrators and pastors can create events".to_string(),
            ));
        }
        if let Some(capacity) = capacity {
            self.validate_capacity(capacity)?;
        }

        let scope = resolve_actor_scope(self.store.as_ref(), actor).await?;
        log_scope_resolution(actor.user_id, scope.event_level, scope.owner_scope_id);

        let item = item_from_draft(draft, scope, None)?;
        let row = self.store.insert_event(to_storage(&item)?, Some(actor.user_id)).await?;

        if let Some(capacity) = capacity {
            if let Err(e) = self.store.set_quota(row.id, capacity).await {
                error!(event_id = %row.id, error = %e, "Quota write failed, removing event");
                if let Err(rollback) = self.store.delete_event(row.id).await {
                    error!(event_id = %row.id, error = %rollback, "Could not remove event after quota failure");
                }
                return Err(e);
            }
        }

        log_event_action(row.id, "create", actor.user_id, Some(&row.title));
        let item = to_domain(&row);
        let can_edit = actor.can_edit(&item);
        Ok(EventView { item, can_edit })
    }

    /// Replace an event's editable fields. Level and owner stay as stored, and
    /// so does the status unless the draft sets one.
    pub async fn update_event(&self, actor: &ActorContext, event_id: Uuid, mut draft: EventDraft) -> Result<EventView> {
        let row = self.load(event_id).await?;
        self.authorize(actor, &row, "update_event")?;

        draft.status = draft.status.or(Some(collapse_status(row.status)));

        let scope = CreationScope {
            event_level: row.event_level,
            owner_scope_id: row.owner_scope_id,
        };
        let item = item_from_draft(draft, scope, Some(row.id))?;
        let updated = self.store.update_event(row.id, to_storage(&item)?).await?;

        log_event_action(updated.id, "update", actor.user_id, None);
        Ok(EventView { item: to_domain(&updated), can_edit: true })
    }

    /// Change only the status; any status may follow any other
    pub async fn set_status(&self, actor: &ActorContext, event_id: Uuid, status: EventStatus) -> Result<EventView> {
        let row = self.load(event_id).await?;
        self.authorize(actor, &row, "set_status")?;

        let mut item = to_domain(&row);
        item.status = status;
        let updated = self.store.update_event(row.id, to_storage(&item)?).await?;

        log_event_action(updated.id, "set_status", actor.user_id, Some(status.as_str()));
        Ok(EventView { item: to_domain(&updated), can_edit: true })
    }

    pub async fn delete_event(&self, actor: &ActorContext, event_id: Uuid) -> Result<()> {
        let row = self.load(event_id).await?;
        self.authorize(actor, &row, "delete_event")?;

        self.store.delete_event(row.id).await?;
        log_event_action(row.id, "delete", actor.user_id, Some(&row.title));
        Ok(())
    }

    /// Registrations that were not cancelled
    pub async fn registration_count(&self, event_id: Uuid) -> Result<i64> {
        let row = self.load(event_id).await?;
        self.store.registration_count(row.id).await
    }

    /// Registered and checked-in members against the quota, if any
    pub async fn registration_summary(&self, event_id: Uuid) -> Result<RegistrationSummary> {
        let row = self.load(event_id).await?;
        let registered = self.store.registration_count(row.id).await?;
        let checked_in = self.store.attendance_count(row.id).await?;
        let capacity = self.store.quota(row.id).await?.map(|quota| quota.capacity);

        Ok(RegistrationSummary { registered, checked_in, capacity })
    }

    /// Record a member's attendance.
    ///
    /// Events requiring registration only admit registered members; other
    /// events get a walk-in registration. A second check-in keeps the first
    /// timestamp.
    pub async fn check_in(&self, actor: &ActorContext, event_id: Uuid, member_id: Uuid) -> Result<Registration> {
        let row = self.load(event_id).await?;
        self.authorize(actor, &row, "check_in")?;

        let existing = self.store.find_registration(row.id, member_id).await?;
        let registration = match existing {
            Some(registration) if registration.status == RegistrationStatus::Attended => {
                debug!(event_id = %row.id, member_id = %member_id, "Member already checked in");
                return Ok(registration);
            }
            Some(registration)
                if registration.status == RegistrationStatus::Cancelled && row.requires_registration =>
            {
                return Err(ChurchHubError::RegistrationNotFound { event_id: row.id, member_id });
            }
            Some(registration) => self.store.mark_attended(registration.id).await?,
            None if row.requires_registration => {
                return Err(ChurchHubError::RegistrationNotFound { event_id: row.id, member_id });
            }
            None => {
                self.store
                    .create_registration(CreateRegistrationRequest {
                        event_id: row.id,
                        member_id,
                        status: RegistrationStatus::Attended,
                    })
                    .await?
            }
        };

        info!(event_id = %row.id, member_id = %member_id, checked_in_by = %actor.user_id, "Member checked in");
        Ok(registration)
    }

    /// Dates an event occurs on from `from` through `days` ahead
    /// (configured lookahead when `None`)
    pub async fn upcoming_occurrences(&self, event_id: Uuid, from: NaiveDate, days: Option<u32>) -> Result<(EventItem, Vec<NaiveDate>)> {
        let item = to_domain(&self.load(event_id).await?);
        let days = days.unwrap_or(self.config.occurrence_lookahead_days);
        let until = from
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);

        let dates = item.occurrences_within(from, until);
        Ok((item, dates))
    }

    async fn load(&self, event_id: Uuid) -> Result<EventRow> {
        self.store
            .find_event(event_id)
            .await?
            .ok_or(ChurchHubError::EventNotFound { event_id })
    }

    fn authorize(&self, actor: &ActorContext, row: &EventRow, action: &str) -> Result<()> {
        if actor.can_edit(row) {
            return Ok(());
        }
        log_access_denied(actor.user_id, action, Some(row.id));
        Err(ChurchHubError::PermissionDenied(format!(
            "you cannot manage this {} event",
            row.event_level.to_string().to_lowercase()
        )))
    }

    fn validate_capacity(&self, capacity: i32) -> Result<()> {
        if capacity < 1 || capacity > self.config.max_capacity {
            return Err(ChurchHubError::InvalidInput(format!(
                "capacity must be between 1 and {}",
                self.config.max_capacity
            )));
        }
        Ok(())
    }
}

/// Fill in defaults and attach the scope
fn item_from_draft(draft: EventDraft, scope: CreationScope, id: Option<Uuid>) -> Result<EventItem> {
    let title = draft.title.trim().to_string();
    let date = match draft.date {
        Some(date) if !title.is_empty() => date,
        _ => return Err(ChurchHubError::InvalidInput("title and date are required".to_string())),
    };
    let time = draft
        .time
        .filter(|time| !time.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_START_TIME.to_string());
    let end_time = draft.end_time.unwrap_or_else(|| time.clone());

    Ok(EventItem {
        id,
        title,
        description: draft.description,
        date,
        end_date: draft.end_date.unwrap_or(date),
        time,
        end_time,
        status: draft.status.unwrap_or(EventStatus::Open),
        event_level: scope.event_level,
        owner_scope_id: scope.owner_scope_id,
        requires_registration: draft.requires_registration,
        is_paid: draft.is_paid,
        registration_fee: draft.registration_fee,
        visibility: draft.visibility,
        target_audience: draft.target_audience,
        location: draft.location,
        event_type: draft.event_type,
        frequency: draft.frequency,
        recurrence_pattern: draft.recurrence_pattern.unwrap_or_default(),
    })
}
