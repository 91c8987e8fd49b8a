//! Dashboard context service
//!
//! Keeps the branch or district a national administrator has drilled into,
//! so later commands create and edit events within that scope.

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::role::Role;
use crate::policy::ActorContext;
use crate::services::redis::KeyValueStore;
use crate::utils::errors::{ChurchHubError, Result};
use crate::utils::logging::log_access_denied;

/// Current drill-down of one user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSelection {
    pub selected_branch_id: Option<Uuid>,
    pub selected_district_id: Option<Uuid>,
}

impl DashboardSelection {
    pub fn is_empty(&self) -> bool {
        self.selected_branch_id.is_none() && self.selected_district_id.is_none()
    }
}

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn KeyValueStore>,
    ttl_seconds: u64,
}

impl DashboardService {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl_seconds: u64) -> Self {
        Self { store, ttl_seconds }
    }

    fn key(user_id: Uuid) -> String {
        format!("dashboard:{}", user_id)
    }

    fn require_drill_down(actor: &ActorContext, action: &str) -> Result<()> {
        if actor.has_role(Role::SuperAdmin) {
            return Ok(());
        }
        log_access_denied(actor.user_id, action, None);
        Err(ChurchHubError::PermissionDenied(
            "only national administrators can change the dashboard scope".to_string(),
        ))
    }

    /// Stored selection, empty when nothing was chosen or it expired
    pub async fn get(&self, user_id: Uuid) -> Result<DashboardSelection> {
        let selection = match self.store.get_json(&Self::key(user_id)).await? {
            Some(value) => serde_json::from_value(value)?,
            None => DashboardSelection::default(),
        };
        debug!(user_id = %user_id, selection = ?selection, "Dashboard selection loaded");
        Ok(selection)
    }

    async fn save(&self, user_id: Uuid, selection: DashboardSelection) -> Result<()> {
        if selection.is_empty() {
            self.store.delete(&Self::key(user_id)).await?;
        } else {
            let value = serde_json::to_value(selection)?;
            self.store.set_json(&Self::key(user_id), value, self.ttl_seconds).await?;
        }
        Ok(())
    }

    /// Drill into a branch; a previously selected district is kept
    pub async fn select_branch(&self, actor: &ActorContext, branch_id: Uuid) -> Result<DashboardSelection> {
        Self::require_drill_down(actor, "select_branch")?;

        let mut selection = self.get(actor.user_id).await?;
        selection.selected_branch_id = Some(branch_id);
        self.save(actor.user_id, selection).await?;

        info!(user_id = %actor.user_id, branch_id = %branch_id, "Dashboard branch selected");
        Ok(selection)
    }

    /// Drill into a district; clears the selected branch
    pub async fn select_district(&self, actor: &ActorContext, district_id: Uuid) -> Result<DashboardSelection> {
        Self::require_drill_down(actor, "select_district")?;

        let selection = DashboardSelection {
            selected_branch_id: None,
            selected_district_id: Some(district_id),
        };
        self.save(actor.user_id, selection).await?;

        info!(user_id = %actor.user_id, district_id = %district_id, "Dashboard district selected");
        Ok(selection)
    }

    /// Back to the national view
    pub async fn clear(&self, actor: &ActorContext) -> Result<()> {
        Self::require_drill_down(actor, "clear_selection")?;
        self.save(actor.user_id, DashboardSelection::default()).await?;

        info!(user_id = %actor.user_id, "Dashboard selection cleared");
        Ok(())
    }
}
