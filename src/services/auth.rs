//! Authentication service implementation
//!
//! This service turns a Telegram user into an [`ActorContext`]: profile,
//! roles, administered district and dashboard selection. Telegram ids listed
//! in `bot.admin_ids` are treated as national administrators. National
//! administrators also hand out roles and default branches through it.

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::settings::Settings;
use crate::database::UserDirectory;
use crate::models::{Role, User};
use crate::policy::{ActorContext, DistrictLookup};
use crate::services::dashboard::{DashboardSelection, DashboardService};
use crate::utils::errors::{ChurchHubError, Result};
use crate::utils::logging::log_access_denied;

/// Authentication service for building actor contexts
pub struct AuthService<S> {
    store: Arc<S>,
    dashboard: DashboardService,
    settings: Settings,
}

impl<S> Clone for AuthService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            dashboard: self.dashboard.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<S> AuthService<S>
where
    S: UserDirectory + DistrictLookup,
{
    /// Create a new AuthService instance
    pub fn new(store: Arc<S>, dashboard: DashboardService, settings: Settings) -> Self {
        Self { store, dashboard, settings }
    }

    /// Check if user is a bot admin
    pub fn is_bot_admin(&self, telegram_id: i64) -> bool {
        self.settings.bot.admin_ids.contains(&telegram_id)
    }

    /// Build the acting context for a registered Telegram user
    pub async fn actor_for(&self, telegram_id: i64) -> Result<ActorContext> {
        let Some(user) = self.store.find_user(telegram_id).await? else {
            self.log_auth_event(telegram_id, "actor_for", false, Some("not registered"));
            return Err(ChurchHubError::UserNotFound { telegram_id });
        };

        let roles = self.store.user_roles(user.id).await?;
        let is_bot_admin = self.is_bot_admin(telegram_id);
        if is_bot_admin {
            self.log_auth_event(telegram_id, "actor_for", true, Some("bot admin"));
        }
        let mut actor = build_actor(&user, roles, is_bot_admin);

        if actor.has_role(Role::DistrictAdmin) {
            match self.store.administered_district(user.id).await? {
                Some(district_id) => actor = actor.with_administered_district(district_id),
                None => warn!(user_id = %user.id, "District admin is not head of any district"),
            }
        }

        // Only national administrators can drill down, so a stale selection of a
        // demoted user is ignored.
        if actor.has_role(Role::SuperAdmin) {
            let DashboardSelection { selected_branch_id, selected_district_id } =
                self.dashboard.get(user.id).await?;
            actor = actor.with_selection(selected_branch_id, selected_district_id);
        }

        debug!(
            telegram_id = telegram_id,
            user_id = %actor.user_id,
            level = %actor.level(),
            roles = ?actor.roles,
            "Actor context created"
        );
        Ok(actor)
    }

    /// Give a registered user a role
    pub async fn grant_role(&self, actor: &ActorContext, telegram_id: i64, role: Role) -> Result<User> {
        Self::require_super_admin(actor, "grant_role")?;
        let user = self.registered_user(telegram_id).await?;

        self.store.grant_role(user.id, role).await?;
        info!(granted_by = %actor.user_id, user_id = %user.id, role = %role, "Role granted");
        Ok(user)
    }

    /// Set or clear the default branch of a registered user
    pub async fn assign_branch(&self, actor: &ActorContext, telegram_id: i64, branch_id: Option<Uuid>) -> Result<User> {
        Self::require_super_admin(actor, "assign_branch")?;
        let user = self.registered_user(telegram_id).await?;

        let user = self.store.set_user_branch(user.id, branch_id).await?;
        info!(assigned_by = %actor.user_id, user_id = %user.id, branch_id = ?branch_id, "Default branch set");
        Ok(user)
    }

    async fn registered_user(&self, telegram_id: i64) -> Result<User> {
        self.store
            .find_user(telegram_id)
            .await?
            .ok_or(ChurchHubError::UserNotFound { telegram_id })
    }

    fn require_super_admin(actor: &ActorContext, action: &str) -> Result<()> {
        if actor.has_role(Role::SuperAdmin) {
            return Ok(());
        }
        log_access_denied(actor.user_id, action, None);
        Err(ChurchHubError::PermissionDenied(
            "only national administrators can manage members".to_string(),
        ))
    }

    /// Log authentication event
    pub fn log_auth_event(&self, telegram_id: i64, action: &str, success: bool, details: Option<&str>) {
        if success {
            info!(
                telegram_id = telegram_id,
                action = action,
                details = details,
                "Authentication event: success"
            );
        } else {
            warn!(
                telegram_id = telegram_id,
                action = action,
                details = details,
                "Authentication event: failure"
            );
        }
    }
}

/// Context from a user row and its stored roles
pub fn build_actor(user: &User, roles: Vec<Role>, is_bot_admin: bool) -> ActorContext {
    let mut actor = ActorContext::new(user.id, roles);
    if is_bot_admin {
        actor.roles.insert(Role::SuperAdmin);
    }
    if let Some(branch_id) = user.branch_id {
        actor = actor.with_branch(branch_id);
    }
    actor
}
