//! Actor context
//!
//! Everything the policy functions need to know about who is acting, passed
//! explicitly instead of being read from ambient session state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::role::{HierarchyLevel, Role, RoleSet};
use crate::utils::errors::Result;
use super::access::{can_edit, Scoped};
use super::classifier::{classify, has_management_role};
use super::scope::{resolve_creation_scope, CreationScope};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorContext {
    pub user_id: Uuid,
    pub roles: RoleSet,
    /// Default branch from the user's profile
    pub branch_id: Option<Uuid>,
    /// District whose `head_admin_id` is this user
    pub administered_district_id: Option<Uuid>,
    /// Dashboard drill-down
    pub selected_branch_id: Option<Uuid>,
    pub selected_district_id: Option<Uuid>,
}

impl ActorContext {
    pub fn new(user_id: Uuid, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            user_id,
            roles: roles.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn with_branch(mut self, branch_id: Uuid) -> Self {
        self.branch_id = Some(branch_id);
        self
    }

    pub fn with_administered_district(mut self, district_id: Uuid) -> Self {
        self.administered_district_id = Some(district_id);
        self
    }

    pub fn with_selection(mut self, branch_id: Option<Uuid>, district_id: Option<Uuid>) -> Self {
        self.selected_branch_id = branch_id;
        self.selected_district_id = district_id;
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_manager(&self) -> bool {
        has_management_role(&self.roles)
    }

    pub fn level(&self) -> HierarchyLevel {
        classify(&self.roles)
    }

    /// Branch the actor is currently acting for
    pub fn acting_branch_id(&self) -> Option<Uuid> {
        self.selected_branch_id.or(self.branch_id)
    }

    /// Scope a new event would get, using only what the context already holds
    pub fn creation_scope(&self) -> Result<CreationScope> {
        resolve_creation_scope(
            self.level(),
            self.selected_branch_id,
            self.selected_district_id,
            self.administered_district_id,
            self.branch_id,
        )
    }

    pub fn can_edit<E: Scoped + ?Sized>(&self, event: &E) -> bool {
        can_edit(
            event,
            &self.roles,
            self.administered_district_id,
            self.acting_branch_id(),
        )
    }
}
