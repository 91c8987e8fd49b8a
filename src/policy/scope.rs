//! Creation scope resolution
//!
//! Decides which tier and owner a newly created event gets. Existing events
//! are never re-validated against this; see [`super::access`] for that.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::role::HierarchyLevel;
use crate::utils::errors::{ChurchHubError, Result};
use super::context::ActorContext;

/// Level and owner assigned to a new event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationScope {
    pub event_level: HierarchyLevel,
    pub owner_scope_id: Option<Uuid>,
}

impl CreationScope {
    pub fn national() -> Self {
        Self { event_level: HierarchyLevel::National, owner_scope_id: None }
    }

    pub fn district(district_id: Uuid) -> Self {
        Self { event_level: HierarchyLevel::District, owner_scope_id: Some(district_id) }
    }

    pub fn branch(branch_id: Uuid) -> Self {
        Self { event_level: HierarchyLevel::Branch, owner_scope_id: Some(branch_id) }
    }
}

/// Finds the district a user administers (`districts.head_admin_id`)
#[async_trait]
pub trait DistrictLookup: Send + Sync {
    async fn administered_district(&self, user_id: Uuid) -> Result<Option<Uuid>>;
}

/// Resolve the scope of an event about to be created.
///
/// A national actor drilled into a branch creates for that branch; drilled into
/// a district (without a branch) creates for that district; otherwise creates a
/// national event. District actors create for the district they administer.
/// Branch actors create for the selected branch, else their own.
pub fn resolve_creation_scope(
    level: HierarchyLevel,
    selected_branch_id: Option<Uuid>,
    selected_district_id: Option<Uuid>,
    own_district_id: Option<Uuid>,
    own_branch_id: Option<Uuid>,
) -> Result<CreationScope> {
    match level {
        HierarchyLevel::National => Ok(match (selected_branch_id, selected_district_id) {
            (Some(branch_id), _) => CreationScope::branch(branch_id),
            (None, Some(district_id)) => CreationScope::district(district_id),
            (None, None) => CreationScope::national(),
        }),
        HierarchyLevel::District => own_district_id
            .map(CreationScope::district)
            .ok_or_else(|| {
                ChurchHubError::ScopeUnresolved(
                    "district admin does not administer any district".to_string(),
                )
            }),
        HierarchyLevel::Branch => selected_branch_id
            .or(own_branch_id)
            .map(CreationScope::branch)
            .ok_or_else(|| {
                ChurchHubError::ScopeUnresolved(
                    "no branch selected and no default branch on profile".to_string(),
                )
            }),
    }
}

/// Resolve the creation scope for an actor, fetching the administered district
/// when a district-level context does not carry it yet.
pub async fn resolve_actor_scope<L>(lookup: &L, actor: &ActorContext) -> Result<CreationScope>
where
    L: DistrictLookup + ?Sized,
{
    let level = actor.level();
    let own_district_id = match (level, actor.administered_district_id) {
        (HierarchyLevel::District, None) => lookup.administered_district(actor.user_id).await?,
        (_, district_id) => district_id,
    };

    resolve_creation_scope(
        level,
        actor.selected_branch_id,
        actor.selected_district_id,
        own_district_id,
        actor.branch_id,
    )
}
