//! Edit rights evaluation
//!
//! One gate covers edit, delete, status changes and attendance check-in.

use uuid::Uuid;

use crate::models::event::{EventItem, EventRow};
use crate::models::role::{HierarchyLevel, Role, RoleSet};
use super::classifier::has_management_role;

/// Anything carrying an event's tier and owner
pub trait Scoped {
    fn event_level(&self) -> HierarchyLevel;
    fn owner_scope_id(&self) -> Option<Uuid>;
}

impl Scoped for EventItem {
    fn event_level(&self) -> HierarchyLevel {
        self.event_level
    }

    fn owner_scope_id(&self) -> Option<Uuid> {
        self.owner_scope_id
    }
}

impl Scoped for EventRow {
    fn event_level(&self) -> HierarchyLevel {
        self.event_level
    }

    fn owner_scope_id(&self) -> Option<Uuid> {
        self.owner_scope_id
    }
}

/// Whether an actor may edit or delete an event.
///
/// `actor_branch_id` is the branch the actor is acting for: the dashboard
/// selection if any, else the profile's default branch.
pub fn can_edit<E: Scoped + ?Sized>(
    event: &E,
    roles: &RoleSet,
    actor_district_id: Option<Uuid>,
    actor_branch_id: Option<Uuid>,
) -> bool {
    if !has_management_role(roles) {
        return false;
    }

    if roles.contains(&Role::SuperAdmin) {
        return true;
    }

    let owner = event.owner_scope_id();
    match event.event_level() {
        HierarchyLevel::National => false,
        HierarchyLevel::District => {
            roles.contains(&Role::DistrictAdmin) && owned_by(owner, actor_district_id)
        }
        HierarchyLevel::Branch => {
            (roles.contains(&Role::Admin) || roles.contains(&Role::Pastor))
                && owned_by(owner, actor_branch_id)
        }
    }
}

// A missing owner never matches, not even a missing actor scope.
fn owned_by(owner: Option<Uuid>, actor_scope: Option<Uuid>) -> bool {
    matches!((owner, actor_scope), (Some(owner), Some(actor)) if owner == actor)
}
