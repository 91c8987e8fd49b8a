//! Role classification
//!
//! Collapses an actor's role set into the single hierarchy tier they act at.

use crate::models::role::{HierarchyLevel, Role, RoleSet};

/// Map a role set to the tier it acts at.
///
/// `super_admin` wins over everything, then `district_admin`. Every other set,
/// including one with no recognised role, acts at branch level.
pub fn classify(roles: &RoleSet) -> HierarchyLevel {
    if roles.contains(&Role::SuperAdmin) {
        HierarchyLevel::National
    } else if roles.contains(&Role::DistrictAdmin) {
        HierarchyLevel::District
    } else {
        HierarchyLevel::Branch
    }
}

/// Whether the role set carries any event management capability at all
pub fn has_management_role(roles: &RoleSet) -> bool {
    roles.iter().any(Role::is_manager)
}
