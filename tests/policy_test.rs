//! Property tests for the role classifier and the edit-rights gate

mod helpers;

use std::collections::HashSet;
use proptest::prelude::*;
use uuid::Uuid;

use ChurchHub::models::{HierarchyLevel, Role, RoleSet};
use ChurchHub::policy::{can_edit, classify, has_management_role, ActorContext};
use helpers::*;

fn role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::SuperAdmin),
        Just(Role::DistrictAdmin),
        Just(Role::Admin),
        Just(Role::Pastor),
        Just(Role::Member),
    ]
}

fn roles() -> impl Strategy<Value = RoleSet> {
    proptest::collection::hash_set(role(), 0..5)
}

fn level() -> impl Strategy<Value = HierarchyLevel> {
    prop_oneof![
        Just(HierarchyLevel::National),
        Just(HierarchyLevel::District),
        Just(HierarchyLevel::Branch),
    ]
}

fn scope_id() -> impl Strategy<Value = Option<Uuid>> {
    proptest::option::of(any::<u128>().prop_map(Uuid::from_u128))
}

fn event(level: HierarchyLevel, owner: Option<Uuid>) -> ChurchHub::models::EventRow {
    event_row("Fixture", level, owner, at(2024, 5, 19, 10, 0))
}

proptest! {
    #[test]
    fn test_super_admin_always_classifies_national(mut roles in roles()) {
        roles.insert(Role::SuperAdmin);
        prop_assert_eq!(classify(&roles), HierarchyLevel::National);
    }

    #[test]
    fn test_district_admin_without_super_admin_classifies_district(mut roles in roles()) {
        roles.remove(&Role::SuperAdmin);
        roles.insert(Role::DistrictAdmin);
        prop_assert_eq!(classify(&roles), HierarchyLevel::District);
    }

    #[test]
    fn test_everyone_else_classifies_branch(mut roles in roles()) {
        roles.remove(&Role::SuperAdmin);
        roles.remove(&Role::DistrictAdmin);
        prop_assert_eq!(classify(&roles), HierarchyLevel::Branch);
    }

    #[test]
    fn test_national_events_need_super_admin(
        roles in roles(),
        owner in scope_id(),
        district in scope_id(),
        branch in scope_id(),
    ) {
        let row = event(HierarchyLevel::National, owner);
        prop_assert_eq!(
            can_edit(&row, &roles, district, branch),
            roles.contains(&Role::SuperAdmin)
        );
    }

    #[test]
    fn test_district_admin_edits_only_own_district(
        district in any::<u128>().prop_map(Uuid::from_u128),
        owner in scope_id(),
    ) {
        let roles: RoleSet = [Role::DistrictAdmin].into_iter().collect();
        let row = event(HierarchyLevel::District, owner);
        prop_assert_eq!(can_edit(&row, &roles, Some(district), None), owner == Some(district));
    }

    #[test]
    fn test_unowned_events_never_match_unscoped_actors(roles in roles(), level in level()) {
        prop_assume!(!roles.contains(&Role::SuperAdmin));
        let row = event(level, None);
        prop_assert!(!can_edit(&row, &roles, None, None));
    }

    #[test]
    fn test_without_management_role_nothing_is_editable(
        level in level(),
        owner in scope_id(),
        district in scope_id(),
        branch in scope_id(),
    ) {
        let roles: RoleSet = [Role::Member].into_iter().collect();
        prop_assert!(!has_management_role(&roles));
        prop_assert!(!can_edit(&event(level, owner), &roles, district, branch));
        prop_assert!(!can_edit(&event(level, owner), &HashSet::new(), district, branch));
    }
}

#[test]
fn test_district_admin_with_null_district_cannot_edit() {
    let roles: RoleSet = [Role::DistrictAdmin].into_iter().collect();
    let row = event(HierarchyLevel::District, Some(Uuid::new_v4()));
    assert!(!can_edit(&row, &roles, None, None));
}

#[test]
fn test_branch_staff_edit_their_branch_events() {
    let branch = Uuid::new_v4();
    let row = event(HierarchyLevel::Branch, Some(branch));

    assert!(branch_admin(branch).can_edit(&row));
    assert!(pastor(branch).can_edit(&row));
    assert!(!member(branch).can_edit(&row));
    assert!(!pastor(Uuid::new_v4()).can_edit(&row));
}

#[test]
fn test_district_admin_cannot_edit_branch_events_in_their_district() {
    let district = Uuid::new_v4();
    let row = event(HierarchyLevel::Branch, Some(Uuid::new_v4()));
    assert!(!district_admin(district).can_edit(&row));
}

#[test]
fn test_dashboard_branch_selection_grants_branch_rights() {
    let own = Uuid::new_v4();
    let selected = Uuid::new_v4();
    let row = event(HierarchyLevel::Branch, Some(selected));

    let actor: ActorContext = pastor(own);
    assert!(!actor.can_edit(&row));
    assert!(actor.with_selection(Some(selected), None).can_edit(&row));
}

#[test]
fn test_super_admin_edits_every_tier() {
    let actor = national_admin();
    for level in [HierarchyLevel::National, HierarchyLevel::District, HierarchyLevel::Branch] {
        assert!(actor.can_edit(&event(level, None)));
        assert!(actor.can_edit(&event(level, Some(Uuid::new_v4()))));
    }
}
