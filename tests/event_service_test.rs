//! Event service behaviour over the in-memory store

mod helpers;

use std::sync::Arc;
use assert_matches::assert_matches;
use rust_decimal::Decimal;
use uuid::Uuid;

use ChurchHub::models::*;
use ChurchHub::ChurchHubError;
use helpers::*;

#[tokio::test]
async fn test_lists_events_in_date_then_time_order_with_edit_rights() {
    let branch = Uuid::new_v4();
    let store = Arc::new(MemoryStore::new());
    store.put(event_row("Evening Prayer", HierarchyLevel::Branch, Some(branch), at(2024, 6, 2, 18, 0)));
    store.put(event_row("Morning Service", HierarchyLevel::Branch, Some(branch), at(2024, 6, 2, 9, 0)));
    store.put(event_row("National Convention", HierarchyLevel::National, None, at(2024, 5, 1, 8, 0)));

    let views = event_service(store)
        .list_events(&pastor(branch), &EventFilter::default())
        .await
        .unwrap();

    let titles: Vec<&str> = views.iter().map(|v| v.item.title.as_str()).collect();
    assert_eq!(titles, vec!["National Convention", "Morning Service", "Evening Prayer"]);
    assert_eq!(views.iter().map(|v| v.can_edit).collect::<Vec<_>>(), vec![false, true, true]);
}

#[tokio::test]
async fn test_list_filter_applies_in_memory() {
    let store = Arc::new(MemoryStore::new());
    store.put(event_row("Youth Rally", HierarchyLevel::National, None, at(2024, 6, 8, 15, 0)));
    store.put(event_row("Elders Meeting", HierarchyLevel::National, None, at(2024, 6, 9, 15, 0)));

    let filter = EventFilter { search: Some("rally".to_string()), ..Default::default() };
    let views = event_service(store).list_events(&national_admin(), &filter).await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].item.title, "Youth Rally");
}

#[tokio::test]
async fn test_district_admin_creates_district_event() {
    let district = Uuid::new_v4();
    let store = Arc::new(MemoryStore::new());
    let actor = district_admin(district);

    let draft = EventDraft::new("District Conference", date(2024, 9, 14)).with_time("09:00");
    let view = event_service(store.clone()).create_event(&actor, draft, None).await.unwrap();

    assert!(view.can_edit);
    assert_eq!(view.item.event_level, HierarchyLevel::District);
    assert_eq!(view.item.owner_scope_id, Some(district));

    let row = store.get(view.item.id.unwrap()).unwrap();
    assert_eq!(row.status, StorageStatus::Published);
    assert_eq!(row.created_by, Some(actor.user_id));
    assert_eq!(row.start_date, at(2024, 9, 14, 9, 0));
    assert_eq!(row.end_date, Some(at(2024, 9, 14, 9, 0)));
}

#[tokio::test]
async fn test_members_cannot_create_events() {
    let store = Arc::new(MemoryStore::new());
    let result = event_service(store.clone())
        .create_event(&member(Uuid::new_v4()), EventDraft::new("Picnic", date(2024, 7, 7)), None)
        .await;

    assert_matches!(result, Err(ChurchHubError::PermissionDenied(_)));
    assert_eq!(store.event_count(), 0);
}

#[tokio::test]
async fn test_create_requires_title_and_date() {
    let store = Arc::new(MemoryStore::new());
    let draft = EventDraft { title: "Retreat".to_string(), ..Default::default() };

    let result = event_service(store.clone()).create_event(&national_admin(), draft, None).await;
    assert_matches!(result, Err(ChurchHubError::InvalidInput(_)));
    assert_eq!(store.event_count(), 0);
}

#[tokio::test]
async fn test_malformed_time_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let draft = EventDraft::new("Vigil", date(2024, 3, 30)).with_time("25:99");

    let result = event_service(store.clone()).create_event(&national_admin(), draft, None).await;
    assert_matches!(result, Err(ChurchHubError::InvalidInput(_)));
    assert_eq!(store.event_count(), 0);
}

#[tokio::test]
async fn test_quota_is_written_with_the_event() {
    let store = Arc::new(MemoryStore::new());
    let draft = EventDraft::new("Marriage Seminar", date(2024, 10, 5)).with_registration(true);

    let view = event_service(store.clone()).create_event(&national_admin(), draft, Some(120)).await.unwrap();
    assert_eq!(store.stored_quota(view.item.id.unwrap()), Some(120));
}

#[tokio::test]
async fn test_failed_quota_removes_the_new_event() {
    let store = Arc::new(MemoryStore::new().failing_quota());
    let draft = EventDraft::new("Marriage Seminar", date(2024, 10, 5));

    let result = event_service(store.clone()).create_event(&national_admin(), draft, Some(120)).await;
    assert_matches!(result, Err(ChurchHubError::ServiceUnavailable(_)));
    assert_eq!(store.event_count(), 0);
}

#[tokio::test]
async fn test_capacity_out_of_range_is_rejected_before_insert() {
    let store = Arc::new(MemoryStore::new());
    let service = event_service(store.clone());

    for capacity in [0, -5, 10_001] {
        let draft = EventDraft::new("Crusade", date(2024, 11, 1));
        let result = service.create_event(&national_admin(), draft, Some(capacity)).await;
        assert_matches!(result, Err(ChurchHubError::InvalidInput(_)));
    }
    assert_eq!(store.event_count(), 0);
}

#[tokio::test]
async fn test_update_keeps_stored_level_and_owner() {
    let branch = Uuid::new_v4();
    let store = Arc::new(MemoryStore::new());
    let id = store.put(event_row("Bible Study", HierarchyLevel::Branch, Some(branch), at(2024, 6, 5, 19, 0)));

    let draft = EventDraft::new("Bible Study (Romans)", date(2024, 6, 12))
        .with_time("19:30")
        .with_type(EventType::Training)
        .with_fee(Decimal::new(500, 2));
    let view = event_service(store.clone()).update_event(&national_admin(), id, draft).await.unwrap();

    assert_eq!(view.item.title, "Bible Study (Romans)");
    assert_eq!(view.item.time, "19:30");
    assert_eq!(view.item.event_type, EventType::Training);
    assert_eq!(view.item.event_level, HierarchyLevel::Branch);
    assert_eq!(view.item.owner_scope_id, Some(branch));
    assert_eq!(store.get(id).unwrap().registration_fee, Some(Decimal::new(500, 2)));
}

#[tokio::test]
async fn test_update_is_denied_outside_scope() {
    let store = Arc::new(MemoryStore::new());
    let id = store.put(event_row("Bible Study", HierarchyLevel::Branch, Some(Uuid::new_v4()), at(2024, 6, 5, 19, 0)));

    let draft = EventDraft::new("Hijacked", date(2024, 6, 5));
    let result = event_service(store.clone()).update_event(&pastor(Uuid::new_v4()), id, draft).await;

    assert_matches!(result, Err(ChurchHubError::PermissionDenied(_)));
    assert_eq!(store.get(id).unwrap().title, "Bible Study");
}

#[tokio::test]
async fn test_status_can_move_anywhere() {
    let district = Uuid::new_v4();
    let store = Arc::new(MemoryStore::new());
    let mut row = event_row("Harvest", HierarchyLevel::District, Some(district), at(2024, 11, 3, 10, 0));
    row.status = StorageStatus::Ended;
    let id = store.put(row);
    let service = event_service(store.clone());
    let actor = district_admin(district);

    let view = service.set_status(&actor, id, EventStatus::Upcoming).await.unwrap();
    assert_eq!(view.item.status, EventStatus::Upcoming);
    assert_eq!(store.get(id).unwrap().status, StorageStatus::Upcoming);

    service.set_status(&actor, id, EventStatus::Open).await.unwrap();
    assert_eq!(store.get(id).unwrap().status, StorageStatus::Published);
}

#[tokio::test]
async fn test_delete_requires_edit_rights() {
    let district = Uuid::new_v4();
    let store = Arc::new(MemoryStore::new());
    let id = store.put(event_row("Harvest", HierarchyLevel::District, Some(district), at(2024, 11, 3, 10, 0)));
    let service = event_service(store.clone());

    let denied = service.delete_event(&district_admin(Uuid::new_v4()), id).await;
    assert_matches!(denied, Err(ChurchHubError::PermissionDenied(_)));
    assert!(store.get(id).is_some());

    service.delete_event(&district_admin(district), id).await.unwrap();
    assert!(store.get(id).is_none());
}

#[tokio::test]
async fn test_missing_event_is_reported() {
    let store = Arc::new(MemoryStore::new());
    let missing = Uuid::new_v4();

    let result = event_service(store).delete_event(&national_admin(), missing).await;
    assert_matches!(result, Err(ChurchHubError::EventNotFound { event_id }) if event_id == missing);
}

#[tokio::test]
async fn test_registration_count_ignores_cancellations() {
    let store = Arc::new(MemoryStore::new());
    let id = store.put(event_row("Retreat", HierarchyLevel::National, None, at(2024, 8, 20, 8, 0)));
    store.register(id, Uuid::new_v4(), RegistrationStatus::Registered);
    store.register(id, Uuid::new_v4(), RegistrationStatus::Attended);
    store.register(id, Uuid::new_v4(), RegistrationStatus::Cancelled);

    assert_eq!(event_service(store).registration_count(id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_check_in_marks_registered_member_once() {
    let branch = Uuid::new_v4();
    let store = Arc::new(MemoryStore::new());
    let mut row = event_row("Baptism Class", HierarchyLevel::Branch, Some(branch), at(2024, 6, 15, 10, 0));
    row.requires_registration = true;
    let id = store.put(row);
    let member_id = Uuid::new_v4();
    store.register(id, member_id, RegistrationStatus::Registered);

    let service = event_service(store);
    let first = service.check_in(&pastor(branch), id, member_id).await.unwrap();
    assert_eq!(first.status, RegistrationStatus::Attended);
    assert!(first.checked_in_at.is_some());

    let second = service.check_in(&pastor(branch), id, member_id).await.unwrap();
    assert_eq!(second.checked_in_at, first.checked_in_at);
}

#[tokio::test]
async fn test_check_in_requires_registration_when_event_does() {
    let store = Arc::new(MemoryStore::new());
    let mut row = event_row("Leaders Summit", HierarchyLevel::National, None, at(2024, 9, 1, 9, 0));
    row.requires_registration = true;
    let id = store.put(row);
    let service = event_service(store.clone());

    let unknown = service.check_in(&national_admin(), id, Uuid::new_v4()).await;
    assert_matches!(unknown, Err(ChurchHubError::RegistrationNotFound { .. }));

    let cancelled = Uuid::new_v4();
    store.register(id, cancelled, RegistrationStatus::Cancelled);
    let result = service.check_in(&national_admin(), id, cancelled).await;
    assert_matches!(result, Err(ChurchHubError::RegistrationNotFound { .. }));
}

#[tokio::test]
async fn test_walk_in_is_recorded_for_open_events() {
    let store = Arc::new(MemoryStore::new());
    let id = store.put(event_row("Sunday Service", HierarchyLevel::National, None, at(2024, 6, 2, 9, 0)));

    let registration = event_service(store.clone())
        .check_in(&national_admin(), id, Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(registration.status, RegistrationStatus::Attended);
    assert_eq!(event_service(store).registration_count(id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_check_in_uses_the_edit_gate() {
    let store = Arc::new(MemoryStore::new());
    let id = store.put(event_row("Sunday Service", HierarchyLevel::Branch, Some(Uuid::new_v4()), at(2024, 6, 2, 9, 0)));

    let result = event_service(store).check_in(&pastor(Uuid::new_v4()), id, Uuid::new_v4()).await;
    assert_matches!(result, Err(ChurchHubError::PermissionDenied(_)));
}

#[tokio::test]
async fn test_upcoming_occurrences_expand_weekly_events() {
    let store = Arc::new(MemoryStore::new());
    let mut row = event_row("Midweek Service", HierarchyLevel::National, None, at(2024, 1, 3, 18, 0));
    row.metadata = serde_json::json!({ "type": "Service", "frequency": "Weekly" });
    let id = store.put(row);

    let (item, dates) = event_service(store)
        .upcoming_occurrences(id, date(2024, 1, 10), Some(14))
        .await
        .unwrap();

    assert_eq!(item.frequency, Frequency::Weekly);
    assert_eq!(dates, vec![date(2024, 1, 10), date(2024, 1, 17), date(2024, 1, 24)]);
}

#[tokio::test]
async fn test_registration_summary_reports_capacity_and_attendance() {
    let store = Arc::new(MemoryStore::new());
    let draft = EventDraft::new("Couples Retreat", date(2024, 10, 5)).with_registration(true);
    let service = event_service(store.clone());
    let id = service.create_event(&national_admin(), draft, Some(3)).await.unwrap().item.id.unwrap();

    store.register(id, Uuid::new_v4(), RegistrationStatus::Registered);
    store.register(id, Uuid::new_v4(), RegistrationStatus::Attended);
    store.register(id, Uuid::new_v4(), RegistrationStatus::Cancelled);

    let summary = service.registration_summary(id).await.unwrap();
    assert_eq!(summary, RegistrationSummary { registered: 2, checked_in: 1, capacity: Some(3) });
    assert_eq!(summary.remaining(), Some(1));

    store.register(id, Uuid::new_v4(), RegistrationStatus::Registered);
    assert_eq!(service.registration_summary(id).await.unwrap().remaining(), Some(0));
}

#[tokio::test]
async fn test_registration_summary_without_quota() {
    let store = Arc::new(MemoryStore::new());
    let id = store.put(event_row("Sunday Service", HierarchyLevel::National, None, at(2024, 6, 2, 9, 0)));
    store.register(id, Uuid::new_v4(), RegistrationStatus::Attended);

    let summary = event_service(store).registration_summary(id).await.unwrap();
    assert_eq!(summary.capacity, None);
    assert_eq!(summary.remaining(), None);
    assert_eq!(summary.checked_in, 1);
}

#[tokio::test]
async fn test_update_without_status_keeps_the_stored_one() {
    let store = Arc::new(MemoryStore::new());
    let mut row = event_row("Harvest", HierarchyLevel::National, None, at(2024, 11, 3, 10, 0));
    row.status = StorageStatus::Cancelled;
    let id = store.put(row);

    let draft = EventDraft::new("Harvest Thanksgiving", date(2024, 11, 10));
    let view = event_service(store.clone()).update_event(&national_admin(), id, draft).await.unwrap();

    assert_eq!(view.item.status, EventStatus::Cancelled);
    assert_eq!(store.get(id).unwrap().status, StorageStatus::Cancelled);
}

#[tokio::test]
async fn test_update_with_status_applies_it() {
    let store = Arc::new(MemoryStore::new());
    let mut row = event_row("Harvest", HierarchyLevel::National, None, at(2024, 11, 3, 10, 0));
    row.status = StorageStatus::Cancelled;
    let id = store.put(row);

    let draft = EventDraft::new("Harvest", date(2024, 11, 3)).with_status(EventStatus::Upcoming);
    event_service(store.clone()).update_event(&national_admin(), id, draft).await.unwrap();
    assert_eq!(store.get(id).unwrap().status, StorageStatus::Upcoming);
}

#[tokio::test]
async fn test_upcoming_occurrences_include_a_running_multi_day_event() {
    let store = Arc::new(MemoryStore::new());
    let mut row = event_row("Youth Camp", HierarchyLevel::National, None, at(2024, 7, 1, 8, 0));
    row.end_date = Some(at(2024, 7, 5, 16, 0));
    let id = store.put(row);
    let service = event_service(store);

    let (_, dates) = service.upcoming_occurrences(id, date(2024, 7, 3), Some(7)).await.unwrap();
    assert_eq!(dates, vec![date(2024, 7, 1)]);

    let (_, dates) = service.upcoming_occurrences(id, date(2024, 7, 6), Some(7)).await.unwrap();
    assert!(dates.is_empty());
}
