//! Store-level tests for the item state machine and the auto-archive sweep.
//!
//! These bypass HTTP and drive the store directly against a throwaway
//! database file, so the lifecycle rules can be checked without a router.

use std::sync::Arc;

use chrono::{Datelike, Days, Duration, Utc};
use lostarr::config::Config;
use lostarr::db::{Store, StoreError};
use lostarr::entities::items;
use lostarr::lifecycle::ItemStatus;
use lostarr::models::{ItemFilter, NewItem};
use lostarr::services::sweep::SweepService;
use sea_orm::{ActiveModelTrait, Set};
use tokio::sync::RwLock;

async fn spawn_store() -> Store {
    let db_path =
        std::env::temp_dir().join(format!("lostarr-lifecycle-test-{}.db", uuid::Uuid::new_v4()));
    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("Failed to open test store")
}

fn sweeper(store: &Store) -> SweepService {
    SweepService::new(store.clone(), Arc::new(RwLock::new(Config::default())))
}

fn new_item(description: &str) -> NewItem {
    NewItem {
        description: description.to_string(),
        found_location: "Cafeteria".to_string(),
        collect_location: "Front desk".to_string(),
        image_path: None,
    }
}

/// Rewrites an item's stored upload timestamp behind the store's back.
async fn set_uploaded_at(store: &Store, id: i32, stamp: &str) {
    let active = items::ActiveModel {
        id: Set(id),
        uploaded_at: Set(stamp.to_string()),
        ..Default::default()
    };
    active.update(&store.conn).await.expect("rewrite uploaded_at");
}

fn days_ago(days: u64) -> String {
    Utc::now()
        .checked_sub_days(Days::new(days))
        .unwrap()
        .to_rfc3339()
}

#[tokio::test]
async fn test_new_item_starts_lost() {
    let store = spawn_store().await;

    let item = store.add_item(&new_item("Red backpack")).await.unwrap();
    assert_eq!(item.status, ItemStatus::Lost);
    assert!(item.collected_at.is_none());
    assert!(lostarr::lifecycle::parse_stored_timestamp(&item.uploaded_at).is_ok());

    let listed = store.list_items(&ItemFilter::default()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, item.id);
    assert_eq!(listed[0].description, "Red backpack");
}

#[tokio::test]
async fn test_collect_is_terminal() {
    let store = spawn_store().await;
    let item = store.add_item(&new_item("Umbrella")).await.unwrap();

    let collected = store.mark_collected(item.id).await.unwrap();
    assert_eq!(collected.status, ItemStatus::Collected);
    assert!(collected.collected_at.is_some());

    // No second collect, no archive, no restore.
    assert!(matches!(
        store.mark_collected(item.id).await,
        Err(StoreError::InvalidTransition { .. })
    ));
    assert!(matches!(
        store.archive_item(item.id).await,
        Err(StoreError::InvalidTransition { .. })
    ));
    assert!(matches!(
        store.restore_item(item.id).await,
        Err(StoreError::InvalidTransition { .. })
    ));

    let unchanged = store.get_item(item.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, ItemStatus::Collected);
    assert_eq!(unchanged.collected_at, collected.collected_at);
}

#[tokio::test]
async fn test_collected_at_only_while_collected() {
    let store = spawn_store().await;

    // Walk lost -> archived -> lost -> collected; the timestamp appears
    // exactly at the last step and nowhere before.
    let item = store.add_item(&new_item("Left sneaker")).await.unwrap();
    assert!(item.collected_at.is_none());

    let archived = store.archive_item(item.id).await.unwrap();
    assert_eq!(archived.status, ItemStatus::Archived);
    assert!(archived.collected_at.is_none());

    let restored = store.restore_item(item.id).await.unwrap();
    assert_eq!(restored.status, ItemStatus::Lost);
    assert!(restored.collected_at.is_none());

    let collected = store.mark_collected(item.id).await.unwrap();
    assert_eq!(collected.status, ItemStatus::Collected);
    assert!(collected.collected_at.is_some());
}

#[tokio::test]
async fn test_restore_requires_archived() {
    let store = spawn_store().await;
    let item = store.add_item(&new_item("Physics textbook")).await.unwrap();

    assert!(matches!(
        store.restore_item(item.id).await,
        Err(StoreError::InvalidTransition { .. })
    ));

    store.archive_item(item.id).await.unwrap();
    let restored = store.restore_item(item.id).await.unwrap();
    assert_eq!(restored.status, ItemStatus::Lost);
}

#[tokio::test]
async fn test_transitions_on_missing_item() {
    let store = spawn_store().await;

    assert!(matches!(
        store.mark_collected(4242).await,
        Err(StoreError::ItemNotFound(4242))
    ));
    assert!(matches!(
        store.archive_item(4242).await,
        Err(StoreError::ItemNotFound(4242))
    ));
    assert!(matches!(
        store.restore_item(4242).await,
        Err(StoreError::ItemNotFound(4242))
    ));
    assert!(store.get_item(4242).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let store = spawn_store().await;

    let item = store.add_item(&new_item("Wristwatch")).await.unwrap();
    assert!(store.delete_item(item.id).await.unwrap());
    assert!(!store.delete_item(item.id).await.unwrap());
    assert!(store.get_item(item.id).await.unwrap().is_none());

    // Delete works from every state, not just lost.
    let other = store.add_item(&new_item("House keys")).await.unwrap();
    store.mark_collected(other.id).await.unwrap();
    assert!(store.delete_item(other.id).await.unwrap());
}

#[tokio::test]
async fn test_list_filters_by_status_and_date() {
    let store = spawn_store().await;

    let a = store.add_item(&new_item("Left glove")).await.unwrap();
    let b = store.add_item(&new_item("Right glove")).await.unwrap();
    store.mark_collected(b.id).await.unwrap();

    let lost = store
        .list_items(&ItemFilter::by_status(ItemStatus::Lost))
        .await
        .unwrap();
    assert_eq!(lost.len(), 1);
    assert_eq!(lost[0].id, a.id);

    let collected = store
        .list_items(&ItemFilter::by_status(ItemStatus::Collected))
        .await
        .unwrap();
    assert_eq!(collected.len(), 1);
    assert_eq!(collected[0].id, b.id);

    // Date bounds are inclusive calendar days: today's uploads match a
    // from=to=today range.
    let today = Utc::now().date_naive();
    let today_only = ItemFilter {
        status: None,
        uploaded_from: Some(today),
        uploaded_to: Some(today),
    };
    assert_eq!(store.list_items(&today_only).await.unwrap().len(), 2);

    // Backdating one item pushes it out of the range, and the remaining
    // newer item now sorts first in the unfiltered listing.
    set_uploaded_at(&store, a.id, &days_ago(3)).await;
    let filtered = store.list_items(&today_only).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, b.id);

    let all = store.list_items(&ItemFilter::default()).await.unwrap();
    assert_eq!(all[0].id, b.id);
    assert_eq!(all[1].id, a.id);
}

#[tokio::test]
async fn test_sweep_archives_only_past_threshold() {
    let store = spawn_store().await;
    let sweep = sweeper(&store);

    let stale = store.add_item(&new_item("Dusty lunchbox")).await.unwrap();
    let fresh = store.add_item(&new_item("New earbuds")).await.unwrap();
    let nearly = store.add_item(&new_item("Borderline beanie")).await.unwrap();

    set_uploaded_at(&store, stale.id, &days_ago(31)).await;
    // A shade under the 30-day default: old, but not yet past the line.
    let just_under = Utc::now() - Duration::days(30) + Duration::minutes(5);
    set_uploaded_at(&store, nearly.id, &just_under.to_rfc3339()).await;

    let outcome = sweep.run().await.unwrap().expect("sweep should run");
    assert_eq!(outcome.examined, 3);
    assert_eq!(outcome.archived, 1);
    assert_eq!(outcome.skipped_malformed, 0);

    let stale = store.get_item(stale.id).await.unwrap().unwrap();
    assert_eq!(stale.status, ItemStatus::Archived);
    let fresh = store.get_item(fresh.id).await.unwrap().unwrap();
    assert_eq!(fresh.status, ItemStatus::Lost);
    let nearly = store.get_item(nearly.id).await.unwrap().unwrap();
    assert_eq!(nearly.status, ItemStatus::Lost);
}

#[tokio::test]
async fn test_sweep_is_idempotent_and_skips_malformed() {
    let store = spawn_store().await;
    let sweep = sweeper(&store);

    let stale_a = store.add_item(&new_item("Old jacket")).await.unwrap();
    let stale_b = store.add_item(&new_item("Old charger")).await.unwrap();
    let broken = store.add_item(&new_item("Mystery box")).await.unwrap();

    set_uploaded_at(&store, stale_a.id, &days_ago(40)).await;
    set_uploaded_at(&store, stale_b.id, &days_ago(45)).await;
    set_uploaded_at(&store, broken.id, "not-a-timestamp").await;

    let first = sweep.run().await.unwrap().expect("sweep should run");
    assert_eq!(first.examined, 3);
    assert_eq!(first.archived, 2);
    assert_eq!(first.skipped_malformed, 1);

    // The malformed row is left untouched, still lost.
    let untouched = store.get_item(broken.id).await.unwrap().unwrap();
    assert_eq!(untouched.status, ItemStatus::Lost);
    assert_eq!(untouched.uploaded_at, "not-a-timestamp");

    // A second pass finds nothing new to archive, and the guard releases
    // between passes so it actually runs.
    let second = sweep.run().await.unwrap().expect("second sweep should run");
    assert_eq!(second.examined, 1);
    assert_eq!(second.archived, 0);
    assert_eq!(second.skipped_malformed, 1);
}

#[tokio::test]
async fn test_sweep_ignores_collected_and_archived() {
    let store = spawn_store().await;
    let sweep = sweeper(&store);

    let collected = store.add_item(&new_item("Claimed wallet")).await.unwrap();
    set_uploaded_at(&store, collected.id, &days_ago(90)).await;
    store.mark_collected(collected.id).await.unwrap();

    let archived = store.add_item(&new_item("Shelved folder")).await.unwrap();
    set_uploaded_at(&store, archived.id, &days_ago(90)).await;
    store.archive_item(archived.id).await.unwrap();

    let outcome = sweep.run().await.unwrap().expect("sweep should run");
    assert_eq!(outcome.examined, 0);
    assert_eq!(outcome.archived, 0);

    let still_collected = store.get_item(collected.id).await.unwrap().unwrap();
    assert_eq!(still_collected.status, ItemStatus::Collected);
    assert!(still_collected.collected_at.is_some());
}

#[tokio::test]
async fn test_monthly_counts_bucket_layout() {
    let store = spawn_store().await;

    let _ = store.add_item(&new_item("This month A")).await.unwrap();
    let _ = store.add_item(&new_item("This month B")).await.unwrap();
    let old = store.add_item(&new_item("Earlier find")).await.unwrap();
    set_uploaded_at(&store, old.id, &days_ago(35)).await;
    let broken = store.add_item(&new_item("Broken stamp")).await.unwrap();
    set_uploaded_at(&store, broken.id, "garbage").await;

    let counts = store.monthly_item_counts(12).await.unwrap();
    assert_eq!(counts.len(), 12);

    // Oldest bucket first, current month last with today's uploads.
    let today = Utc::now().date_naive();
    let current = format!("{:04}-{:02}", today.year(), today.month());
    let last = counts.last().unwrap();
    assert_eq!(last.month, current);
    assert_eq!(last.count, 2);

    // The backdated find lands in an earlier bucket; the unparseable
    // timestamp counts nowhere.
    let total: u64 = counts.iter().map(|c| c.count).sum();
    assert_eq!(total, 3);
}

#[tokio::test]
async fn test_duplicate_username_preserves_original_account() {
    let store = spawn_store().await;
    let security = Config::default().security;

    assert!(!store.has_any_teacher().await.unwrap());
    assert!(
        !store
            .verify_teacher_password("frontdesk", "anything")
            .await
            .unwrap()
    );

    store
        .create_teacher("frontdesk", "original-password", &security)
        .await
        .unwrap();
    assert!(store.has_any_teacher().await.unwrap());

    let err = store
        .create_teacher("frontdesk", "impostor-password", &security)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateUsername(_)));

    // The first account's credentials survive the collision.
    assert!(
        store
            .verify_teacher_password("frontdesk", "original-password")
            .await
            .unwrap()
    );
    assert!(
        !store
            .verify_teacher_password("frontdesk", "impostor-password")
            .await
            .unwrap()
    );
    assert_eq!(store.count_teachers().await.unwrap(), 1);
}
