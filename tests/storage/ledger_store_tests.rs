//! LedgerStore interface tests.
//!
//! These tests verify the contract of the LedgerStore trait.
//! Each storage implementation should run these tests.

use uuid::Uuid;

use levelup_loyalty::interfaces::{LedgerStore, StorageError};
use levelup_loyalty::model::{EntryKind, LedgerEntry};

/// Create a test entry for the given user.
pub fn make_entry(user_id: Uuid, kind: EntryKind, points: i64, source_ref: &str) -> LedgerEntry {
    LedgerEntry::new(user_id, kind, points, source_ref)
}

// =============================================================================
// LedgerStore::append tests
// =============================================================================

pub async fn test_append_and_list<S: LedgerStore>(store: &S) {
    let user = Uuid::new_v4();
    let entry = make_entry(user, EntryKind::Purchase, 3, "order-1");

    store.append(&entry).await.expect("append should succeed");

    let entries = store
        .list_by_user(user)
        .await
        .expect("list should succeed");
    assert_eq!(entries.len(), 1, "should have 1 entry");
    assert_eq!(entries[0].id, entry.id);
    assert_eq!(entries[0].kind, EntryKind::Purchase);
    assert_eq!(entries[0].points, 3);
    assert_eq!(entries[0].source_ref, "order-1");
}

pub async fn test_list_preserves_insertion_order<S: LedgerStore>(store: &S) {
    let user = Uuid::new_v4();
    let refs = ["order-a", "order-b", "order-c", "order-d"];

    for (i, source_ref) in refs.iter().enumerate() {
        let entry = make_entry(user, EntryKind::Purchase, i as i64 + 1, source_ref);
        store.append(&entry).await.expect("append should succeed");
    }

    let entries = store
        .list_by_user(user)
        .await
        .expect("list should succeed");
    assert_eq!(entries.len(), 4, "should have 4 entries");
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.source_ref, refs[i], "entry {} out of order", i);
    }
}

pub async fn test_duplicate_source_rejected<S: LedgerStore>(store: &S) {
    let user = Uuid::new_v4();
    let first = make_entry(user, EntryKind::Review, 100, "prod-7");
    let second = make_entry(user, EntryKind::Review, 100, "prod-7");

    store.append(&first).await.expect("first append should succeed");

    let result = store.append(&second).await;
    match result {
        Err(StorageError::DuplicateSource {
            user_id,
            kind,
            source_ref,
        }) => {
            assert_eq!(user_id, user);
            assert_eq!(kind, EntryKind::Review);
            assert_eq!(source_ref, "prod-7");
        }
        other => panic!("expected DuplicateSource, got {:?}", other),
    }

    let entries = store
        .list_by_user(user)
        .await
        .expect("list should succeed");
    assert_eq!(entries.len(), 1, "duplicate must not be stored");
}

pub async fn test_same_source_different_kind_allowed<S: LedgerStore>(store: &S) {
    let user = Uuid::new_v4();

    store
        .append(&make_entry(user, EntryKind::Purchase, 5, "ref-1"))
        .await
        .expect("purchase append should succeed");
    store
        .append(&make_entry(user, EntryKind::Review, 100, "ref-1"))
        .await
        .expect("same ref under different kind should succeed");

    let entries = store
        .list_by_user(user)
        .await
        .expect("list should succeed");
    assert_eq!(entries.len(), 2);
}

pub async fn test_same_source_different_user_allowed<S: LedgerStore>(store: &S) {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    store
        .append(&make_entry(alice, EntryKind::Review, 100, "prod-9"))
        .await
        .expect("first user append should succeed");
    store
        .append(&make_entry(bob, EntryKind::Review, 100, "prod-9"))
        .await
        .expect("second user append should succeed");

    let alice_entries = store.list_by_user(alice).await.expect("list should succeed");
    let bob_entries = store.list_by_user(bob).await.expect("list should succeed");
    assert_eq!(alice_entries.len(), 1);
    assert_eq!(bob_entries.len(), 1);
}

pub async fn test_negative_adjustment_stored<S: LedgerStore>(store: &S) {
    let user = Uuid::new_v4();
    let entry = make_entry(user, EntryKind::Adjustment, -250, "support-ticket-42");

    store.append(&entry).await.expect("append should succeed");

    let entries = store
        .list_by_user(user)
        .await
        .expect("list should succeed");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].points, -250);
    assert_eq!(entries[0].kind, EntryKind::Adjustment);
}

// =============================================================================
// LedgerStore::list_by_user tests
// =============================================================================

pub async fn test_list_unknown_user_empty<S: LedgerStore>(store: &S) {
    let entries = store
        .list_by_user(Uuid::new_v4())
        .await
        .expect("list should succeed");
    assert!(entries.is_empty(), "unknown user should have no entries");
}

pub async fn test_list_isolates_users<S: LedgerStore>(store: &S) {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    store
        .append(&make_entry(alice, EntryKind::Purchase, 2, "order-x"))
        .await
        .expect("append should succeed");
    store
        .append(&make_entry(bob, EntryKind::Referral, 500, alice.to_string().as_str()))
        .await
        .expect("append should succeed");

    let alice_entries = store.list_by_user(alice).await.expect("list should succeed");
    assert_eq!(alice_entries.len(), 1);
    assert!(alice_entries.iter().all(|e| e.user_id == alice));
}

pub async fn test_concurrent_duplicate_single_winner<S: LedgerStore>(store: &S) {
    let user = Uuid::new_v4();
    let a = make_entry(user, EntryKind::Review, 100, "prod-race");
    let b = make_entry(user, EntryKind::Review, 100, "prod-race");

    let (ra, rb) = tokio::join!(store.append(&a), store.append(&b));

    let oks = [&ra, &rb].iter().filter(|r| r.is_ok()).count();
    assert_eq!(oks, 1, "exactly one concurrent append should win");

    let entries = store
        .list_by_user(user)
        .await
        .expect("list should succeed");
    assert_eq!(entries.len(), 1, "only the winner should be stored");
}

/// Run all LedgerStore tests against the given store.
#[macro_export]
macro_rules! run_ledger_store_tests {
    ($store:expr) => {
        use $crate::storage::ledger_store_tests::*;

        // append tests
        test_append_and_list($store).await;
        println!("  test_append_and_list: PASSED");

        test_list_preserves_insertion_order($store).await;
        println!("  test_list_preserves_insertion_order: PASSED");

        test_duplicate_source_rejected($store).await;
        println!("  test_duplicate_source_rejected: PASSED");

        test_same_source_different_kind_allowed($store).await;
        println!("  test_same_source_different_kind_allowed: PASSED");

        test_same_source_different_user_allowed($store).await;
        println!("  test_same_source_different_user_allowed: PASSED");

        test_negative_adjustment_stored($store).await;
        println!("  test_negative_adjustment_stored: PASSED");

        // list tests
        test_list_unknown_user_empty($store).await;
        println!("  test_list_unknown_user_empty: PASSED");

        test_list_isolates_users($store).await;
        println!("  test_list_isolates_users: PASSED");

        test_concurrent_duplicate_single_winner($store).await;
        println!("  test_concurrent_duplicate_single_winner: PASSED");
    };
}
