//! ReferralStore interface tests.
//!
//! These tests verify the contract of the ReferralStore trait.
//! Each storage implementation should run these tests.

use uuid::Uuid;

use levelup_loyalty::interfaces::{ReferralStore, StorageError};
use levelup_loyalty::model::Referral;

// =============================================================================
// ReferralStore::record tests
// =============================================================================

pub async fn test_record_and_lookup<S: ReferralStore>(store: &S) {
    let referral = Referral::new(Uuid::new_v4(), Uuid::new_v4());

    store
        .record(&referral)
        .await
        .expect("record should succeed");

    let found = store
        .referrer_of(referral.referred_id)
        .await
        .expect("lookup should succeed")
        .expect("referral should exist");
    assert_eq!(found.referrer_id, referral.referrer_id);
    assert_eq!(found.referred_id, referral.referred_id);
}

pub async fn test_already_referred_rejected<S: ReferralStore>(store: &S) {
    let referred = Uuid::new_v4();
    let first = Referral::new(Uuid::new_v4(), referred);
    let second = Referral::new(Uuid::new_v4(), referred);

    store.record(&first).await.expect("first record should succeed");

    let result = store.record(&second).await;
    match result {
        Err(StorageError::AlreadyReferred { referred_id }) => {
            assert_eq!(referred_id, referred);
        }
        other => panic!("expected AlreadyReferred, got {:?}", other),
    }

    // First referrer is kept.
    let found = store
        .referrer_of(referred)
        .await
        .expect("lookup should succeed")
        .expect("referral should exist");
    assert_eq!(found.referrer_id, first.referrer_id);
}

pub async fn test_same_referrer_many_referred<S: ReferralStore>(store: &S) {
    let referrer = Uuid::new_v4();
    let referred: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

    for id in &referred {
        store
            .record(&Referral::new(referrer, *id))
            .await
            .expect("record should succeed");
    }

    let listed = store
        .list_by_referrer(referrer)
        .await
        .expect("list should succeed");
    assert_eq!(listed.len(), 3);
    for (i, referral) in listed.iter().enumerate() {
        assert_eq!(referral.referred_id, referred[i], "referral {} out of order", i);
    }
}

// =============================================================================
// ReferralStore lookup tests
// =============================================================================

pub async fn test_referrer_of_unknown_is_none<S: ReferralStore>(store: &S) {
    let found = store
        .referrer_of(Uuid::new_v4())
        .await
        .expect("lookup should succeed");
    assert!(found.is_none(), "unknown user should have no referrer");
}

pub async fn test_list_unknown_referrer_empty<S: ReferralStore>(store: &S) {
    let listed = store
        .list_by_referrer(Uuid::new_v4())
        .await
        .expect("list should succeed");
    assert!(listed.is_empty(), "unknown referrer should have no referrals");
}

/// Run all ReferralStore tests against the given store.
#[macro_export]
macro_rules! run_referral_store_tests {
    ($store:expr) => {
        use $crate::storage::referral_store_tests::*;

        // record tests
        test_record_and_lookup($store).await;
        println!("  test_record_and_lookup: PASSED");

        test_already_referred_rejected($store).await;
        println!("  test_already_referred_rejected: PASSED");

        test_same_referrer_many_referred($store).await;
        println!("  test_same_referrer_many_referred: PASSED");

        // lookup tests
        test_referrer_of_unknown_is_none($store).await;
        println!("  test_referrer_of_unknown_is_none: PASSED");

        test_list_unknown_referrer_empty($store).await;
        println!("  test_list_unknown_referrer_empty: PASSED");
    };
}
