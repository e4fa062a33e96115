//! In-memory ReferralStore implementation.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::interfaces::{ReferralStore, Result, StorageError};
use crate::model::Referral;

/// Referral store that keeps relationships in memory, in insertion order.
#[derive(Default)]
pub struct MemoryReferralStore {
    referrals: RwLock<Vec<Referral>>,
}

impl MemoryReferralStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReferralStore for MemoryReferralStore {
    async fn record(&self, referral: &Referral) -> Result<()> {
        let mut store = self.referrals.write().await;
        if store
            .iter()
            .any(|r| r.referred_id == referral.referred_id)
        {
            return Err(StorageError::AlreadyReferred {
                referred_id: referral.referred_id,
            });
        }
        store.push(referral.clone());
        Ok(())
    }

    async fn referrer_of(&self, referred_id: Uuid) -> Result<Option<Referral>> {
        let store = self.referrals.read().await;
        Ok(store.iter().find(|r| r.referred_id == referred_id).cloned())
    }

    async fn list_by_referrer(&self, referrer_id: Uuid) -> Result<Vec<Referral>> {
        let store = self.referrals.read().await;
        Ok(store
            .iter()
            .filter(|r| r.referrer_id == referrer_id)
            .cloned()
            .collect())
    }
}
