//! Referral tracker: records referrer/referred relationships exactly once
//! and triggers the referral bonus.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::engine::LoyaltyEngine;
use crate::error::{LoyaltyError, Result};
use crate::interfaces::{ReferralStore, StorageError};
use crate::model::Referral;

/// Tracks referral relationships and awards the referrer bonus.
///
/// Invoked by the registration collaborator when a new registration carries
/// a referrer identifier. Whether that identifier belongs to a real, active
/// account is the registration collaborator's check, made before this
/// tracker is called.
pub struct ReferralTracker {
    store: Arc<dyn ReferralStore>,
    engine: Arc<LoyaltyEngine>,
}

impl ReferralTracker {
    pub fn new(store: Arc<dyn ReferralStore>, engine: Arc<LoyaltyEngine>) -> Self {
        Self { store, engine }
    }

    /// Record that `referred_id` was brought in by `referrer_id` and award
    /// the referral bonus to the referrer.
    ///
    /// Fails with `SelfReferral` when the two ids are equal and with
    /// `AlreadyReferred` when the referred user already has a recorded
    /// referrer. Both are non-fatal to the caller: registration proceeds,
    /// the bonus simply is not granted. The bonus accrual is keyed by the
    /// referred user's id, so retries cannot award it twice.
    ///
    /// A retry after a transient bonus failure lands on the `AlreadyReferred`
    /// branch; when the stored referrer matches, the bonus accrual is
    /// re-attempted before the signal is returned, so the relationship and
    /// the bonus cannot stay permanently out of step.
    pub async fn register_referral(
        &self,
        referrer_id: Uuid,
        referred_id: Uuid,
    ) -> Result<Referral> {
        if referrer_id == referred_id {
            return Err(LoyaltyError::SelfReferral {
                user_id: referrer_id,
            });
        }

        let referral = Referral::new(referrer_id, referred_id);
        match self.store.record(&referral).await {
            Ok(()) => {
                info!(referrer_id = %referrer_id, referred_id = %referred_id, "referral recorded");
                self.ensure_bonus(referrer_id, referred_id).await?;
                Ok(referral)
            }
            Err(StorageError::AlreadyReferred { .. }) => {
                let existing = self.store.referrer_of(referred_id).await?;
                if existing.map(|r| r.referrer_id) == Some(referrer_id) {
                    self.ensure_bonus(referrer_id, referred_id).await?;
                }
                Err(LoyaltyError::AlreadyReferred { referred_id })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Award the referral bonus, treating an already-stored bonus as success.
    ///
    /// The accrual is keyed by `referred_id`, so `DuplicateSource` here means
    /// an earlier attempt landed and there is nothing left to do.
    async fn ensure_bonus(&self, referrer_id: Uuid, referred_id: Uuid) -> Result<()> {
        match self
            .engine
            .record_referral_bonus(referrer_id, referred_id)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if e.is_duplicate() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// List the referrals attributed to a referrer, for profile display.
    pub async fn referrals_of(&self, referrer_id: Uuid) -> Result<Vec<Referral>> {
        Ok(self.store.list_by_referrer(referrer_id).await?)
    }

    /// Look up who referred a user, if anyone.
    pub async fn referrer_of(&self, referred_id: Uuid) -> Result<Option<Referral>> {
        Ok(self.store.referrer_of(referred_id).await?)
    }
}
