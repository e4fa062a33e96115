//! Loyalty engine: pure status computation and validated accruals.
//!
//! All point mutation flows through this one component so that display and
//! accrual can never drift. Status is a pure fold over a user's ledger
//! entries; accruals are validated here and handed to the `LedgerStore`,
//! whose unique `(user_id, kind, source_ref)` constraint settles duplicate
//! and concurrent attempts.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{AccrualRules, DiscountPolicy};
use crate::error::{LoyaltyError, Result};
use crate::interfaces::LedgerStore;
use crate::model::{EntryKind, LedgerEntry, LoyaltyStatus};

/// The loyalty rule engine.
pub struct LoyaltyEngine {
    store: Arc<dyn LedgerStore>,
    rules: AccrualRules,
    discount: DiscountPolicy,
}

impl LoyaltyEngine {
    /// Create an engine over a ledger store with the given rules.
    pub fn new(store: Arc<dyn LedgerStore>, rules: AccrualRules, discount: DiscountPolicy) -> Self {
        Self {
            store,
            rules,
            discount,
        }
    }

    /// Compute loyalty status from a sequence of ledger entries.
    ///
    /// Pure and order-independent: addition is commutative, so no ordering
    /// guarantee on the input is required. Level 1 is the floor; a user at
    /// an exact band boundary has just leveled up (0 points into the level,
    /// a full band to the next).
    pub fn compute_status(&self, entries: &[LedgerEntry]) -> LoyaltyStatus {
        let total_points: i64 = entries.iter().map(|e| e.points).sum();

        let band = self.rules.level_band;
        let banked = total_points.max(0);
        let level = banked / band + 1;
        let points_into_level = banked % band;
        let points_to_next_level = band - points_into_level;
        let discount_percent = level.min(self.discount.max_discount_level);

        LoyaltyStatus {
            total_points,
            level,
            points_into_level,
            points_to_next_level,
            discount_percent,
        }
    }

    /// Load a user's ledger and compute their current status.
    ///
    /// Read-only; safe to call concurrently from any number of readers.
    pub async fn status_for(&self, user_id: Uuid) -> Result<LoyaltyStatus> {
        let entries = self.store.list_by_user(user_id).await?;
        Ok(self.compute_status(&entries))
    }

    /// Resolve the discount actually applied at checkout.
    ///
    /// The level discount and the student discount do not stack; the larger
    /// of the two wins.
    pub fn effective_discount(&self, status: &LoyaltyStatus, student_eligible: bool) -> i64 {
        if student_eligible {
            status
                .discount_percent
                .max(self.discount.student_discount_percent)
        } else {
            status.discount_percent
        }
    }

    /// Validate and store an accrual entry.
    ///
    /// Fails with `InvalidAmount` for non-positive points or for the
    /// `Adjustment` kind, which has its own privileged path. A second call
    /// with the same `(user_id, kind, source_ref)` fails with
    /// `DuplicateSource` and leaves exactly one stored entry.
    pub async fn propose_accrual(
        &self,
        user_id: Uuid,
        kind: EntryKind,
        points: i64,
        source_ref: impl Into<String>,
    ) -> Result<LedgerEntry> {
        if !kind.is_accrual() || points <= 0 {
            return Err(LoyaltyError::InvalidAmount { kind, points });
        }

        let entry = LedgerEntry::new(user_id, kind, points, source_ref);
        self.store.append(&entry).await?;

        info!(
            user_id = %user_id,
            kind = %kind,
            points,
            source_ref = %entry.source_ref,
            "accrual recorded"
        );
        Ok(entry)
    }

    /// Record purchase points for a completed order: one point per
    /// `spend_per_point` currency units, truncating toward zero.
    ///
    /// Totals below one point's worth earn nothing and produce no entry;
    /// negative or zero totals are rejected.
    pub async fn record_purchase(
        &self,
        user_id: Uuid,
        order_total: i64,
        order_ref: &str,
    ) -> Result<Option<LedgerEntry>> {
        if order_total <= 0 {
            return Err(LoyaltyError::InvalidAmount {
                kind: EntryKind::Purchase,
                points: order_total,
            });
        }

        let points = order_total / self.rules.spend_per_point;
        if points == 0 {
            debug!(user_id = %user_id, order_total, "order below accrual threshold");
            return Ok(None);
        }

        let entry = self
            .propose_accrual(user_id, EntryKind::Purchase, points, order_ref)
            .await?;
        Ok(Some(entry))
    }

    /// Record review points for a product review.
    ///
    /// The product id is the idempotency source: one review bonus per user
    /// per product, no matter how often the handler retries. One-review-
    /// per-user-per-product is the review collaborator's rule and is not
    /// re-validated here.
    pub async fn record_review(&self, user_id: Uuid, product_id: Uuid) -> Result<LedgerEntry> {
        self.propose_accrual(
            user_id,
            EntryKind::Review,
            self.rules.review_points,
            product_id.to_string(),
        )
        .await
    }

    /// Record the referral bonus for a referrer.
    ///
    /// Keyed by the referred user's id, so a given referred user can trigger
    /// at most one bonus for their referrer even across registration retries.
    pub async fn record_referral_bonus(
        &self,
        referrer_id: Uuid,
        referred_id: Uuid,
    ) -> Result<LedgerEntry> {
        self.propose_accrual(
            referrer_id,
            EntryKind::Referral,
            self.rules.referral_points,
            referred_id.to_string(),
        )
        .await
    }

    /// Privileged manual correction, the only path for negative points.
    ///
    /// Rejects a zero delta and any delta that would drive the user's
    /// aggregate below zero. Adjustments are administrative; the caller is
    /// expected to serialize them per user.
    pub async fn propose_adjustment(
        &self,
        user_id: Uuid,
        delta: i64,
        source_ref: impl Into<String>,
    ) -> Result<LedgerEntry> {
        if delta == 0 {
            return Err(LoyaltyError::InvalidAmount {
                kind: EntryKind::Adjustment,
                points: delta,
            });
        }

        if delta < 0 {
            let entries = self.store.list_by_user(user_id).await?;
            let total: i64 = entries.iter().map(|e| e.points).sum();
            if total + delta < 0 {
                return Err(LoyaltyError::AdjustmentUnderflow {
                    user_id,
                    total,
                    delta,
                });
            }
        }

        let entry = LedgerEntry::new(user_id, EntryKind::Adjustment, delta, source_ref);
        self.store.append(&entry).await?;

        info!(user_id = %user_id, delta, source_ref = %entry.source_ref, "adjustment recorded");
        Ok(entry)
    }
}
