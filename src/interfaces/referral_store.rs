//! Referral relationship storage interface.

use async_trait::async_trait;
use uuid::Uuid;

use super::ledger_store::Result;
use crate::model::Referral;

/// Interface for referral persistence.
///
/// A referred user has zero or one referrer, enforced by the store at write
/// time (unique constraint on `referred_id` in the SQL backends). Like the
/// ledger,
/// referrals are write-once: there is no update or delete.
#[async_trait]
pub trait ReferralStore: Send + Sync {
    /// Record a referral relationship.
    ///
    /// Fails with `AlreadyReferred` when the referred user already has a
    /// recorded referrer.
    async fn record(&self, referral: &Referral) -> Result<()>;

    /// Look up the referral that brought in a user, if any.
    async fn referrer_of(&self, referred_id: Uuid) -> Result<Option<Referral>>;

    /// List all referrals attributed to a referrer, in insertion order.
    async fn list_by_referrer(&self, referrer_id: Uuid) -> Result<Vec<Referral>>;
}
