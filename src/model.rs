//! Core loyalty data types.
//!
//! A user's loyalty state is never stored directly; it is derived on demand
//! by folding the user's immutable ledger entries. This keeps the displayed
//! point balance and the accrual history from ever drifting apart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of a ledger entry.
///
/// A closed set rather than a free-form string so that no unvalidated point
/// source can enter the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Purchase,
    Review,
    Referral,
    Adjustment,
}

impl EntryKind {
    /// Stable string form, used as the `kind` column in SQL backends.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Purchase => "purchase",
            EntryKind::Review => "review",
            EntryKind::Referral => "referral",
            EntryKind::Adjustment => "adjustment",
        }
    }

    /// Parse the stable string form back into a kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "purchase" => Some(EntryKind::Purchase),
            "review" => Some(EntryKind::Review),
            "referral" => Some(EntryKind::Referral),
            "adjustment" => Some(EntryKind::Adjustment),
            _ => None,
        }
    }

    /// Whether this kind adds points and must carry a positive amount.
    ///
    /// `Adjustment` is the only kind permitted to be negative, and only
    /// through the privileged adjustment path.
    pub fn is_accrual(&self) -> bool {
        !matches!(self, EntryKind::Adjustment)
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of a single point-earning or point-adjusting event.
///
/// Entries are created once and never mutated or deleted; corrections append
/// a compensating `Adjustment` entry, so history stays reconstructable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: EntryKind,
    pub points: i64,
    pub created_at: DateTime<Utc>,
    /// Opaque reference to the originating order/review/referral.
    ///
    /// `(user_id, kind, source_ref)` is the idempotency key: the store
    /// rejects a second entry with the same triple.
    pub source_ref: String,
}

impl LedgerEntry {
    /// Build a new entry stamped with a fresh id and the current time.
    pub fn new(
        user_id: Uuid,
        kind: EntryKind,
        points: i64,
        source_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            points,
            created_at: Utc::now(),
            source_ref: source_ref.into(),
        }
    }
}

/// Derived loyalty standing for a user.
///
/// Recomputed from the ledger on every read; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyStatus {
    pub total_points: i64,
    pub level: i64,
    pub points_into_level: i64,
    pub points_to_next_level: i64,
    pub discount_percent: i64,
}

/// Referrer/referred relationship, recorded at most once per referred user.
///
/// Carries no points itself; it only gates the single `Referral` ledger
/// entry awarded to the referrer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referral {
    pub referrer_id: Uuid,
    pub referred_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Referral {
    pub fn new(referrer_id: Uuid, referred_id: Uuid) -> Self {
        Self {
            referrer_id,
            referred_id,
            created_at: Utc::now(),
        }
    }
}
