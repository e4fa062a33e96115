//! Library-level error taxonomy.

use uuid::Uuid;

use crate::interfaces::StorageError;
use crate::model::EntryKind;

/// Errors surfaced to storefront callers.
///
/// None of these are fatal to the process; each is scoped to the single
/// loyalty operation that produced it. In particular `DuplicateSource` is
/// the idempotency signal, not a failure: callers retrying after a transient
/// error should treat it as "already recorded, no-op".
#[derive(Debug, thiserror::Error)]
pub enum LoyaltyError {
    #[error("invalid amount {points} for {kind} accrual")]
    InvalidAmount { kind: EntryKind, points: i64 },

    #[error("points already awarded for {kind} source {source_ref}")]
    DuplicateSource { kind: EntryKind, source_ref: String },

    #[error("user {user_id} cannot refer themselves")]
    SelfReferral { user_id: Uuid },

    #[error("user {referred_id} already has a referrer")]
    AlreadyReferred { referred_id: Uuid },

    #[error("adjustment of {delta} would drive user {user_id} below zero (current total {total})")]
    AdjustmentUnderflow {
        user_id: Uuid,
        total: i64,
        delta: i64,
    },

    #[error("storage failure: {0}")]
    Storage(StorageError),
}

impl LoyaltyError {
    /// Whether this is the at-most-once idempotency signal.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, LoyaltyError::DuplicateSource { .. })
    }
}

impl From<StorageError> for LoyaltyError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DuplicateSource {
                kind, source_ref, ..
            } => LoyaltyError::DuplicateSource { kind, source_ref },
            StorageError::AlreadyReferred { referred_id } => {
                LoyaltyError::AlreadyReferred { referred_id }
            }
            other => LoyaltyError::Storage(other),
        }
    }
}

/// Result type for loyalty operations.
pub type Result<T> = std::result::Result<T, LoyaltyError>;
