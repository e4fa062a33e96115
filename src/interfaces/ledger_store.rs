//! Ledger storage interface.

use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{EntryKind, LedgerEntry};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("duplicate source: user={user_id}, kind={kind}, source_ref={source_ref}")]
    DuplicateSource {
        user_id: Uuid,
        kind: EntryKind,
        source_ref: String,
    },

    #[error("user {referred_id} already has a recorded referrer")]
    AlreadyReferred { referred_id: Uuid },

    #[error("unknown entry kind in storage: {0}")]
    UnknownKind(String),

    #[error("invalid timestamp in storage: {0}")]
    InvalidTimestamp(String),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[cfg(any(feature = "sqlite", feature = "postgres"))]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage failure: {0}")]
    Failure(String),
}

/// Interface for ledger persistence.
///
/// The ledger is append-only: no update or delete operations exist. The
/// store enforces uniqueness on `(user_id, kind, source_ref)` atomically at
/// write time; concurrent duplicate appends race at the storage layer and
/// exactly one succeeds, the other observing `DuplicateSource`.
///
/// Implementations:
/// - `MemoryLedgerStore`: in-memory reference implementation
/// - `SqliteLedgerStore`: SQLite storage (unique index)
/// - `PostgresLedgerStore`: PostgreSQL storage (unique index)
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Append one entry to the ledger.
    ///
    /// Fails with `DuplicateSource` when an entry with the same
    /// `(user_id, kind, source_ref)` already exists.
    async fn append(&self, entry: &LedgerEntry) -> Result<()>;

    /// Retrieve all entries for a user, in insertion order.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<LedgerEntry>>;
}
