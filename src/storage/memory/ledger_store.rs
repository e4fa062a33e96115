//! In-memory LedgerStore implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::interfaces::{LedgerStore, Result, StorageError};
use crate::model::LedgerEntry;

/// Ledger store that keeps entries in memory.
///
/// The duplicate check happens under the write lock, giving the same
/// exactly-one-winner guarantee as a SQL unique index.
#[derive(Default)]
pub struct MemoryLedgerStore {
    entries: RwLock<HashMap<Uuid, Vec<LedgerEntry>>>,
    fail_on_append: RwLock<bool>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent appends fail, for error-path tests.
    pub async fn set_fail_on_append(&self, fail: bool) {
        *self.fail_on_append.write().await = fail;
    }

    /// Total number of stored entries across all users.
    pub async fn len(&self) -> usize {
        self.entries.read().await.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn append(&self, entry: &LedgerEntry) -> Result<()> {
        if *self.fail_on_append.read().await {
            return Err(StorageError::Failure("injected append failure".into()));
        }

        let mut store = self.entries.write().await;
        let user_entries = store.entry(entry.user_id).or_default();

        let duplicate = user_entries
            .iter()
            .any(|e| e.kind == entry.kind && e.source_ref == entry.source_ref);
        if duplicate {
            return Err(StorageError::DuplicateSource {
                user_id: entry.user_id,
                kind: entry.kind,
                source_ref: entry.source_ref.clone(),
            });
        }

        user_entries.push(entry.clone());
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<LedgerEntry>> {
        let store = self.entries.read().await;
        Ok(store.get(&user_id).cloned().unwrap_or_default())
    }
}
