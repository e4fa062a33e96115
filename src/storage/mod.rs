//! Storage implementations.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::{StorageConfig, StorageType};
use crate::interfaces::{LedgerStore, ReferralStore};

pub mod memory;

#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub mod helpers;
#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub mod schema;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::{MemoryLedgerStore, MemoryReferralStore};

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteLedgerStore, SqliteReferralStore};

#[cfg(feature = "postgres")]
pub use postgres::{PostgresLedgerStore, PostgresReferralStore};

/// Initialize storage based on configuration.
///
/// Returns tuple of (LedgerStore, ReferralStore) implementations based on
/// the configured storage type.
pub async fn init_storage(
    config: &StorageConfig,
) -> Result<(Arc<dyn LedgerStore>, Arc<dyn ReferralStore>), Box<dyn std::error::Error>> {
    info!("Storage: {}", config.storage_type);

    match config.storage_type {
        StorageType::Memory => {
            let ledger_store = Arc::new(MemoryLedgerStore::new());
            let referral_store = Arc::new(MemoryReferralStore::new());

            Ok((ledger_store, referral_store))
        }
        #[cfg(feature = "sqlite")]
        StorageType::Sqlite => {
            let path = &config.sqlite.path;
            if let Some(parent) = std::path::Path::new(path).parent() {
                std::fs::create_dir_all(parent)?;
            }

            let pool = sqlx::SqlitePool::connect(&format!("sqlite:{}?mode=rwc", path)).await?;

            let ledger_store = Arc::new(SqliteLedgerStore::new(pool.clone()));
            ledger_store.init().await?;

            let referral_store = Arc::new(SqliteReferralStore::new(pool));
            referral_store.init().await?;

            Ok((ledger_store, referral_store))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageType::Sqlite => {
            error!("SQLite storage requested but 'sqlite' feature is not enabled");
            Err("SQLite feature not enabled".into())
        }
        #[cfg(feature = "postgres")]
        StorageType::Postgres => {
            let pool = sqlx::PgPool::connect(&config.postgres.uri).await?;

            let ledger_store = Arc::new(PostgresLedgerStore::new(pool.clone()));
            ledger_store.init().await?;

            let referral_store = Arc::new(PostgresReferralStore::new(pool));
            referral_store.init().await?;

            Ok((ledger_store, referral_store))
        }
        #[cfg(not(feature = "postgres"))]
        StorageType::Postgres => {
            error!("PostgreSQL storage requested but 'postgres' feature is not enabled");
            Err("PostgreSQL feature not enabled".into())
        }
    }
}
