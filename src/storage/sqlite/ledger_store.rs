//! SQLite LedgerStore implementation.

use async_trait::async_trait;
use sea_query::{Expr, Order, Query, SqliteQueryBuilder};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use crate::interfaces::{LedgerStore, Result, StorageError};
use crate::model::LedgerEntry;
use crate::storage::helpers::{parse_created_at, parse_kind, parse_uuid};
use crate::storage::schema::{LedgerEntries, CREATE_LEDGER_TABLE_SQLITE};

/// SQLite implementation of LedgerStore.
///
/// The unique index on `(user_id, kind, source_ref)` enforces at-most-once
/// accrual; a violation is surfaced as `DuplicateSource`.
pub struct SqliteLedgerStore {
    pool: SqlitePool,
}

impl SqliteLedgerStore {
    /// Create a new SQLite ledger store.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the ledger table and indexes if they do not exist.
    pub async fn init(&self) -> Result<()> {
        sqlx::raw_sql(CREATE_LEDGER_TABLE_SQLITE)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn decode_row(row: &SqliteRow) -> Result<LedgerEntry> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let kind: String = row.get("kind");
        let created_at: String = row.get("created_at");

        Ok(LedgerEntry {
            id: parse_uuid(&id)?,
            user_id: parse_uuid(&user_id)?,
            kind: parse_kind(&kind)?,
            points: row.get("points"),
            created_at: parse_created_at(&created_at)?,
            source_ref: row.get("source_ref"),
        })
    }
}

#[async_trait]
impl LedgerStore for SqliteLedgerStore {
    async fn append(&self, entry: &LedgerEntry) -> Result<()> {
        let query = Query::insert()
            .into_table(LedgerEntries::Table)
            .columns([
                LedgerEntries::Id,
                LedgerEntries::UserId,
                LedgerEntries::Kind,
                LedgerEntries::Points,
                LedgerEntries::CreatedAt,
                LedgerEntries::SourceRef,
            ])
            .values_panic([
                entry.id.to_string().into(),
                entry.user_id.to_string().into(),
                entry.kind.as_str().into(),
                entry.points.into(),
                entry.created_at.to_rfc3339().into(),
                entry.source_ref.clone().into(),
            ])
            .to_string(SqliteQueryBuilder);

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, entry))?;

        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<LedgerEntry>> {
        let query = Query::select()
            .columns([
                LedgerEntries::Id,
                LedgerEntries::UserId,
                LedgerEntries::Kind,
                LedgerEntries::Points,
                LedgerEntries::CreatedAt,
                LedgerEntries::SourceRef,
            ])
            .from(LedgerEntries::Table)
            .and_where(Expr::col(LedgerEntries::UserId).eq(user_id.to_string()))
            .order_by(LedgerEntries::Seq, Order::Asc)
            .to_string(SqliteQueryBuilder);

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            entries.push(Self::decode_row(&row)?);
        }

        Ok(entries)
    }
}

/// Map a unique-index violation on append to the idempotency outcome.
fn map_unique_violation(err: sqlx::Error, entry: &LedgerEntry) -> StorageError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::DuplicateSource {
            user_id: entry.user_id,
            kind: entry.kind,
            source_ref: entry.source_ref.clone(),
        },
        _ => StorageError::Database(err),
    }
}
