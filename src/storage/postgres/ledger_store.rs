//! PostgreSQL LedgerStore implementation.

use async_trait::async_trait;
use sea_query::{Expr, Order, PostgresQueryBuilder, Query};
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::interfaces::{LedgerStore, Result, StorageError};
use crate::model::LedgerEntry;
use crate::storage::helpers::{parse_created_at, parse_kind, parse_uuid};
use crate::storage::schema::{LedgerEntries, CREATE_LEDGER_TABLE_POSTGRES};

/// PostgreSQL implementation of LedgerStore.
pub struct PostgresLedgerStore {
    pool: PgPool,
}

impl PostgresLedgerStore {
    /// Create a new PostgreSQL ledger store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the ledger table and indexes if they do not exist.
    pub async fn init(&self) -> Result<()> {
        sqlx::raw_sql(CREATE_LEDGER_TABLE_POSTGRES)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn decode_row(row: &PgRow) -> Result<LedgerEntry> {
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
impl LedgerStore for PostgresLedgerStore {
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
            .to_string(PostgresQueryBuilder);

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
            .to_string(PostgresQueryBuilder);

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
