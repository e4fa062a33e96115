//! SQLite ReferralStore implementation.

use async_trait::async_trait;
use sea_query::{Expr, Order, Query, SqliteQueryBuilder};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use crate::interfaces::{ReferralStore, Result, StorageError};
use crate::model::Referral;
use crate::storage::helpers::{parse_created_at, parse_uuid};
use crate::storage::schema::{Referrals, CREATE_REFERRALS_TABLE_SQLITE};

/// SQLite implementation of ReferralStore.
///
/// The unique constraint on `referred_id` enforces at most one referrer per
/// referred user; a violation is surfaced as `AlreadyReferred`.
pub struct SqliteReferralStore {
    pool: SqlitePool,
}

impl SqliteReferralStore {
    /// Create a new SQLite referral store.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the referrals table and index if they do not exist.
    pub async fn init(&self) -> Result<()> {
        sqlx::raw_sql(CREATE_REFERRALS_TABLE_SQLITE)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn decode_row(row: &SqliteRow) -> Result<Referral> {
        let referrer_id: String = row.get("referrer_id");
        let referred_id: String = row.get("referred_id");
        let created_at: String = row.get("created_at");

        Ok(Referral {
            referrer_id: parse_uuid(&referrer_id)?,
            referred_id: parse_uuid(&referred_id)?,
            created_at: parse_created_at(&created_at)?,
        })
    }
}

#[async_trait]
impl ReferralStore for SqliteReferralStore {
    async fn record(&self, referral: &Referral) -> Result<()> {
        let query = Query::insert()
            .into_table(Referrals::Table)
            .columns([
                Referrals::ReferredId,
                Referrals::ReferrerId,
                Referrals::CreatedAt,
            ])
            .values_panic([
                referral.referred_id.to_string().into(),
                referral.referrer_id.to_string().into(),
                referral.created_at.to_rfc3339().into(),
            ])
            .to_string(SqliteQueryBuilder);

        sqlx::query(&query).execute(&self.pool).await.map_err(|e| {
            match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    StorageError::AlreadyReferred {
                        referred_id: referral.referred_id,
                    }
                }
                _ => StorageError::Database(e),
            }
        })?;

        Ok(())
    }

    async fn referrer_of(&self, referred_id: Uuid) -> Result<Option<Referral>> {
        let query = Query::select()
            .columns([
                Referrals::ReferredId,
                Referrals::ReferrerId,
                Referrals::CreatedAt,
            ])
            .from(Referrals::Table)
            .and_where(Expr::col(Referrals::ReferredId).eq(referred_id.to_string()))
            .to_string(SqliteQueryBuilder);

        let row = sqlx::query(&query).fetch_optional(&self.pool).await?;

        row.map(|r| Self::decode_row(&r)).transpose()
    }

    async fn list_by_referrer(&self, referrer_id: Uuid) -> Result<Vec<Referral>> {
        let query = Query::select()
            .columns([
                Referrals::ReferredId,
                Referrals::ReferrerId,
                Referrals::CreatedAt,
            ])
            .from(Referrals::Table)
            .and_where(Expr::col(Referrals::ReferrerId).eq(referrer_id.to_string()))
            .order_by(Referrals::Seq, Order::Asc)
            .to_string(SqliteQueryBuilder);

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        let mut referrals = Vec::with_capacity(rows.len());
        for row in rows {
            referrals.push(Self::decode_row(&row)?);
        }

        Ok(referrals)
    }
}
