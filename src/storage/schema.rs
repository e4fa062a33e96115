//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query
//! building. The `seq` column is storage-internal: it gives `list_by_user`
//! a stable insertion order and never appears in the model types.

use sea_query::Iden;

/// Ledger entries table schema.
#[derive(Iden)]
pub enum LedgerEntries {
    Table,
    #[iden = "seq"]
    Seq,
    #[iden = "id"]
    Id,
    #[iden = "user_id"]
    UserId,
    #[iden = "kind"]
    Kind,
    #[iden = "points"]
    Points,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "source_ref"]
    SourceRef,
}

/// Referrals table schema.
#[derive(Iden)]
pub enum Referrals {
    Table,
    #[iden = "seq"]
    Seq,
    #[iden = "referred_id"]
    ReferredId,
    #[iden = "referrer_id"]
    ReferrerId,
    #[iden = "created_at"]
    CreatedAt,
}

/// SQL for creating the ledger table (SQLite).
///
/// The unique index on `(user_id, kind, source_ref)` is the idempotency
/// mechanism: concurrent duplicate accruals race here and exactly one wins.
#[cfg(feature = "sqlite")]
pub const CREATE_LEDGER_TABLE_SQLITE: &str = r#"
CREATE TABLE IF NOT EXISTS ledger_entries (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    user_id TEXT NOT NULL,
    kind TEXT NOT NULL,
    points INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    source_ref TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_ledger_user_kind_source
    ON ledger_entries(user_id, kind, source_ref);

CREATE INDEX IF NOT EXISTS idx_ledger_user ON ledger_entries(user_id);
"#;

/// SQL for creating the referrals table (SQLite).
#[cfg(feature = "sqlite")]
pub const CREATE_REFERRALS_TABLE_SQLITE: &str = r#"
CREATE TABLE IF NOT EXISTS referrals (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    referred_id TEXT NOT NULL UNIQUE,
    referrer_id TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_referrals_referrer ON referrals(referrer_id);
"#;

/// SQL for creating the ledger table (PostgreSQL).
#[cfg(feature = "postgres")]
pub const CREATE_LEDGER_TABLE_POSTGRES: &str = r#"
CREATE TABLE IF NOT EXISTS ledger_entries (
    seq BIGSERIAL PRIMARY KEY,
    id TEXT NOT NULL UNIQUE,
    user_id TEXT NOT NULL,
    kind TEXT NOT NULL,
    points BIGINT NOT NULL,
    created_at TEXT NOT NULL,
    source_ref TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_ledger_user_kind_source
    ON ledger_entries(user_id, kind, source_ref);

CREATE INDEX IF NOT EXISTS idx_ledger_user ON ledger_entries(user_id);
"#;

/// SQL for creating the referrals table (PostgreSQL).
#[cfg(feature = "postgres")]
pub const CREATE_REFERRALS_TABLE_POSTGRES: &str = r#"
CREATE TABLE IF NOT EXISTS referrals (
    seq BIGSERIAL PRIMARY KEY,
    referred_id TEXT NOT NULL UNIQUE,
    referrer_id TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_referrals_referrer ON referrals(referrer_id);
"#;
