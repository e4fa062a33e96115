//! PostgreSQL implementations of storage interfaces.

mod ledger_store;
mod referral_store;

pub use ledger_store::PostgresLedgerStore;
pub use referral_store::PostgresReferralStore;
