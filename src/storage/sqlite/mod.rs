//! SQLite implementations of storage interfaces.

mod ledger_store;
mod referral_store;

pub use ledger_store::SqliteLedgerStore;
pub use referral_store::SqliteReferralStore;
