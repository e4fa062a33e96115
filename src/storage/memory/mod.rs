//! In-memory reference implementations of the storage interfaces.
//!
//! Enforce the same uniqueness the SQL backends get from their indexes.
//! Used as the reference store in tests and as the `memory` storage type.

mod ledger_store;
mod referral_store;

pub use ledger_store::MemoryLedgerStore;
pub use referral_store::MemoryReferralStore;
