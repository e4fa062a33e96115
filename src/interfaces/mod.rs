//! Abstract interfaces for loyalty components.
//!
//! These traits define the contracts for:
//! - Ledger storage (append-only point history)
//! - Referral storage (at-most-one referrer per user)

pub mod ledger_store;
pub mod referral_store;

pub use ledger_store::{LedgerStore, Result, StorageError};
pub use referral_store::ReferralStore;
