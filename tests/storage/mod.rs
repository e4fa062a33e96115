//! Shared storage integration tests.
//!
//! Tests the LedgerStore and ReferralStore interfaces against all
//! implementations. Each implementation module imports these test functions
//! and runs them.

pub mod ledger_store_tests;
pub mod referral_store_tests;
