//! LevelUp Loyalty - points, levels, and referral rewards
//!
//! A Rust implementation of the LevelUp rewards program: an append-only
//! points ledger, a pure rules engine deriving levels and discounts from
//! ledger history, and a referral tracker that pays referrer bonuses.

pub mod config;
pub mod engine;
pub mod error;
pub mod interfaces;
pub mod model;
pub mod referral;
pub mod storage;

pub use config::{AccrualRules, Config, DiscountPolicy};
pub use engine::LoyaltyEngine;
pub use error::{LoyaltyError, Result};
pub use model::{EntryKind, LedgerEntry, LoyaltyStatus, Referral};
pub use referral::ReferralTracker;
