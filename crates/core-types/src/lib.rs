// In crates/core-types/src/lib.rs

pub mod error;
pub mod strategy;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use error::{Error, Result};
pub use strategy::StrategyMetadata;
pub use types::{Amount, MAX_ABS_NET_PROFIT, Trade, TradeRecord, validate_records};
