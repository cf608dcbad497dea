// In crates/analytics/src/lib.rs

pub mod cache;
pub mod calendar;
pub mod distribution;
pub mod drawdown;
pub mod engine;
pub mod equity_curve;
pub mod error;
pub mod metrics;
pub mod periodic;
pub mod summary;
pub mod trades;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use cache::{AnalyticsCache, CacheStats, InputFingerprint};
pub use calendar::CalendarProfitAggregator;
pub use distribution::{DEFAULT_NUM_BINS, TradeDistributionAnalyzer};
pub use drawdown::{DEFAULT_TOP_EPISODES, DrawdownAnalyzer};
pub use engine::{AnalyticsEngine, AnalyticsOptions};
pub use equity_curve::EquityCurveBuilder;
pub use error::{Error, Result};
pub use periodic::PeriodicReturnsAggregator;
pub use trades::PreparedTrades;
pub use types::{
    AnalyticsReport, CalendarBucket, CalendarProfits, DrawdownEpisode, DrawdownPoint,
    DrawdownReport, EquityBase, EquityBases, EquityPoint, HistogramBin, Period, PeriodReturn,
    PeriodicReturns, TradeDistribution, TradeSummary,
};
