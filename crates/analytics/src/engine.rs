use crate::calendar::CalendarProfitAggregator;
use crate::distribution::{DEFAULT_NUM_BINS, TradeDistributionAnalyzer};
use crate::drawdown::{DEFAULT_TOP_EPISODES, DrawdownAnalyzer};
use crate::equity_curve::EquityCurveBuilder;
use crate::periodic::PeriodicReturnsAggregator;
use crate::summary::summarize;
use crate::trades::PreparedTrades;
use crate::types::{AnalyticsReport, EquityBases};
use crate::Result;
use core_types::{StrategyMetadata, TradeRecord};
use serde::{Deserialize, Serialize};

/// Scalar parameters shared by one engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsOptions {
    pub num_bins: usize,
    pub top_drawdowns: usize,
    pub equity_bases: EquityBases,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            num_bins: DEFAULT_NUM_BINS,
            top_drawdowns: DEFAULT_TOP_EPISODES,
            equity_bases: EquityBases::default(),
        }
    }
}

/// The engine responsible for deriving every analytics view from trade data.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    options: AnalyticsOptions,
    distribution: TradeDistributionAnalyzer,
    drawdown: DrawdownAnalyzer,
}

impl AnalyticsEngine {
    pub fn new(options: AnalyticsOptions) -> Result<Self> {
        Ok(Self {
            distribution: TradeDistributionAnalyzer::new(options.num_bins)?,
            drawdown: DrawdownAnalyzer::new(options.top_drawdowns),
            options,
        })
    }

    pub fn options(&self) -> &AnalyticsOptions {
        &self.options
    }

    /// Validates and sorts raw records, then calculates the full report.
    pub fn calculate_records(
        &self,
        strategy: &StrategyMetadata,
        records: &[TradeRecord],
    ) -> Result<AnalyticsReport> {
        let trades = PreparedTrades::from_records(records)?;
        Ok(self.calculate(strategy, &trades))
    }

    /// Calculates a full report. An empty trade sequence gives an all-empty report.
    pub fn calculate(&self, strategy: &StrategyMetadata, trades: &PreparedTrades) -> AnalyticsReport {
        let trades = trades.as_slice();

        // The drawdown scan reuses the curve rather than rebuilding it.
        let equity_curve = EquityCurveBuilder::from_strategy(strategy).build(trades);
        let drawdown = self.drawdown.analyze(&equity_curve);

        AnalyticsReport {
            strategy: strategy.name.clone(),
            initial_capital: strategy.initial_capital,
            summary: summarize(trades),
            equity_curve,
            drawdown,
            returns: PeriodicReturnsAggregator::aggregate_all(
                trades,
                strategy.initial_capital,
                self.options.equity_bases,
            ),
            distribution: self.distribution.analyze(trades),
            calendar: CalendarProfitAggregator::new().aggregate(trades),
        }
    }
}
