// In crates/analytics/src/types.rs

use crate::Error;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A struct to hold a point in the strategy's equity curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub equity: Decimal,
}

/// One point of the drawdown chart, aligned with the equity curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    pub timestamp: DateTime<Utc>,
    /// Dollars below the running peak. Never negative.
    pub drawdown: Decimal,
    /// Percent below the running peak. Never positive.
    pub drawdown_percent: Decimal,
}

/// A maximal stretch during which equity stayed below its prior running peak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawdownEpisode {
    pub start_date: DateTime<Utc>,
    pub start_equity: Decimal,
    pub trough_date: DateTime<Utc>,
    pub trough_equity: Decimal,
    /// `None` while the episode is still open at the end of the trade sequence.
    pub recovery_date: Option<DateTime<Utc>>,
    /// `start_equity - trough_equity`.
    pub drawdown_amount: Decimal,
    /// `(trough_equity - start_equity) / start_equity * 100`.
    pub drawdown_percent: Decimal,
}

impl DrawdownEpisode {
    pub fn is_recovered(&self) -> bool {
        self.recovery_date.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawdownReport {
    pub series: Vec<DrawdownPoint>,
    /// Every episode, ordered by `start_date`.
    pub episodes: Vec<DrawdownEpisode>,
    /// The most severe episodes, worst first.
    pub worst: Vec<DrawdownEpisode>,
    pub max_drawdown: Decimal,
    pub max_drawdown_percent: Decimal,
}

/// The calendar bucket size used for periodic returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Annual,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Daily, Period::Weekly, Period::Monthly, Period::Annual];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Annual => "annual",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Period::Daily),
            "weekly" | "week" => Ok(Period::Weekly),
            "monthly" | "month" => Ok(Period::Monthly),
            "annual" | "yearly" | "year" => Ok(Period::Annual),
            other => Err(Error::InvalidParameter(format!("unknown period `{other}`"))),
        }
    }
}

/// The denominator used to turn a period's net profit into a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquityBase {
    /// The strategy's initial capital.
    InitialCapital,
    /// A fixed amount supplied by the caller.
    Fixed(Decimal),
    /// Equity at the start of the period: initial capital plus every earlier trade.
    PeriodStart,
}

impl EquityBase {
    pub fn resolve(&self, initial_capital: Decimal, period_start_equity: Decimal) -> Decimal {
        match self {
            EquityBase::InitialCapital => initial_capital,
            EquityBase::Fixed(amount) => *amount,
            EquityBase::PeriodStart => period_start_equity,
        }
    }
}

/// The two equity bases behind `return_on_invested_equity` and `return_on_total_equity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityBases {
    pub invested: EquityBase,
    pub total: EquityBase,
}

impl Default for EquityBases {
    fn default() -> Self {
        Self {
            invested: EquityBase::InitialCapital,
            total: EquityBase::PeriodStart,
        }
    }
}

/// A single row of a periodic returns table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReturn {
    pub period: String,
    pub net_profit: Decimal,
    /// Percent of the invested equity base. Zero when that base is not positive.
    pub return_on_invested_equity: Decimal,
    /// Percent of the total equity base. Zero when that base is not positive.
    pub return_on_total_equity: Decimal,
    pub trade_count: u32,
    /// `f64::INFINITY` with wins and no losses, `0.0` with no wins.
    pub profit_factor: f64,
    pub percent_profitable: f64,
}

/// Return rows for every period selector, most recent period first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodicReturns {
    pub daily: Vec<PeriodReturn>,
    pub weekly: Vec<PeriodReturn>,
    pub monthly: Vec<PeriodReturn>,
    pub annual: Vec<PeriodReturn>,
}

impl PeriodicReturns {
    pub fn get(&self, period: Period) -> &[PeriodReturn] {
        match period {
            Period::Daily => &self.daily,
            Period::Weekly => &self.weekly,
            Period::Monthly => &self.monthly,
            Period::Annual => &self.annual,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub range_start: Decimal,
    pub range_end: Decimal,
    pub count: u32,
    /// Gaussian density at the bin midpoint, scaled to the tallest bar.
    pub bell_curve_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeDistribution {
    pub bins: Vec<HistogramBin>,
    pub mean: f64,
    /// Sample standard deviation (n - 1). Zero for fewer than two trades.
    pub std_dev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarBucket {
    pub label: String,
    pub net_profit: Decimal,
    pub trade_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarProfits {
    /// Monday through Friday. Weekend exits are left out.
    pub by_weekday: Vec<CalendarBucket>,
    /// January through December, summed across years.
    pub by_month: Vec<CalendarBucket>,
}

/// Whole-sequence win/loss statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub total_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    pub break_even_trades: u32,
    pub gross_profit: Decimal,
    /// Magnitude of the summed losses.
    pub gross_loss: Decimal,
    pub net_profit: Decimal,
    pub profit_factor: f64,
    pub percent_profitable: f64,
    pub average_trade: Decimal,
    pub average_win: Decimal,
    pub average_loss: Decimal,
    pub largest_win: Decimal,
    pub largest_loss: Decimal,
}

/// Everything the presentation layer needs for one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub strategy: Option<String>,
    pub initial_capital: Decimal,
    pub summary: TradeSummary,
    pub equity_curve: Vec<EquityPoint>,
    pub drawdown: DrawdownReport,
    pub returns: PeriodicReturns,
    pub distribution: TradeDistribution,
    pub calendar: CalendarProfits,
}
