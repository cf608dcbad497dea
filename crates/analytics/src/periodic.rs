// In crates/analytics/src/periodic.rs

use crate::metrics::{TradeTally, percent_of};
use crate::trades::sorted_by_exit;
use crate::types::{EquityBases, Period, PeriodReturn, PeriodicReturns};
use chrono::{DateTime, Datelike, Utc};
use core_types::Trade;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Calendar bucket derived from a trade's exit date (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PeriodKey {
    Day(i32, u32, u32),
    /// ISO week-numbering year and week.
    Week(i32, u32),
    Month(i32, u32),
    Year(i32),
}

impl PeriodKey {
    fn of(period: Period, timestamp: DateTime<Utc>) -> Self {
        let date = timestamp.date_naive();
        match period {
            Period::Daily => PeriodKey::Day(date.year(), date.month(), date.day()),
            Period::Weekly => {
                let iso = date.iso_week();
                PeriodKey::Week(iso.year(), iso.week())
            }
            Period::Monthly => PeriodKey::Month(date.year(), date.month()),
            Period::Annual => PeriodKey::Year(date.year()),
        }
    }

    fn label(&self) -> String {
        match self {
            PeriodKey::Day(y, m, d) => format!("{y:04}-{m:02}-{d:02}"),
            PeriodKey::Week(y, w) => format!("{y:04}-W{w:02}"),
            PeriodKey::Month(y, m) => format!("{y:04}-{m:02}"),
            PeriodKey::Year(y) => format!("{y:04}"),
        }
    }
}

#[derive(Debug, Default)]
struct Bucket {
    /// Equity before the bucket's first trade.
    start_equity: Decimal,
    tally: TradeTally,
}

/// Rolls trades up into one row per calendar period that has at least one trade.
#[derive(Debug, Clone)]
pub struct PeriodicReturnsAggregator {
    period: Period,
    bases: EquityBases,
}

impl PeriodicReturnsAggregator {
    pub fn new(period: Period) -> Self {
        Self {
            period,
            bases: EquityBases::default(),
        }
    }

    pub fn with_equity_bases(mut self, bases: EquityBases) -> Self {
        self.bases = bases;
        self
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// Returns the rows ordered most recent period first.
    pub fn aggregate(&self, trades: &[Trade], initial_capital: Decimal) -> Vec<PeriodReturn> {
        let trades = sorted_by_exit(trades);
        let mut buckets: BTreeMap<PeriodKey, Bucket> = BTreeMap::new();
        let mut equity = initial_capital;

        for trade in trades.iter() {
            let bucket = buckets
                .entry(PeriodKey::of(self.period, trade.exit_date))
                .or_insert_with(|| Bucket {
                    start_equity: equity,
                    tally: TradeTally::default(),
                });
            bucket.tally.record(trade);
            equity = equity.saturating_add(trade.net_profit);
        }

        buckets
            .iter()
            .rev()
            .map(|(key, bucket)| {
                let invested = self.bases.invested.resolve(initial_capital, bucket.start_equity);
                let total = self.bases.total.resolve(initial_capital, bucket.start_equity);
                PeriodReturn {
                    period: key.label(),
                    net_profit: bucket.tally.net_profit,
                    return_on_invested_equity: percent_of(bucket.tally.net_profit, invested),
                    return_on_total_equity: percent_of(bucket.tally.net_profit, total),
                    trade_count: bucket.tally.count,
                    profit_factor: bucket.tally.profit_factor(),
                    percent_profitable: bucket.tally.percent_profitable(),
                }
            })
            .collect()
    }

    /// Runs every period selector with the same equity bases.
    pub fn aggregate_all(
        trades: &[Trade],
        initial_capital: Decimal,
        bases: EquityBases,
    ) -> PeriodicReturns {
        let run = |period| {
            PeriodicReturnsAggregator::new(period)
                .with_equity_bases(bases)
                .aggregate(trades, initial_capital)
        };
        PeriodicReturns {
            daily: run(Period::Daily),
            weekly: run(Period::Weekly),
            monthly: run(Period::Monthly),
            annual: run(Period::Annual),
        }
    }
}
