// In crates/analytics/src/equity_curve.rs

use crate::trades::sorted_by_exit;
use crate::types::EquityPoint;
use chrono::{DateTime, Utc};
use core_types::{StrategyMetadata, Trade};
use rust_decimal::Decimal;

/// Builds the running equity curve from initial capital and trade results.
#[derive(Debug, Clone)]
pub struct EquityCurveBuilder {
    initial_capital: Decimal,
    start_date: Option<DateTime<Utc>>,
}

impl EquityCurveBuilder {
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            initial_capital,
            start_date: None,
        }
    }

    pub fn from_strategy(strategy: &StrategyMetadata) -> Self {
        Self {
            initial_capital: strategy.initial_capital,
            start_date: strategy.start_date,
        }
    }

    /// Pins the timestamp of the seed point.
    pub fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Returns the seed point followed by one point per trade, in exit order.
    ///
    /// The seed sits at the configured start date, or else at the earliest
    /// entry (never after the first exit). An empty sequence with no start
    /// date is seeded at the Unix epoch.
    pub fn build(&self, trades: &[Trade]) -> Vec<EquityPoint> {
        let trades = sorted_by_exit(trades);
        let mut curve = Vec::with_capacity(trades.len() + 1);
        curve.push(EquityPoint {
            timestamp: self.seed_timestamp(&trades),
            equity: self.initial_capital,
        });

        let mut equity = self.initial_capital;
        for trade in trades.iter() {
            equity = equity.saturating_add(trade.net_profit);
            curve.push(EquityPoint {
                timestamp: trade.exit_date,
                equity,
            });
        }

        curve
    }

    fn seed_timestamp(&self, trades: &[Trade]) -> DateTime<Utc> {
        if let Some(start) = self.start_date {
            return start;
        }
        let earliest_entry = trades.iter().map(|t| t.entry_date).min();
        let first_exit = trades.first().map(|t| t.exit_date);
        match (earliest_entry, first_exit) {
            (Some(entry), Some(exit)) => entry.min(exit),
            _ => DateTime::<Utc>::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_curve_accumulates_profits() {
        let trades = vec![
            Trade::new(day(1), day(2), dec!(500)),
            Trade::new(day(2), day(3), dec!(-1200)),
            Trade::new(day(3), day(4), dec!(800)),
        ];
        let curve = EquityCurveBuilder::new(dec!(10000)).build(&trades);
        let equities: Vec<_> = curve.iter().map(|p| p.equity).collect();
        assert_eq!(equities, vec![dec!(10000), dec!(10500), dec!(9300), dec!(10100)]);
        assert_eq!(curve[0].timestamp, day(1));
        assert_eq!(curve[3].timestamp, day(4));
    }

    #[test]
    fn test_unsorted_trades_are_ordered_by_exit() {
        let trades = vec![
            Trade::new(day(5), day(6), dec!(-50)),
            Trade::new(day(1), day(2), dec!(100)),
        ];
        let curve = EquityCurveBuilder::new(dec!(1000)).build(&trades);
        assert_eq!(curve[1].timestamp, day(2));
        assert_eq!(curve[1].equity, dec!(1100));
        assert_eq!(curve[2].equity, dec!(1050));
    }

    #[test]
    fn test_empty_trades_yield_seed_only() {
        let curve = EquityCurveBuilder::new(dec!(2500)).build(&[]);
        assert_eq!(curve.len(), 1);
        assert_eq!(curve[0].equity, dec!(2500));
        assert_eq!(curve[0].timestamp, DateTime::<Utc>::default());
    }

    #[test]
    fn test_strategy_start_date_seeds_curve() {
        let start = day(1) - Duration::days(30);
        let strategy = StrategyMetadata::new(dec!(100)).with_start_date(start);
        let curve = EquityCurveBuilder::from_strategy(&strategy)
            .build(&[Trade::new(day(3), day(4), dec!(1))]);
        assert_eq!(curve[0].timestamp, start);
        assert_eq!(curve.len(), 2);
    }

    #[test]
    fn test_equity_saturates_at_decimal_bounds() {
        let trades = vec![
            Trade::new(day(1), day(2), Decimal::MAX),
            Trade::new(day(2), day(3), Decimal::MAX),
        ];
        let curve = EquityCurveBuilder::new(dec!(1)).build(&trades);
        assert_eq!(curve[2].equity, Decimal::MAX);
    }

    #[test]
    fn test_seed_uses_earliest_entry() {
        // The trade that closes second was opened first.
        let trades = vec![
            Trade::new(day(5), day(6), dec!(1)),
            Trade::new(day(2), day(9), dec!(1)),
        ];
        let curve = EquityCurveBuilder::new(dec!(10)).build(&trades);
        assert_eq!(curve[0].timestamp, day(2));
    }
}
