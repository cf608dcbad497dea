// End-to-end checks of the analyzers against hand-computed fixtures.

use analytics::{
    AnalyticsCache, AnalyticsEngine, AnalyticsOptions, AnalyticsReport, CalendarProfitAggregator,
    DrawdownAnalyzer, EquityCurveBuilder, InputFingerprint, Period, PeriodicReturnsAggregator,
    PreparedTrades, TradeDistributionAnalyzer,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use core_types::{StrategyMetadata, Trade, TradeRecord};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 16, 0, 0).unwrap() + Duration::days(n)
}

fn trade(exit_day: i64, pnl: Decimal) -> Trade {
    Trade::new(day(exit_day) - Duration::hours(6), day(exit_day), pnl)
}

/// A year of irregular results, deliberately out of exit order.
fn year_of_trades() -> Vec<Trade> {
    let mut trades: Vec<Trade> = (0..120)
        .map(|i| {
            let swing = Decimal::from((i * 37) % 23) - dec!(9);
            trade(i * 3, swing * dec!(12.5))
        })
        .collect();
    trades.reverse();
    trades.swap(10, 70);
    trades
}

#[test]
fn open_drawdown_without_recovery() {
    let trades = vec![trade(1, dec!(500)), trade(2, dec!(-1200)), trade(3, dec!(800))];
    let curve = EquityCurveBuilder::new(dec!(10000)).build(&trades);
    let equities: Vec<_> = curve.iter().map(|p| p.equity).collect();
    assert_eq!(equities, vec![dec!(10000), dec!(10500), dec!(9300), dec!(10100)]);

    let report = DrawdownAnalyzer::default().analyze(&curve);
    assert_eq!(report.episodes.len(), 1);
    let episode = &report.episodes[0];
    assert_eq!(episode.start_equity, dec!(10500));
    assert_eq!(episode.start_date, day(1));
    assert_eq!(episode.trough_equity, dec!(9300));
    assert_eq!(episode.trough_date, day(2));
    assert!(episode.recovery_date.is_none());
    assert_eq!(episode.drawdown_percent.round_dp(2), dec!(-11.43));
    assert_eq!(report.worst, report.episodes);
}

#[test]
fn no_losing_trades_gives_infinite_profit_factor() {
    let trades = vec![trade(1, dec!(40)), trade(2, dec!(60)), trade(40, dec!(15))];
    for period in Period::ALL {
        let rows = PeriodicReturnsAggregator::new(period).aggregate(&trades, dec!(1000));
        for row in rows {
            assert_eq!(row.profit_factor, f64::INFINITY);
            assert_eq!(row.percent_profitable, 100.0);
        }
    }

    let engine = AnalyticsEngine::new(AnalyticsOptions::default()).unwrap();
    let report = engine.calculate(
        &StrategyMetadata::new(dec!(1000)),
        &PreparedTrades::from_trades(trades),
    );
    assert_eq!(report.summary.profit_factor, f64::INFINITY);
    assert_eq!(report.summary.percent_profitable, 100.0);
    assert!(report.drawdown.episodes.is_empty());
}

#[test]
fn identical_profits_share_one_bin() {
    let trades: Vec<Trade> = (0..9).map(|i| trade(i, dec!(75))).collect();
    let distribution = TradeDistributionAnalyzer::default().analyze(&trades);
    assert_eq!(distribution.bins.len(), 1);
    assert_eq!(distribution.bins[0].count, 9);
    assert!(distribution.bins[0].bell_curve_value.is_finite());
    assert_eq!(distribution.mean, 75.0);
    assert_eq!(distribution.std_dev, 0.0);
}

#[test]
fn empty_input_gives_empty_report() {
    let strategy = StrategyMetadata::new(dec!(2500));
    let engine = AnalyticsEngine::new(AnalyticsOptions::default()).unwrap();
    let report = engine.calculate_records(&strategy, &[]).unwrap();

    assert_eq!(report.equity_curve.len(), 1);
    assert_eq!(report.equity_curve[0].equity, dec!(2500));
    assert!(report.drawdown.episodes.is_empty());
    assert!(report.drawdown.worst.is_empty());
    assert_eq!(report.drawdown.series.len(), 1);
    for period in Period::ALL {
        assert!(report.returns.get(period).is_empty());
    }
    assert!(report.distribution.bins.is_empty());
    assert_eq!(report.summary.total_trades, 0);
    assert!(report.calendar.by_weekday.iter().all(|b| b.net_profit.is_zero()));
    assert!(report.calendar.by_month.iter().all(|b| b.net_profit.is_zero()));
}

#[test]
fn equity_curve_has_one_point_per_trade_plus_seed() {
    let trades = year_of_trades();
    let curve = EquityCurveBuilder::new(dec!(50000)).build(&trades);
    assert_eq!(curve.len(), trades.len() + 1);
    assert!(curve.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    let total: Decimal = trades.iter().map(|t| t.net_profit).sum();
    assert_eq!(curve.last().unwrap().equity, dec!(50000) + total);
}

#[test]
fn drawdown_episodes_are_well_formed() {
    let curve = EquityCurveBuilder::new(dec!(5000)).build(&year_of_trades());
    let report = DrawdownAnalyzer::default().analyze(&curve);
    assert!(!report.episodes.is_empty());

    for episode in &report.episodes {
        assert!(episode.trough_equity <= episode.start_equity);
        assert!(episode.drawdown_percent <= Decimal::ZERO);
        assert!(episode.start_date <= episode.trough_date);
        if let Some(recovery) = episode.recovery_date {
            assert!(episode.trough_date < recovery);
        }
    }

    // Non-overlapping and in start order: each episode recovers before the next starts.
    for pair in report.episodes.windows(2) {
        let recovery = pair[0].recovery_date.expect("only the last episode may stay open");
        assert!(recovery <= pair[1].start_date);
    }

    assert!(report.worst.len() <= 10);
    assert!(report.worst.windows(2).all(|w| {
        w[0].drawdown_percent < w[1].drawdown_percent
            || (w[0].drawdown_percent == w[1].drawdown_percent && w[0].start_date <= w[1].start_date)
    }));
    assert!(report.series.iter().all(|p| p.drawdown >= Decimal::ZERO));
}

#[test]
fn periodic_net_profit_matches_trade_total() {
    let trades = year_of_trades();
    let total: Decimal = trades.iter().map(|t| t.net_profit).sum();
    for period in Period::ALL {
        let rows = PeriodicReturnsAggregator::new(period).aggregate(&trades, dec!(5000));
        let summed: Decimal = rows.iter().map(|r| r.net_profit).sum();
        assert_eq!(summed, total, "{period}");
        let counted: u32 = rows.iter().map(|r| r.trade_count).sum();
        assert_eq!(counted as usize, trades.len());
    }
}

#[test]
fn histogram_counts_match_trade_count() {
    let trades = year_of_trades();
    for bins in [1, 3, 14, 50] {
        let distribution = TradeDistributionAnalyzer::new(bins).unwrap().analyze(&trades);
        let counted: u32 = distribution.bins.iter().map(|b| b.count).sum();
        assert_eq!(counted as usize, trades.len());
    }
}

#[test]
fn calendar_month_totals_match_trade_total() {
    let trades = year_of_trades();
    let total: Decimal = trades.iter().map(|t| t.net_profit).sum();
    let calendar = CalendarProfitAggregator::new().aggregate(&trades);
    let summed: Decimal = calendar.by_month.iter().map(|b| b.net_profit).sum();
    assert_eq!(summed, total);
}

#[test]
fn repeated_runs_are_identical() {
    let strategy = StrategyMetadata::new(dec!(5000)).with_name("mean-reversion");
    let records: Vec<TradeRecord> = year_of_trades().iter().map(TradeRecord::from).collect();
    let engine = AnalyticsEngine::new(AnalyticsOptions::default()).unwrap();

    let first = engine.calculate_records(&strategy, &records).unwrap();
    let second = engine.calculate_records(&strategy, &records).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn cache_returns_previous_report() {
    let strategy = StrategyMetadata::new(dec!(5000));
    let prepared = PreparedTrades::from_trades(year_of_trades());
    let engine = AnalyticsEngine::new(AnalyticsOptions::default()).unwrap();
    let cache: AnalyticsCache<AnalyticsReport> = AnalyticsCache::new();

    let key = InputFingerprint::new("strategy-7", prepared.as_slice())
        .with_parameter("initial_capital", strategy.initial_capital)
        .with_parameter("bins", 14);
    let first = cache.get_or_compute(key.clone(), || engine.calculate(&strategy, &prepared));
    let second = cache.get_or_compute(key, || unreachable!("cached"));

    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(cache.stats().hits, 1);
}

#[test]
fn extreme_trades_saturate_instead_of_panicking() {
    let huge = dec!(50000000000000000000000000000);
    let trades = vec![trade(1, huge), trade(2, huge), trade(3, -huge), trade(4, dec!(-0.01))];
    let engine = AnalyticsEngine::new(AnalyticsOptions::default()).unwrap();
    let report = engine.calculate(
        &StrategyMetadata::new(dec!(1000)),
        &PreparedTrades::from_trades(trades),
    );

    assert_eq!(report.equity_curve.len(), 5);
    assert_eq!(report.equity_curve[2].equity, Decimal::MAX);
    assert_eq!(report.summary.gross_profit, Decimal::MAX);
    assert_eq!(report.distribution.bins.iter().map(|b| b.count).sum::<u32>(), 4);
    assert!(!report.drawdown.episodes.is_empty());
}

#[test]
fn infinite_profit_factor_serializes_as_null() {
    let trades = vec![trade(1, dec!(10))];
    let rows = PeriodicReturnsAggregator::new(Period::Monthly).aggregate(&trades, dec!(100));
    let json = serde_json::to_value(&rows[0]).unwrap();
    assert!(json["profit_factor"].is_null());
}
