// In crates/analytics/src/calendar.rs

use crate::types::{CalendarBucket, CalendarProfits};
use chrono::Datelike;
use core_types::Trade;
use rust_decimal::Decimal;

const WEEKDAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Groups net profit by exit weekday and by exit month (UTC) for seasonality views.
#[derive(Debug, Clone, Default)]
pub struct CalendarProfitAggregator;

impl CalendarProfitAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Always returns five weekday buckets and twelve month buckets, in calendar order.
    ///
    /// Trades that exit on a Saturday or Sunday only count toward the month view.
    pub fn aggregate(&self, trades: &[Trade]) -> CalendarProfits {
        let mut by_weekday = empty_buckets(&WEEKDAYS);
        let mut by_month = empty_buckets(&MONTHS);

        for trade in trades {
            let date = trade.exit_date.date_naive();

            let weekday = date.weekday().num_days_from_monday() as usize;
            if let Some(bucket) = by_weekday.get_mut(weekday) {
                add(bucket, trade.net_profit);
            }

            // month0() is always in 0..12.
            add(&mut by_month[date.month0() as usize], trade.net_profit);
        }

        CalendarProfits {
            by_weekday,
            by_month,
        }
    }
}

fn empty_buckets(labels: &[&str]) -> Vec<CalendarBucket> {
    labels
        .iter()
        .map(|label| CalendarBucket {
            label: label.to_string(),
            net_profit: Decimal::ZERO,
            trade_count: 0,
        })
        .collect()
}

fn add(bucket: &mut CalendarBucket, net_profit: Decimal) {
    bucket.net_profit = bucket.net_profit.saturating_add(net_profit);
    bucket.trade_count += 1;
}
