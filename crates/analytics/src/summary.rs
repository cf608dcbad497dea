// In crates/analytics/src/summary.rs

use crate::metrics::TradeTally;
use crate::types::TradeSummary;
use core_types::Trade;
use rust_decimal::Decimal;

/// Calculates the whole-sequence win/loss summary.
pub fn summarize(trades: &[Trade]) -> TradeSummary {
    let mut summary = TradeSummary::default();
    if trades.is_empty() {
        return summary; // All zeros for an empty sequence.
    }

    let tally: TradeTally = trades.iter().collect();

    summary.total_trades = tally.count;
    summary.winning_trades = tally.wins;
    summary.losing_trades = tally.losses;
    summary.break_even_trades = tally.break_even();

    summary.gross_profit = tally.gross_profit;
    summary.gross_loss = tally.gross_loss;
    summary.net_profit = tally.net_profit;
    summary.profit_factor = tally.profit_factor();
    summary.percent_profitable = tally.percent_profitable();

    summary.average_trade = tally.net_profit / Decimal::from(tally.count);
    if tally.wins > 0 {
        summary.average_win = tally.gross_profit / Decimal::from(tally.wins);
    }
    if tally.losses > 0 {
        // Reported as a negative amount, like the trades it averages.
        summary.average_loss = -tally.gross_loss / Decimal::from(tally.losses);
    }

    summary.largest_win = trades
        .iter()
        .map(|t| t.net_profit)
        .filter(|p| *p > Decimal::ZERO)
        .max()
        .unwrap_or(Decimal::ZERO);
    summary.largest_loss = trades
        .iter()
        .map(|t| t.net_profit)
        .filter(|p| *p < Decimal::ZERO)
        .min()
        .unwrap_or(Decimal::ZERO);

    summary
}
