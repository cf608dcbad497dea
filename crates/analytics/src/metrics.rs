// In crates/analytics/src/metrics.rs

//! Small numeric helpers shared by the analyzers. Every edge case here is a
//! documented result rather than a NaN or a panic.

use core_types::Trade;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

/// Running win/loss totals over a group of trades.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TradeTally {
    pub count: u32,
    pub wins: u32,
    pub losses: u32,
    pub net_profit: Decimal,
    pub gross_profit: Decimal,
    /// Summed losses as a positive magnitude.
    pub gross_loss: Decimal,
}

impl TradeTally {
    pub fn record(&mut self, trade: &Trade) {
        self.count += 1;
        self.net_profit = self.net_profit.saturating_add(trade.net_profit);
        if trade.is_winner() {
            self.wins += 1;
            self.gross_profit = self.gross_profit.saturating_add(trade.net_profit);
        } else if trade.is_loser() {
            self.losses += 1;
            self.gross_loss = self.gross_loss.saturating_add(trade.net_profit.abs());
        }
    }

    pub fn break_even(&self) -> u32 {
        self.count - self.wins - self.losses
    }

    pub fn profit_factor(&self) -> f64 {
        profit_factor(self.gross_profit, self.gross_loss)
    }

    pub fn percent_profitable(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.wins as f64 / self.count as f64) * 100.0
    }
}

impl<'a> FromIterator<&'a Trade> for TradeTally {
    fn from_iter<I: IntoIterator<Item = &'a Trade>>(iter: I) -> Self {
        let mut tally = Self::default();
        for trade in iter {
            tally.record(trade);
        }
        tally
    }
}

/// Gross profit over gross loss magnitude.
///
/// With no winning profit the factor is `0.0`, even when there are no losses
/// either. With wins and no losses it is `f64::INFINITY`.
pub fn profit_factor(gross_profit: Decimal, gross_loss: Decimal) -> f64 {
    if gross_profit <= Decimal::ZERO {
        0.0
    } else if gross_loss.is_zero() {
        f64::INFINITY
    } else {
        gross_profit
            .checked_div(gross_loss)
            .and_then(|ratio| ratio.to_f64())
            .unwrap_or(f64::MAX)
    }
}

/// `amount / base * 100`, or zero when the base is not positive.
///
/// A ratio too large for a `Decimal` saturates at `Decimal::MAX` or `Decimal::MIN`.
pub fn percent_of(amount: Decimal, base: Decimal) -> Decimal {
    if base <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    amount
        .checked_div(base)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .unwrap_or(if amount.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator). Zero for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Normal probability density at `x`.
pub fn gaussian_density(x: f64, mean: f64, std_dev: f64) -> f64 {
    let z = (x - mean) / std_dev;
    (-0.5 * z * z).exp() / (std_dev * (2.0 * std::f64::consts::PI).sqrt())
}
