// In crates/analytics/src/trades.rs

use crate::Result;
use core_types::{Trade, TradeRecord, validate_records};
use std::borrow::Cow;

/// A validated trade sequence sorted by ascending exit date.
///
/// Building one up front lets several analyzers share the validation and the
/// sort instead of repeating them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedTrades {
    trades: Vec<Trade>,
}

impl PreparedTrades {
    /// Validates raw records and sorts them. Fails on the first malformed record.
    pub fn from_records(records: &[TradeRecord]) -> Result<Self> {
        Ok(Self::from_trades(validate_records(records)?))
    }

    pub fn from_trades(mut trades: Vec<Trade>) -> Self {
        // Stable, so trades closing at the same instant keep the caller's order.
        trades.sort_by_key(|t| t.exit_date);
        Self { trades }
    }

    pub fn as_slice(&self) -> &[Trade] {
        &self.trades
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn into_inner(self) -> Vec<Trade> {
        self.trades
    }
}

/// Returns the trades ordered by exit date, borrowing when they already are.
pub(crate) fn sorted_by_exit(trades: &[Trade]) -> Cow<'_, [Trade]> {
    if trades.windows(2).all(|w| w[0].exit_date <= w[1].exit_date) {
        Cow::Borrowed(trades)
    } else {
        let mut owned = trades.to_vec();
        owned.sort_by_key(|t| t.exit_date);
        Cow::Owned(owned)
    }
}
