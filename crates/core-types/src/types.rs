// In crates/core-types/src/types.rs

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};

/// Largest accepted `|net_profit|` for a single trade (one quadrillion).
///
/// Keeps running sums over any realistic trade count far from `Decimal::MAX`.
pub const MAX_ABS_NET_PROFIT: i64 = 1_000_000_000_000_000;

/// A closed trade as the analyzers see it. Only produced by validation or
/// by [`Trade::new`], so every field is always present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trade {
    pub entry_date: DateTime<Utc>,
    pub exit_date: DateTime<Utc>,
    pub net_profit: Decimal,
}

impl Trade {
    pub fn new(entry_date: DateTime<Utc>, exit_date: DateTime<Utc>, net_profit: Decimal) -> Self {
        Self {
            entry_date,
            exit_date,
            net_profit,
        }
    }

    pub fn is_winner(&self) -> bool {
        self.net_profit > Decimal::ZERO
    }

    pub fn is_loser(&self) -> bool {
        self.net_profit < Decimal::ZERO
    }
}

/// A money amount as supplied by the caller.
///
/// Serialized input (JSON numbers or strings) always becomes `Exact`, parsed
/// digit for digit. `Float` is for callers that already hold an `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Amount {
    Exact(Decimal),
    Float(f64),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        <Decimal as Deserialize>::deserialize(deserializer).map(Amount::Exact)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::Exact(value)
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Float(value)
    }
}

impl Amount {
    fn to_decimal(self, index: usize) -> Result<Decimal> {
        let value = match self {
            Amount::Exact(value) => value,
            Amount::Float(value) => {
                if !value.is_finite() {
                    return Err(Error::NonFiniteProfit { index, value });
                }
                Decimal::from_f64(value).ok_or(Error::UnrepresentableProfit { index, value })?
            }
        };
        if value.abs() > Decimal::from(MAX_ABS_NET_PROFIT) {
            return Err(Error::ProfitOutOfRange { index, value });
        }
        Ok(value)
    }
}

/// A trade as delivered by the data-access layer. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    #[serde(default)]
    pub entry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub exit_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub net_profit: Option<Amount>,
}

impl TradeRecord {
    /// Checks the record and converts it into a [`Trade`].
    ///
    /// `index` is only used to point at the offending record in the error.
    pub fn validate(&self, index: usize) -> Result<Trade> {
        let entry_date = self.entry_date.ok_or(Error::MissingField {
            index,
            field: "entry_date",
        })?;
        let exit_date = self.exit_date.ok_or(Error::MissingField {
            index,
            field: "exit_date",
        })?;
        let net_profit = self
            .net_profit
            .ok_or(Error::MissingField {
                index,
                field: "net_profit",
            })?
            .to_decimal(index)?;

        Ok(Trade::new(entry_date, exit_date, net_profit))
    }
}

impl From<&Trade> for TradeRecord {
    fn from(trade: &Trade) -> Self {
        Self {
            entry_date: Some(trade.entry_date),
            exit_date: Some(trade.exit_date),
            net_profit: Some(Amount::Exact(trade.net_profit)),
        }
    }
}

/// Validates every record, failing on the first malformed one.
///
/// The returned trades keep the caller's order; sorting is left to the analyzers.
pub fn validate_records(records: &[TradeRecord]) -> Result<Vec<Trade>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| record.validate(index))
        .collect()
}
