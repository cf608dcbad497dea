// In crates/core-types/src/error.rs

use rust_decimal::Decimal;
use thiserror::Error;

/// A malformed trade record rejected at the input boundary.
///
/// `index` is the record's position in the sequence the caller supplied,
/// before any sorting takes place.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Trade record {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("Trade record {index} has a non-finite net profit ({value})")]
    NonFiniteProfit { index: usize, value: f64 },

    #[error("Trade record {index} has a net profit that cannot be represented as a decimal ({value})")]
    UnrepresentableProfit { index: usize, value: f64 },

    #[error("Trade record {index} has a net profit outside the accepted range ({value})")]
    ProfitOutOfRange { index: usize, value: Decimal },
}

pub type Result<T> = std::result::Result<T, Error>;
