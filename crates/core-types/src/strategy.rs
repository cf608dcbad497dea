use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Read-only facts about the strategy that owns a trade sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrategyMetadata {
    #[serde(default)]
    pub name: Option<String>,
    pub initial_capital: Decimal,
    /// Timestamp of the seed equity point. When absent the earliest trade entry is used.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
}

impl StrategyMetadata {
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            name: None,
            initial_capital,
            start_date: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// The name used in logs and reports.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }
}
