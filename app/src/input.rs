// In app/src/input.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use core_types::{StrategyMetadata, TradeRecord};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// The JSON document the data-access layer exports for one strategy.
#[derive(Deserialize, Debug, Clone)]
pub struct StrategyFile {
    pub strategy: StrategyMetadata,
    #[serde(default)]
    pub trades: Vec<TradeRecord>,
}

/// A strategy file together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedStrategy {
    pub path: PathBuf,
    pub last_modified: Option<DateTime<Utc>>,
    pub file: StrategyFile,
}

impl LoadedStrategy {
    /// The trade set id used for cache keys and logs.
    pub fn source(&self) -> String {
        self.path.display().to_string()
    }
}

pub fn parse_strategy_file(content: &str) -> Result<StrategyFile> {
    serde_json::from_str(content).context("Failed to parse strategy file")
}

pub fn load_strategy_file(path: &Path) -> Result<LoadedStrategy> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file = parse_strategy_file(&content)
        .with_context(|| format!("Invalid strategy file {}", path.display()))?;

    // A missing mtime only weakens the cache key; the content hash still applies.
    let last_modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from);

    Ok(LoadedStrategy {
        path: path.to_path_buf(),
        last_modified,
        file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_strategy_file() {
        let file = parse_strategy_file(
            r#"{
                "strategy": { "name": "gap-fade", "initial_capital": 10000 },
                "trades": [
                    { "entry_date": "2024-01-02T14:30:00Z", "exit_date": "2024-01-02T20:00:00Z", "net_profit": 500 },
                    { "exit_date": "2024-01-03T20:00:00Z", "net_profit": -1200 }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(file.strategy.initial_capital, dec!(10000));
        assert_eq!(file.strategy.display_name(), "gap-fade");
        assert_eq!(file.trades.len(), 2);
        assert!(file.trades[1].entry_date.is_none());
    }

    #[test]
    fn test_missing_strategy_section_is_rejected() {
        assert!(parse_strategy_file(r#"{ "trades": [] }"#).is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_strategy_file(Path::new("no/such/strategy.json")).unwrap_err();
        assert!(format!("{err:#}").contains("no/such/strategy.json"));
    }
}
