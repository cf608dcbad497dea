// In crates/app-config/src/types.rs

use analytics::{AnalyticsOptions, EquityBase, EquityBases, Period};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Settings {
    /// The application's general settings.
    #[serde(default)]
    pub app: AppSettings,
    /// Parameters handed to the analyzers.
    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    #[serde(default = "default_environment")]
    pub environment: String,
    /// The log level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Worker threads for analyzing several strategies at once. `None` uses every core.
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
            worker_threads: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AnalyticsSettings {
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
    #[serde(default = "default_top_drawdowns")]
    pub top_drawdowns: usize,
    /// The period shown when a command does not name one.
    #[serde(default = "default_period")]
    pub period: Period,
    #[serde(default = "default_invested_base")]
    pub invested_equity_base: EquityBase,
    #[serde(default = "default_total_base")]
    pub total_equity_base: EquityBase,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            histogram_bins: default_histogram_bins(),
            top_drawdowns: default_top_drawdowns(),
            period: default_period(),
            invested_equity_base: default_invested_base(),
            total_equity_base: default_total_base(),
        }
    }
}

impl AnalyticsSettings {
    pub fn equity_bases(&self) -> EquityBases {
        EquityBases {
            invested: self.invested_equity_base,
            total: self.total_equity_base,
        }
    }

    /// Converts the settings into engine options, rejecting an empty histogram.
    pub fn to_options(&self) -> analytics::Result<AnalyticsOptions> {
        if self.histogram_bins == 0 {
            return Err(analytics::Error::InvalidParameter(
                "analytics.histogram_bins must be at least 1".to_string(),
            ));
        }
        Ok(AnalyticsOptions {
            num_bins: self.histogram_bins,
            top_drawdowns: self.top_drawdowns,
            equity_bases: self.equity_bases(),
        })
    }
}

/// Helper functions for serde defaults
fn default_environment() -> String { "development".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_histogram_bins() -> usize { analytics::DEFAULT_NUM_BINS }
fn default_top_drawdowns() -> usize { analytics::DEFAULT_TOP_EPISODES }
fn default_period() -> Period { Period::Monthly }
fn default_invested_base() -> EquityBase { EquityBase::InitialCapital }
fn default_total_base() -> EquityBase { EquityBase::PeriodStart }
