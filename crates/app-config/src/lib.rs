// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AnalyticsSettings, AppSettings, Settings};

/// Loads the application settings from the `config/` directory.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(Path::new("config"))
}

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
///
/// Every key has a default, so missing files are not an error.
pub fn load_settings_from(config_dir: &Path) -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let settings = Config::builder()
        // 1. Load the base configuration file.
        .add_source(File::from(config_dir.join("base")).required(false))
        // 2. Load the environment-specific configuration file.
        .add_source(File::from(config_dir.join(&environment)).required(false))
        // 3. Load settings from environment variables (e.g., `APP__ANALYTICS__HISTOGRAM_BINS=20`).
        // The prefix is `APP`, separator is `__`.
        .add_source(Environment::with_prefix("APP").separator("__").try_parsing(true))
        .build()?;

    // Deserialize the configuration into our `Settings` struct.
    let settings: Settings = settings.try_deserialize()?;
    settings.analytics.to_options()?;

    Ok(settings)
}

/// Loads settings from a single TOML file, skipping the layered sources.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;

    let settings: Settings = toml::from_str(&content)?;
    settings.analytics.to_options()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{EquityBase, Period};
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_when_sections_missing() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.app.log_level, "info");
        assert_eq!(settings.analytics.histogram_bins, 14);
        assert_eq!(settings.analytics.top_drawdowns, 10);
        assert_eq!(settings.analytics.period, Period::Monthly);
        assert_eq!(settings.analytics.invested_equity_base, EquityBase::InitialCapital);
        assert_eq!(settings.analytics.total_equity_base, EquityBase::PeriodStart);
    }

    #[test]
    fn test_parses_analytics_section() {
        let settings: Settings = toml::from_str(
            r#"
            [app]
            log_level = "debug"
            worker_threads = 4

            [analytics]
            histogram_bins = 20
            period = "weekly"
            invested_equity_base = { fixed = "25000" }
            total_equity_base = "initial_capital"
            "#,
        )
        .unwrap();

        assert_eq!(settings.app.worker_threads, Some(4));
        assert_eq!(settings.analytics.period, Period::Weekly);
        assert_eq!(
            settings.analytics.invested_equity_base,
            EquityBase::Fixed(dec!(25000))
        );
        let options = settings.analytics.to_options().unwrap();
        assert_eq!(options.num_bins, 20);
        assert_eq!(options.equity_bases.total, EquityBase::InitialCapital);
    }

    #[test]
    fn test_zero_bins_rejected() {
        let settings: Settings = toml::from_str("[analytics]\nhistogram_bins = 0").unwrap();
        assert!(settings.analytics.to_options().is_err());
    }

    #[test]
    fn test_missing_directory_yields_defaults() {
        let settings = load_settings_from(Path::new("does/not/exist")).unwrap();
        assert_eq!(settings.analytics.histogram_bins, 14);
    }

    #[test]
    fn test_missing_single_file_is_io_error() {
        let err = load_settings_file(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
    }
}
