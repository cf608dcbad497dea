// In app/src/main.rs

use analytics::{
    CalendarProfitAggregator, DrawdownAnalyzer, EquityCurveBuilder, Period,
    PeriodicReturnsAggregator, PreparedTrades, TradeDistributionAnalyzer,
};
use anyhow::{Context, Result};
use app_config::Settings;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;

mod input;
mod output;
mod pipeline;

use crate::input::{LoadedStrategy, load_strategy_file};
use crate::output::{OutputFormat, print_json, print_report};
use crate::pipeline::ReportPipeline;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Performance analytics for strategy trade histories.")]
struct Cli {
    /// Reads settings from this TOML file instead of the layered `config/` sources.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Builds the full analytics report for one or more strategy files.
    Report {
        /// Strategy files in JSON (`{ "strategy": {...}, "trades": [...] }`).
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// The returns table shown in text output. Defaults to the configured period.
        #[arg(short, long)]
        period: Option<Period>,
    },

    /// Prints the equity curve.
    Equity { file: PathBuf },

    /// Prints drawdown episodes and the drawdown series.
    Drawdown {
        file: PathBuf,

        /// How many of the worst episodes to rank.
        #[arg(long)]
        top: Option<usize>,
    },

    /// Prints periodic returns, most recent period first.
    Returns {
        file: PathBuf,

        /// daily, weekly, monthly or annual.
        #[arg(short, long)]
        period: Option<Period>,
    },

    /// Prints the trade outcome histogram with its bell curve overlay.
    Distribution {
        file: PathBuf,

        #[arg(short, long)]
        bins: Option<usize>,
    },

    /// Prints net profit by weekday and by calendar month.
    Calendar { file: PathBuf },
}

// --- Main Application Entry Point ---

fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => app_config::load_settings_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => app_config::load_settings()?,
    };

    init_tracing(&settings.app.log_level);
    tracing::info!(environment = %settings.app.environment, "Starting analytics application");

    match cli.command {
        Commands::Report {
            files,
            format,
            period,
        } => {
            handle_report(&settings, &files, format, period)?;
        }
        Commands::Equity { file } => {
            let (strategy, trades) = load_trades(&file)?;
            let curve = EquityCurveBuilder::from_strategy(&strategy.file.strategy)
                .build(trades.as_slice());
            print_json(&curve)?;
        }
        Commands::Drawdown { file, top } => {
            let (strategy, trades) = load_trades(&file)?;
            let analyzer = DrawdownAnalyzer::new(top.unwrap_or(settings.analytics.top_drawdowns));
            let report = analyzer.analyze_trades(trades.as_slice(), &strategy.file.strategy);
            tracing::info!(
                episodes = report.episodes.len(),
                max_drawdown = %report.max_drawdown,
                "Drawdown analysis finished."
            );
            print_json(&report)?;
        }
        Commands::Returns { file, period } => {
            let (strategy, trades) = load_trades(&file)?;
            let aggregator =
                PeriodicReturnsAggregator::new(period.unwrap_or(settings.analytics.period))
                    .with_equity_bases(settings.analytics.equity_bases());
            let rows = aggregator.aggregate(trades.as_slice(), strategy.file.strategy.initial_capital);
            tracing::info!(period = %aggregator.period(), rows = rows.len(), "Periodic returns aggregated.");
            print_json(&rows)?;
        }
        Commands::Distribution { file, bins } => {
            let (_, trades) = load_trades(&file)?;
            let analyzer =
                TradeDistributionAnalyzer::new(bins.unwrap_or(settings.analytics.histogram_bins))?;
            print_json(&analyzer.analyze(trades.as_slice()))?;
        }
        Commands::Calendar { file } => {
            let (_, trades) = load_trades(&file)?;
            print_json(&CalendarProfitAggregator::new().aggregate(trades.as_slice()))?;
        }
    }

    tracing::info!("Analytics application has finished successfully.");

    Ok(())
}

fn init_tracing(log_level: &str) {
    let level = log_level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    // Logs go to stderr so stdout stays machine-readable.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::filter::Targets::new().with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();
}

/// Loads one strategy file and validates its trades.
fn load_trades(path: &Path) -> Result<(LoadedStrategy, PreparedTrades)> {
    let strategy = load_strategy_file(path)?;
    let trades = PreparedTrades::from_records(&strategy.file.trades)
        .with_context(|| format!("Rejected trades in {}", path.display()))?;
    tracing::info!(
        source = %strategy.source(),
        strategy = strategy.file.strategy.display_name(),
        trades = trades.len(),
        "Loaded strategy trades."
    );
    Ok((strategy, trades))
}

/// Handles the logic for the `report` subcommand.
fn handle_report(
    settings: &Settings,
    files: &[PathBuf],
    format: OutputFormat,
    period: Option<Period>,
) -> Result<()> {
    let strategies = files
        .iter()
        .map(|path| load_strategy_file(path))
        .collect::<Result<Vec<_>>>()?;

    let pipeline = ReportPipeline::new(settings.analytics.to_options()?)?;
    let results = pipeline.analyze_all(&strategies, settings.app.worker_threads)?;

    let mut reports = Vec::with_capacity(results.len());
    for (strategy, result) in strategies.iter().zip(results) {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                tracing::error!(source = %strategy.source(), error = %e, "Strategy could not be analyzed.");
                return Err(e);
            }
        }
    }

    match format {
        OutputFormat::Json => {
            let reports: Vec<_> = reports.iter().map(|r| r.as_ref()).collect();
            print_json(&reports)?;
        }
        OutputFormat::Text => {
            let period = period.unwrap_or(settings.analytics.period);
            for report in &reports {
                print_report(report, period);
            }
        }
    }

    Ok(())
}
