// In app/src/output.rs

use analytics::{AnalyticsReport, Period};
use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_factor(value: f64) -> String {
    if value.is_infinite() {
        "inf".to_string()
    } else {
        format!("{value:.2}")
    }
}

/// Helper function to print a readable summary of one report.
pub fn print_report(report: &AnalyticsReport, period: Period) {
    let summary = &report.summary;
    println!("\n--- {} ---", report.strategy.as_deref().unwrap_or("unnamed strategy"));
    println!(
        "  - Net P&L: ${:.2} on ${:.2} | Trades: {} | Profitable: {:.2}% | Profit Factor: {}",
        summary.net_profit,
        report.initial_capital,
        summary.total_trades,
        summary.percent_profitable,
        format_factor(summary.profit_factor),
    );
    println!(
        "  - Max Drawdown: ${:.2} ({:.2}%) | Episodes: {}",
        report.drawdown.max_drawdown,
        report.drawdown.max_drawdown_percent,
        report.drawdown.episodes.len(),
    );

    if !report.drawdown.worst.is_empty() {
        println!("  - Worst drawdowns:");
        for (i, episode) in report.drawdown.worst.iter().enumerate() {
            let recovery = episode
                .recovery_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "open".to_string());
            println!(
                "      [{}] {:.2}% from {} (${:.2}) to {} (${:.2}), recovered: {}",
                i + 1,
                episode.drawdown_percent,
                episode.start_date.format("%Y-%m-%d"),
                episode.start_equity,
                episode.trough_date.format("%Y-%m-%d"),
                episode.trough_equity,
                recovery,
            );
        }
    }

    let rows = report.returns.get(period);
    if !rows.is_empty() {
        println!("  - {} returns (most recent first):", period);
        for row in rows {
            println!(
                "      {:<10} ${:>12.2} | invested {:>7.2}% | total {:>7.2}% | trades {:>4} | PF {:>6} | win {:>6.2}%",
                row.period,
                row.net_profit,
                row.return_on_invested_equity,
                row.return_on_total_equity,
                row.trade_count,
                format_factor(row.profit_factor),
                row.percent_profitable,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_factor() {
        assert_eq!(format_factor(f64::INFINITY), "inf");
        assert_eq!(format_factor(1.5), "1.50");
        assert_eq!(format_factor(0.0), "0.00");
    }
}
