// In crates/analytics/src/drawdown.rs

use crate::equity_curve::EquityCurveBuilder;
use crate::metrics::percent_of;
use crate::types::{DrawdownEpisode, DrawdownPoint, DrawdownReport, EquityPoint};
use chrono::{DateTime, Utc};
use core_types::{StrategyMetadata, Trade};
use rust_decimal::Decimal;

/// How many episodes `DrawdownReport::worst` keeps unless told otherwise.
pub const DEFAULT_TOP_EPISODES: usize = 10;

/// Finds drawdown episodes in an equity curve and ranks them by severity.
#[derive(Debug, Clone)]
pub struct DrawdownAnalyzer {
    top_episodes: usize,
}

impl Default for DrawdownAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_EPISODES)
    }
}

impl DrawdownAnalyzer {
    pub fn new(top_episodes: usize) -> Self {
        Self { top_episodes }
    }

    /// Builds the equity curve first, then analyzes it.
    pub fn analyze_trades(&self, trades: &[Trade], strategy: &StrategyMetadata) -> DrawdownReport {
        let curve = EquityCurveBuilder::from_strategy(strategy).build(trades);
        self.analyze(&curve)
    }

    /// Scans the curve once, tracking the running peak and at most one open episode.
    ///
    /// An episode starts at the last point that reached the running peak and
    /// closes at the first later point whose equity is back at or above that
    /// peak. An episode still open at the end has no recovery date.
    pub fn analyze(&self, curve: &[EquityPoint]) -> DrawdownReport {
        let Some(first) = curve.first() else {
            return DrawdownReport::default();
        };

        let mut series = Vec::with_capacity(curve.len());
        let mut episodes = Vec::new();
        let mut running_peak = first.equity;
        let mut peak_date = first.timestamp;
        let mut open: Option<DrawdownEpisode> = None;

        for point in curve {
            let recovered = open
                .as_ref()
                .is_some_and(|episode| point.equity >= episode.start_equity);

            if recovered {
                if let Some(mut episode) = open.take() {
                    episode.recovery_date = Some(point.timestamp);
                    episodes.push(episode);
                }
            } else if point.equity < running_peak {
                let episode =
                    open.get_or_insert_with(|| start_episode(peak_date, running_peak, point));
                if point.equity < episode.trough_equity {
                    deepen(episode, point);
                }
            }

            if point.equity >= running_peak {
                running_peak = point.equity;
                peak_date = point.timestamp;
            }

            let drawdown = running_peak.saturating_sub(point.equity);
            series.push(DrawdownPoint {
                timestamp: point.timestamp,
                drawdown,
                drawdown_percent: percent_of(-drawdown, running_peak),
            });
        }

        if let Some(episode) = open {
            episodes.push(episode);
        }

        let max_drawdown = series
            .iter()
            .map(|p| p.drawdown)
            .max()
            .unwrap_or(Decimal::ZERO);
        let max_drawdown_percent = series
            .iter()
            .map(|p| p.drawdown_percent)
            .min()
            .unwrap_or(Decimal::ZERO);

        DrawdownReport {
            worst: self.rank(&episodes),
            series,
            episodes,
            max_drawdown,
            max_drawdown_percent,
        }
    }

    /// Most severe first; equal severity goes to the earlier start.
    fn rank(&self, episodes: &[DrawdownEpisode]) -> Vec<DrawdownEpisode> {
        let mut ranked = episodes.to_vec();
        ranked.sort_by(|a, b| {
            a.drawdown_percent
                .cmp(&b.drawdown_percent)
                .then_with(|| a.start_date.cmp(&b.start_date))
        });
        ranked.truncate(self.top_episodes);
        ranked
    }
}

fn start_episode(
    start_date: DateTime<Utc>,
    start_equity: Decimal,
    point: &EquityPoint,
) -> DrawdownEpisode {
    let mut episode = DrawdownEpisode {
        start_date,
        start_equity,
        trough_date: point.timestamp,
        trough_equity: start_equity,
        recovery_date: None,
        drawdown_amount: Decimal::ZERO,
        drawdown_percent: Decimal::ZERO,
    };
    deepen(&mut episode, point);
    episode
}

fn deepen(episode: &mut DrawdownEpisode, point: &EquityPoint) {
    episode.trough_date = point.timestamp;
    episode.trough_equity = point.equity;
    episode.drawdown_amount = episode.start_equity.saturating_sub(point.equity);
    episode.drawdown_percent = percent_of(
        point.equity.saturating_sub(episode.start_equity),
        episode.start_equity,
    );
}
