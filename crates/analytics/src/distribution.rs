// In crates/analytics/src/distribution.rs

use crate::metrics::{gaussian_density, mean, sample_std_dev};
use crate::types::{HistogramBin, TradeDistribution};
use crate::{Error, Result};
use core_types::Trade;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

pub const DEFAULT_NUM_BINS: usize = 14;

/// Histograms trade outcomes and fits a normal curve over the bars.
#[derive(Debug, Clone)]
pub struct TradeDistributionAnalyzer {
    num_bins: usize,
}

impl Default for TradeDistributionAnalyzer {
    fn default() -> Self {
        Self {
            num_bins: DEFAULT_NUM_BINS,
        }
    }
}

impl TradeDistributionAnalyzer {
    pub fn new(num_bins: usize) -> Result<Self> {
        if num_bins == 0 {
            return Err(Error::InvalidParameter(
                "histogram needs at least one bin".to_string(),
            ));
        }
        Ok(Self { num_bins })
    }

    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Bins are half-open `[start, end)` except the last, which also holds the maximum.
    ///
    /// When every trade has the same profit the range is empty, so a single
    /// bin holds all of them and its curve value equals its count.
    pub fn analyze(&self, trades: &[Trade]) -> TradeDistribution {
        let profits: Vec<Decimal> = trades.iter().map(|t| t.net_profit).collect();
        let (Some(min), Some(max)) = (profits.iter().min().copied(), profits.iter().max().copied())
        else {
            return TradeDistribution::default();
        };

        let values: Vec<f64> = profits.iter().map(|p| p.to_f64().unwrap_or(0.0)).collect();
        let mean = mean(&values);
        let std_dev = sample_std_dev(&values);

        if min == max {
            let count = profits.len() as u32;
            return TradeDistribution {
                bins: vec![HistogramBin {
                    range_start: min,
                    range_end: max,
                    count,
                    bell_curve_value: count as f64,
                }],
                mean,
                std_dev,
            };
        }

        let span = max.saturating_sub(min);
        let bins = Decimal::from(self.num_bins);
        let width = span / bins;

        let mut counts = vec![0u32; self.num_bins];
        for profit in &profits {
            counts[self.bin_index(profit.saturating_sub(min), span, bins)] += 1;
        }

        let mut histogram: Vec<HistogramBin> = counts
            .iter()
            .enumerate()
            .map(|(i, count)| {
                let edge = |k: usize| min.saturating_add(width.saturating_mul(Decimal::from(k)));
                let range_start = edge(i);
                let range_end = if i + 1 == self.num_bins { max } else { edge(i + 1) };
                HistogramBin {
                    range_start,
                    range_end,
                    count: *count,
                    bell_curve_value: 0.0,
                }
            })
            .collect();

        overlay_bell_curve(&mut histogram, mean, std_dev);

        TradeDistribution {
            bins: histogram,
            mean,
            std_dev,
        }
    }

    /// `floor(offset * bins / span)`, clamped into the last bin.
    fn bin_index(&self, offset: Decimal, span: Decimal, bins: Decimal) -> usize {
        // Multiplying first keeps exact bin edges exact.
        let scaled = offset
            .checked_mul(bins)
            .map(|v| v / span)
            .unwrap_or_else(|| offset / span * bins);
        scaled
            .floor()
            .to_usize()
            .unwrap_or(0)
            .min(self.num_bins - 1)
    }
}

/// Evaluates the density at each bin midpoint and rescales so the curve's
/// peak matches the tallest bar.
fn overlay_bell_curve(bins: &mut [HistogramBin], mean: f64, std_dev: f64) {
    if std_dev <= 0.0 || !std_dev.is_finite() {
        return;
    }

    let densities: Vec<f64> = bins
        .iter()
        .map(|bin| {
            let midpoint = (bin.range_start / dec!(2))
                .saturating_add(bin.range_end / dec!(2))
                .to_f64()
                .unwrap_or(mean);
            gaussian_density(midpoint, mean, std_dev)
        })
        .collect();

    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    let max_density = densities.iter().copied().fold(0.0_f64, f64::max);
    if max_density <= 0.0 {
        return;
    }

    let scale = max_count / max_density;
    for (bin, density) in bins.iter_mut().zip(densities) {
        bin.bell_curve_value = density * scale;
    }
}
