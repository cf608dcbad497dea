// In app/src/pipeline.rs

use crate::input::LoadedStrategy;
use analytics::{
    AnalyticsCache, AnalyticsEngine, AnalyticsOptions, AnalyticsReport, CacheStats,
    InputFingerprint, PreparedTrades,
};
use anyhow::{Context, Result};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;

/// Runs the analytics engine behind a shared memoization cache.
///
/// All logging for a run happens here, around the pure engine calls.
pub struct ReportPipeline {
    engine: AnalyticsEngine,
    cache: AnalyticsCache<AnalyticsReport>,
}

impl ReportPipeline {
    pub fn new(options: AnalyticsOptions) -> Result<Self> {
        Ok(Self {
            engine: AnalyticsEngine::new(options)?,
            cache: AnalyticsCache::new(),
        })
    }

    fn fingerprint(&self, strategy: &LoadedStrategy, trades: &PreparedTrades) -> InputFingerprint {
        let options = self.engine.options();
        let mut key = InputFingerprint::new(strategy.source(), trades.as_slice())
            .with_strategy(&strategy.file.strategy)
            .with_parameter("bins", options.num_bins)
            .with_parameter("top_drawdowns", options.top_drawdowns)
            .with_parameter("equity_bases", format!("{:?}", options.equity_bases));
        if let Some(modified) = strategy.last_modified {
            key = key.with_last_modified(modified);
        }
        key
    }

    /// Validates one strategy's trades and returns its report, reusing a cached one when the inputs match.
    pub fn analyze(&self, strategy: &LoadedStrategy) -> Result<Arc<AnalyticsReport>> {
        let source = strategy.source();
        let name = strategy.file.strategy.display_name();
        let start_time = Instant::now();

        let trades = PreparedTrades::from_records(&strategy.file.trades)
            .with_context(|| format!("Rejected trades in {source}"))?;

        let mut computed = false;
        let report = self.cache.get_or_compute(self.fingerprint(strategy, &trades), || {
            computed = true;
            self.engine.calculate(&strategy.file.strategy, &trades)
        });

        tracing::info!(
            source = %source,
            strategy = name,
            trades = trades.len(),
            cached = !computed,
            episodes = report.drawdown.episodes.len(),
            duration = ?start_time.elapsed(),
            "Analytics report ready."
        );
        Ok(report)
    }

    /// Analyzes independent strategies in parallel. Results keep the input order.
    pub fn analyze_all(
        &self,
        strategies: &[LoadedStrategy],
        worker_threads: Option<usize>,
    ) -> Result<Vec<Result<Arc<AnalyticsReport>>>> {
        let threads = worker_threads.unwrap_or(0);
        tracing::info!(strategies = strategies.len(), threads, "Configuring Rayon thread pool.");
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to build Rayon thread pool")?;

        let results = pool.install(|| {
            strategies
                .par_iter()
                .map(|strategy| self.analyze(strategy))
                .collect::<Vec<_>>()
        });

        let stats = self.cache_stats();
        tracing::info!(
            hits = stats.hits,
            misses = stats.misses,
            entries = stats.entries,
            "Finished analyzing strategies."
        );
        Ok(results)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse_strategy_file;
    use std::path::PathBuf;

    fn loaded(name: &str, body: &str) -> LoadedStrategy {
        LoadedStrategy {
            path: PathBuf::from(name),
            last_modified: None,
            file: parse_strategy_file(body).unwrap(),
        }
    }

    const THREE_TRADES: &str = r#"{
        "strategy": { "name": "gap-fade", "initial_capital": 10000 },
        "trades": [
            { "entry_date": "2024-01-03T09:00:00Z", "exit_date": "2024-01-03T16:00:00Z", "net_profit": 800 },
            { "entry_date": "2024-01-01T09:00:00Z", "exit_date": "2024-01-01T16:00:00Z", "net_profit": 500 },
            { "entry_date": "2024-01-02T09:00:00Z", "exit_date": "2024-01-02T16:00:00Z", "net_profit": -1200 }
        ]
    }"#;

    #[test]
    fn test_repeated_analysis_hits_cache() {
        let pipeline = ReportPipeline::new(AnalyticsOptions::default()).unwrap();
        let strategy = loaded("a.json", THREE_TRADES);

        let first = pipeline.analyze(&strategy).unwrap();
        let second = pipeline.analyze(&strategy).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(pipeline.cache_stats().hits, 1);
        assert_eq!(first.equity_curve.len(), 4);
        assert!(first.drawdown.episodes[0].recovery_date.is_none());
    }

    #[test]
    fn test_renamed_strategy_is_not_served_from_cache() {
        let pipeline = ReportPipeline::new(AnalyticsOptions::default()).unwrap();
        let original = loaded("a.json", THREE_TRADES);
        let mut renamed = original.clone();
        renamed.file.strategy.name = Some("gap-fade-v2".to_string());

        let first = pipeline.analyze(&original).unwrap();
        let second = pipeline.analyze(&renamed).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.strategy.as_deref(), Some("gap-fade-v2"));
        assert_eq!(pipeline.cache_stats().hits, 0);
    }

    #[test]
    fn test_parallel_results_keep_input_order() {
        let pipeline = ReportPipeline::new(AnalyticsOptions::default()).unwrap();
        let empty = r#"{ "strategy": { "name": "idle", "initial_capital": 500 } }"#;
        let strategies = vec![loaded("a.json", THREE_TRADES), loaded("b.json", empty)];

        let results = pipeline.analyze_all(&strategies, Some(2)).unwrap();
        assert_eq!(results.len(), 2);
        let first = results[0].as_ref().unwrap();
        let second = results[1].as_ref().unwrap();
        assert_eq!(first.strategy.as_deref(), Some("gap-fade"));
        assert_eq!(second.strategy.as_deref(), Some("idle"));
        assert_eq!(second.equity_curve.len(), 1);
    }

    #[test]
    fn test_invalid_trades_are_reported() {
        let pipeline = ReportPipeline::new(AnalyticsOptions::default()).unwrap();
        let bad = loaded(
            "bad.json",
            r#"{ "strategy": { "initial_capital": 1 }, "trades": [ { "net_profit": 5 } ] }"#,
        );
        let err = pipeline.analyze(&bad).unwrap_err();
        assert!(format!("{err:#}").contains("bad.json"));
        assert_eq!(pipeline.cache_stats().entries, 0);
    }
}
