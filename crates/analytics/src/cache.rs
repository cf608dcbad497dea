// In crates/analytics/src/cache.rs

//! Caller-side memoization for analyzer results.
//!
//! The analyzers never consult this cache themselves. A caller builds an
//! [`InputFingerprint`] for the inputs it is about to analyze and asks the
//! cache for a stored result before recomputing.

use chrono::{DateTime, Utc};
use core_types::{StrategyMetadata, Trade};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Identifies one set of analyzer inputs.
///
/// Two fingerprints are equal only when the trade set id, count,
/// last-modified marker, content hash, strategy metadata and every parameter match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputFingerprint {
    trade_set: String,
    trade_count: usize,
    last_modified: Option<DateTime<Utc>>,
    content_hash: u64,
    strategy_hash: Option<u64>,
    parameters: Vec<(String, String)>,
}

impl InputFingerprint {
    pub fn new(trade_set: impl Into<String>, trades: &[Trade]) -> Self {
        Self {
            trade_set: trade_set.into(),
            trade_count: trades.len(),
            last_modified: None,
            content_hash: content_hash(trades),
            strategy_hash: None,
            parameters: Vec::new(),
        }
    }

    pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// Keys the result to every field of the owning strategy's metadata.
    pub fn with_strategy(mut self, strategy: &StrategyMetadata) -> Self {
        let mut hasher = DefaultHasher::new();
        strategy.hash(&mut hasher);
        self.strategy_hash = Some(hasher.finish());
        self
    }

    /// Adds a scalar parameter such as the period selector or bin count.
    pub fn with_parameter(mut self, name: &str, value: impl Display) -> Self {
        self.parameters.push((name.to_string(), value.to_string()));
        self
    }

    pub fn trade_set(&self) -> &str {
        &self.trade_set
    }
}

fn content_hash(trades: &[Trade]) -> u64 {
    let mut hasher = DefaultHasher::new();
    trades.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// A thread-safe map from input fingerprints to shared results.
#[derive(Debug)]
pub struct AnalyticsCache<V> {
    entries: Mutex<HashMap<InputFingerprint, Arc<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> Default for AnalyticsCache<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
}

impl<V> AnalyticsCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &InputFingerprint) -> Option<Arc<V>> {
        self.lock().get(key).cloned()
    }

    /// Returns the stored result, or computes and stores it on a miss.
    ///
    /// The computation runs without holding the lock. If two callers miss on
    /// the same key at once, the first insert wins and both get that value.
    pub fn get_or_compute<F>(&self, key: InputFingerprint, compute: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        match self.try_get_or_compute(key, || Ok::<V, std::convert::Infallible>(compute())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Like [`get_or_compute`](Self::get_or_compute), but a failed computation is
    /// returned to the caller and nothing is stored.
    pub fn try_get_or_compute<F, E>(&self, key: InputFingerprint, compute: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(hit) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(hit);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = Arc::new(compute()?);
        Ok(self.lock().entry(key).or_insert(value).clone())
    }

    /// Drops every entry computed from the given trade set.
    pub fn invalidate(&self, trade_set: &str) {
        self.lock().retain(|key, _| key.trade_set != trade_set);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<InputFingerprint, Arc<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
