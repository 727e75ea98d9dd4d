//! Hit/miss accounting for the cache instance

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Counters owned by a single cache instance.
///
/// `api_hits` and `cache_hits` are driven by the orchestrator; the positive
/// and negative hit counters are an annotation channel for an external
/// evaluator judging cache-hit correctness and never influence the hit/miss
/// decision. Counters only decrease via `reset`.
#[derive(Debug, Default)]
pub struct CacheStats {
    api_hits: AtomicU64,
    cache_hits: AtomicU64,
    positive_hits: AtomicU64,
    negative_hits: AtomicU64,
}

impl CacheStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completion-provider invocation
    pub fn record_api_hit(&self) {
        self.api_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a query served from the store
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an externally-judged correct cache hit
    pub fn record_positive_hit(&self) {
        self.positive_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an externally-judged incorrect cache hit
    pub fn record_negative_hit(&self) {
        self.negative_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the completion invocation count
    pub fn api_hits(&self) -> u64 {
        self.api_hits.load(Ordering::Relaxed)
    }

    /// Get the cache hit count
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Get the positive hit count
    pub fn positive_hits(&self) -> u64 {
        self.positive_hits.load(Ordering::Relaxed)
    }

    /// Get the negative hit count
    pub fn negative_hits(&self) -> u64 {
        self.negative_hits.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.api_hits.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.positive_hits.store(0, Ordering::Relaxed);
        self.negative_hits.store(0, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of the counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            api_hits: self.api_hits(),
            cache_hits: self.cache_hits(),
            positive_hits: self.positive_hits(),
            negative_hits: self.negative_hits(),
        }
    }
}

/// Point-in-time view of the counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Completion-provider invocations (misses)
    pub api_hits: u64,
    /// Queries served from the store
    pub cache_hits: u64,
    /// Externally-judged correct hits
    pub positive_hits: u64,
    /// Externally-judged incorrect hits
    pub negative_hits: u64,
}

impl StatsSnapshot {
    /// Fraction of queries served from the cache
    pub fn hit_rate(&self) -> f32 {
        let total = self.cache_hits + self.api_hits;

        if total == 0 {
            return 0.0;
        }

        self.cache_hits as f32 / total as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_increment() {
        let stats = CacheStats::new();

        stats.record_api_hit();
        stats.record_api_hit();
        stats.record_cache_hit();
        stats.record_positive_hit();
        stats.record_negative_hit();

        assert_eq!(stats.api_hits(), 2);
        assert_eq!(stats.cache_hits(), 1);
        assert_eq!(stats.positive_hits(), 1);
        assert_eq!(stats.negative_hits(), 1);
    }

    #[test]
    fn test_reset() {
        let stats = CacheStats::new();

        stats.record_api_hit();
        stats.record_cache_hit();
        stats.reset();

        assert_eq!(stats.api_hits(), 0);
        assert_eq!(stats.cache_hits(), 0);
    }

    #[test]
    fn test_snapshot_hit_rate() {
        let stats = CacheStats::new();

        for _ in 0..8 {
            stats.record_cache_hit();
        }
        for _ in 0..2 {
            stats.record_api_hit();
        }

        let snapshot = stats.snapshot();
        assert!((snapshot.hit_rate() - 0.8).abs() < 0.01);
    }

    #[test]
    fn test_hit_rate_no_queries() {
        let stats = CacheStats::new();

        assert_eq!(stats.snapshot().hit_rate(), 0.0);
    }
}
