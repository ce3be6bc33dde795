//! Cache Metrics System
//!
//! Counters describing how a cache has been used, reported through the
//! [`CacheMetrics`] trait as a `BTreeMap<String, f64>`.
//!
//! # Why BTreeMap over HashMap?
//!
//! BTreeMap keeps metric names in a stable, sorted order, so snapshots print
//! and compare the same way every time. With about a dozen keys the lookup
//! cost difference is irrelevant.
//!
//! Counters are updated under the cache's lock and read as a snapshot, so a
//! report always reflects a single consistent point in the operation order.

use std::collections::BTreeMap;

pub mod lru;

pub use lru::LruCacheMetrics;

/// Counters tracked by every cache.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoreCacheMetrics {
    /// Total number of lookups (`get`, `get_with`) made to the cache
    pub requests: u64,

    /// Number of lookups that found their key
    pub cache_hits: u64,

    /// New keys stored without evicting anything
    pub insertions: u64,

    /// `put` calls that overwrote an existing key
    pub updates: u64,

    /// Entries displaced by a new key because the cache was full
    pub evictions: u64,

    /// Eviction callback invocations that reported an error
    pub eviction_failures: u64,

    /// Number of `clear` calls
    pub clears: u64,

    /// Entries removed by `clear`
    pub cleared_entries: u64,
}

impl CoreCacheMetrics {
    /// Creates a zeroed set of counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup that found its key
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a lookup that did not find its key
    ///
    /// Misses are not stored separately; they are `requests - cache_hits`.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records a new key stored in unused capacity
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records an in-place value update for an existing key
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Records an entry displaced by a new key
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Records `failures` failed eviction callback invocations
    pub fn record_eviction_failures(&mut self, failures: u64) {
        self.eviction_failures += failures;
    }

    /// Records a full reset that removed `entries` entries
    pub fn record_clear(&mut self, entries: u64) {
        self.clears += 1;
        self.cleared_entries += entries;
    }

    /// Lookups that did not find their key
    pub fn cache_misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Calculates the cache hit rate
    ///
    /// # Returns
    /// A value between 0.0 and 1.0, or 0.0 if no requests have been made
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Calculates the cache miss rate
    ///
    /// # Returns
    /// A value between 0.0 and 1.0, or 0.0 if no requests have been made
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Convert core metrics to BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        // Basic counters
        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("updates".to_string(), self.updates as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert(
            "eviction_failures".to_string(),
            self.eviction_failures as f64,
        );
        metrics.insert("clears".to_string(), self.clears as f64);
        metrics.insert("cleared_entries".to_string(), self.cleared_entries as f64);

        // Rates (0.0 to 1.0)
        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        metrics
    }
}

/// Trait that caches implement for metrics reporting
///
/// The trait uses BTreeMap so metric names come back in a deterministic order.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification (e.g. "LRU")
    fn algorithm_name(&self) -> &'static str;
}
