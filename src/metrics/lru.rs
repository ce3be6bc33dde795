//! LRU Cache Metrics
//!
//! Metrics reported by [`LruCache`](crate::LruCache).

use super::{CacheMetrics, CoreCacheMetrics};
use std::collections::BTreeMap;

/// LRU metrics: the core counters plus the configured capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LruCacheMetrics {
    /// Core metrics common to all caches
    pub core: CoreCacheMetrics,
    /// Maximum number of entries the cache can hold
    pub capacity: u64,
    /// Entries held when the snapshot was taken
    pub len: u64,
}

impl LruCacheMetrics {
    /// Creates zeroed metrics for a cache of the given capacity
    pub fn new(capacity: u64) -> Self {
        Self {
            core: CoreCacheMetrics::new(),
            capacity,
            len: 0,
        }
    }

    /// Fraction of the capacity currently in use, 0.0 for a zero-capacity cache
    pub fn utilization(&self) -> f64 {
        if self.capacity > 0 {
            self.len as f64 / self.capacity as f64
        } else {
            0.0
        }
    }

    /// Converts LRU metrics to a BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();
        metrics.insert("capacity".to_string(), self.capacity as f64);
        metrics.insert("len".to_string(), self.len as f64);
        metrics.insert("utilization".to_string(), self.utilization());
        metrics
    }
}

impl CacheMetrics for LruCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}
