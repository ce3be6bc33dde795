//! Cache Configuration
//!
//! Configuration for [`LruCache`](crate::LruCache). The struct has public
//! fields and is built with a struct literal, then handed to
//! [`LruCache::init`](crate::LruCache::init) or
//! [`LruCache::with_hasher`](crate::LruCache::with_hasher).
//!
//! # Sizing
//!
//! `capacity` is an entry count, not a byte budget. All slot storage is
//! reserved when the cache is built and never grows afterwards, so the
//! memory footprint is roughly:
//!
//! ```text
//! Total Memory ≈ capacity × (size_of::<K>() + size_of::<V>() + overhead_per_entry)
//! overhead_per_entry ≈ 2 link indices + one key-index bucket (plus a clone of K)
//! ```
//!
//! A capacity of zero is allowed: such a cache accepts every `put` and stores
//! nothing.
//!
//! # Examples
//!
//! ```
//! use slot_lru::config::LruCacheConfig;
//! use slot_lru::LruCache;
//!
//! let config = LruCacheConfig { capacity: 1000 };
//! let cache: LruCache<String, Vec<u8>> = LruCache::init(config, None);
//! assert_eq!(cache.capacity(), 1000);
//! ```

use core::fmt;

/// Configuration for an LRU (Least Recently Used) cache.
///
/// # Fields
///
/// - `capacity`: Maximum number of entries the cache can hold. Fixed for the
///   lifetime of the cache.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LruCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: usize,
}

impl fmt::Debug for LruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_config_creation() {
        let config = LruCacheConfig { capacity: 1000 };
        assert_eq!(config.capacity, 1000);
    }

    #[test]
    fn test_lru_config_debug() {
        let config = LruCacheConfig { capacity: 0 };
        assert_eq!(format!("{:?}", config), "LruCacheConfig { capacity: 0 }");
    }
}
