#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Quick Reference
//!
//! | Operation | Method | Complexity | Effect on recency |
//! |-----------|--------|------------|-------------------|
//! | Lookup | [`LruCache::get`] / [`LruCache::get_with`] | O(1) | Hit becomes MRU |
//! | Lookup without promotion | [`LruCache::peek`] / [`LruCache::contains_key`] | O(1) | None |
//! | Insert / update | [`LruCache::put`] | O(1) + callback | Entry becomes MRU |
//! | Reset | [`LruCache::clear`] | O(n) + callbacks | Everything removed |
//! | Iterate | [`LruCache::iter`] / [`LruCache::keys`] / [`LruCache::values`] | O(n) | None |
//!
//! ## Storage Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    LruCache  (one Mutex)                         │
//! │                                                                  │
//! │   key index: HashMap<K, usize>                                   │
//! │        │                                                         │
//! │        ▼                                                         │
//! │   slots: [ 0 | 1 | 2 | ... | len-1 | (unused) ... | cap-1 ]      │
//! │            ▲                    ▲                                │
//! │            └── prev/next indices form the recency list ──┘       │
//! │                head = MRU slot, tail = LRU slot                  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Eviction Callback
//!
//! ```rust
//! use slot_lru::error::BoxError;
//! use slot_lru::LruCache;
//! use std::sync::{Arc, Mutex};
//!
//! let evicted = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&evicted);
//! let cache = LruCache::new(
//!     1,
//!     Some(Box::new(move |key: &'static str, value: i32| -> Result<(), BoxError> {
//!         sink.lock().unwrap().push((key, value));
//!         Ok(())
//!     })),
//! );
//!
//! cache.put("a", 1).unwrap();
//! cache.put("b", 2).unwrap();
//! assert_eq!(*evicted.lock().unwrap(), vec![("a", 1)]);
//! assert_eq!(cache.get(&"a"), None);
//! ```
//!
//! ## Sharing Between Threads
//!
//! Every method takes `&self`; share the cache through `Arc` or a scoped
//! borrow. The cache is not `Clone`.
//!
//! ```rust
//! use slot_lru::LruCache;
//! use std::sync::Arc;
//!
//! let cache = Arc::new(LruCache::new(100, None));
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let cache = Arc::clone(&cache);
//!         std::thread::spawn(move || {
//!             for i in 0..50 {
//!                 cache.put(t * 100 + i, i).unwrap();
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.len(), 100);
//! ```
//!
//! ## Modules
//!
//! - [`lru`]: The cache and its iterators
//! - [`config`]: Configuration structure
//! - [`error`]: Eviction callback error types
//! - [`metrics`]: Usage counters

/// Fixed-capacity slot arena with an intrusive, index-linked recency list.
///
/// Internal infrastructure behind [`LruCache`].
pub(crate) mod slots;

/// Cache configuration structures.
pub mod config;

/// Error types surfaced from eviction callbacks.
pub mod error;

/// Least Recently Used (LRU) cache implementation.
///
/// Provides a fixed-size, thread-safe cache that evicts the least recently
/// used entry when the capacity is reached.
pub mod lru;

/// Cache metrics system.
///
/// Counters for hits, misses, insertions, evictions and callback failures,
/// reported through the [`CacheMetrics`](metrics::CacheMetrics) trait.
pub mod metrics;

pub use config::LruCacheConfig;
pub use error::{BoxError, EvictionErrors};
pub use lru::{Iter, Keys, LruCache, OnEvict, Values};
pub use metrics::{CacheMetrics, LruCacheMetrics};
