//! Least Recently Used (LRU) Cache Implementation
//!
//! This module provides a fixed-capacity, thread-safe LRU cache with O(1)
//! `get`, `put` and eviction.
//!
//! # Algorithm
//!
//! Entries live in a slot arena reserved to the cache capacity. A doubly
//! linked recency list runs through the slots as integer indices, and a hash
//! map takes each key to the slot holding it:
//!
//! ```text
//!   key index                 slots (storage order)            recency
//!  ┌──────────┐         ┌────────────────────────────┐
//!  │ "a" ──▶ 0│────────▶│ 0: a=1  prev:1   next:–    │  ◀── tail (LRU)
//!  │ "b" ──▶ 2│──┐      │ 1: c=3  prev:–   next:0    │  ◀── head (MRU)
//!  │ "c" ──▶ 1│──┼─────▶│ 2: b=2  ...                │
//!  └──────────┘  └─────▶└────────────────────────────┘
//! ```
//!
//! - A hit promotes the slot to the head of the list.
//! - A new key is stored in the next unused slot while there is room.
//! - Once full, a new key overwrites the tail slot in place and the slot is
//!   promoted; nothing is shifted or reallocated.
//!
//! # Eviction Callback
//!
//! An optional callback receives every entry removed from the cache, both on
//! eviction and on [`clear`](LruCache::clear). Its error is returned to the
//! caller but never prevents the removal: the cache is always left
//! consistent.
//!
//! # Thread Safety
//!
//! Every operation runs under one `parking_lot::Mutex`. `get` reorders the
//! recency list, so there is no read-only path and no `RwLock`. The eviction
//! callback runs while the lock is held, and iterators hold it until they
//! are dropped; neither may call back into the same cache.

use crate::config::LruCacheConfig;
use crate::error::{BoxError, EvictionErrors};
use crate::metrics::{CacheMetrics, LruCacheMetrics};
use crate::slots::SlotList;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Callback invoked with each entry removed from the cache.
///
/// Runs under the cache lock; it must not call back into the same cache.
pub type OnEvict<K, V, E> = Box<dyn FnMut(K, V) -> Result<(), E> + Send>;

/// The unlocked LRU engine: slot arena, key index, callback and counters.
///
/// `LruCache` wraps exactly one of these in a mutex. All algorithm logic is
/// implemented here and takes `&mut self`.
pub(crate) struct LruSegment<K, V, E, S = DefaultHashBuilder> {
    slots: SlotList<K, V>,
    map: HashMap<K, usize, S>,
    on_evict: Option<OnEvict<K, V, E>>,
    metrics: LruCacheMetrics,
}

impl<K: Hash + Eq, V, E, S: BuildHasher> LruSegment<K, V, E, S> {
    pub(crate) fn with_hasher(
        config: LruCacheConfig,
        on_evict: Option<OnEvict<K, V, E>>,
        hash_builder: S,
    ) -> Self {
        debug!(capacity = config.capacity, "creating LRU cache");
        LruSegment {
            slots: SlotList::new(config.capacity),
            map: HashMap::with_capacity_and_hasher(config.capacity, hash_builder),
            on_evict,
            metrics: LruCacheMetrics::new(config.capacity as u64),
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> usize {
        self.slots.cap()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub(crate) fn metrics(&self) -> LruCacheMetrics {
        let mut metrics = self.metrics.clone();
        metrics.len = self.len() as u64;
        metrics
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// Looks up `key` without touching recency or metrics.
    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = *self.map.get(key)?;
        self.slots.get(idx).map(|slot| &slot.value)
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.map.get(key).copied() {
            Some(idx) => {
                self.slots.move_to_front(idx);
                self.metrics.core.record_hit();
                self.slots.get(idx).map(|slot| &slot.value)
            }
            None => {
                self.metrics.core.record_miss();
                None
            }
        }
    }
}

impl<K: Hash + Eq + Clone, V, E, S: BuildHasher> LruSegment<K, V, E, S> {
    pub(crate) fn put(&mut self, key: K, value: V) -> Result<(), E> {
        if self.cap() == 0 {
            return Ok(());
        }

        if let Some(idx) = self.map.get(&key).copied() {
            if let Some(slot) = self.slots.get_mut(idx) {
                slot.value = value;
            }
            self.slots.move_to_front(idx);
            self.metrics.core.record_update();
            return Ok(());
        }

        if !self.slots.is_full() {
            let idx = self.slots.push_front(key.clone(), value);
            self.map.insert(key, idx);
            self.metrics.core.record_insertion();
            return Ok(());
        }

        self.evict_into(key, value)
    }

    /// Reuses the tail slot for a new entry and reports the victim.
    fn evict_into(&mut self, key: K, value: V) -> Result<(), E> {
        let Some(victim) = self.slots.tail() else {
            return Ok(());
        };

        let index_key = key.clone();
        let Some((old_key, old_value)) = self.slots.replace(victim, key, value) else {
            return Ok(());
        };
        self.map.remove(&old_key);
        self.map.insert(index_key, victim);
        self.slots.move_to_front(victim);
        self.metrics.core.record_eviction();
        trace!(slot = victim, "evicted least recently used entry");

        let Some(on_evict) = self.on_evict.as_mut() else {
            return Ok(());
        };
        let result = on_evict(old_key, old_value);
        if result.is_err() {
            self.metrics.core.record_eviction_failures(1);
            warn!(slot = victim, "eviction callback reported an error");
        }
        result
    }

    pub(crate) fn clear(&mut self) -> Result<(), EvictionErrors<E>> {
        let cleared = self.slots.len();
        let mut errors = EvictionErrors::new();

        // index first: a panicking callback must not leave stale slot mappings
        self.map.clear();
        match self.on_evict.as_mut() {
            Some(on_evict) => {
                for (key, value) in self.slots.drain() {
                    if let Err(err) = on_evict(key, value) {
                        errors.push(err);
                    }
                }
            }
            None => self.slots.clear(),
        }

        self.metrics.core.record_clear(cleared as u64);
        if !errors.is_empty() {
            self.metrics
                .core
                .record_eviction_failures(errors.len() as u64);
            warn!(
                cleared,
                failures = errors.len(),
                "eviction callback reported errors during clear"
            );
        }
        debug!(cleared, "cleared LRU cache");
        errors.into_result()
    }
}

impl<K, V, E, S> fmt::Debug for LruSegment<K, V, E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruSegment")
            .field("capacity", &self.slots.cap())
            .field("len", &self.slots.len())
            .field("on_evict", &self.on_evict.is_some())
            .finish()
    }
}

/// A fixed-capacity, thread-safe Least Recently Used (LRU) cache.
///
/// The cache holds at most `capacity` entries. When full, storing a new key
/// evicts the least recently used entry and hands it to the optional eviction
/// callback. All operations take `&self` and are serialized by a single lock,
/// so the cache is shared between threads by reference or `Arc`, never by
/// copy.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq`; `put` also needs `Clone`.
/// - `V`: Value type. Accessors that return values need `Clone`.
/// - `E`: Error type reported by the eviction callback. Defaults to
///   [`BoxError`].
/// - `S`: Hash builder type. Defaults to `DefaultHashBuilder`.
///
/// # Examples
///
/// ```
/// use slot_lru::LruCache;
///
/// let cache = LruCache::new(2, None);
///
/// cache.put("apple", 1).unwrap();
/// cache.put("banana", 2).unwrap();
///
/// // Accessing items updates their recency
/// assert_eq!(cache.get(&"apple"), Some(1));
///
/// // Adding beyond capacity evicts the least recently used item
/// cache.put("cherry", 3).unwrap();
/// assert_eq!(cache.get(&"banana"), None);
/// assert_eq!(cache.get(&"apple"), Some(1));
/// assert_eq!(cache.get(&"cherry"), Some(3));
/// ```
pub struct LruCache<K, V, E = BoxError, S = DefaultHashBuilder> {
    segment: Mutex<LruSegment<K, V, E, S>>,
}

impl<K: Hash + Eq, V> LruCache<K, V> {
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// If `on_evict` is set it is called with every entry the cache removes.
    pub fn new(capacity: usize, on_evict: Option<OnEvict<K, V, BoxError>>) -> Self {
        Self::init(LruCacheConfig { capacity }, on_evict)
    }
}

impl<K: Hash + Eq, V, E> LruCache<K, V, E> {
    /// Creates a cache from a configuration and an optional eviction callback.
    ///
    /// # Example
    ///
    /// ```
    /// use slot_lru::config::LruCacheConfig;
    /// use slot_lru::LruCache;
    ///
    /// #[derive(Debug)]
    /// struct Rejected;
    ///
    /// let cache: LruCache<u64, String, Rejected> = LruCache::init(
    ///     LruCacheConfig { capacity: 1 },
    ///     Some(Box::new(|_key: u64, _value: String| -> Result<(), Rejected> {
    ///         Err(Rejected)
    ///     })),
    /// );
    /// cache.put(1, "one".to_string()).unwrap();
    /// assert!(cache.put(2, "two".to_string()).is_err());
    /// assert_eq!(cache.get(&2), Some("two".to_string()));
    /// ```
    pub fn init(config: LruCacheConfig, on_evict: Option<OnEvict<K, V, E>>) -> Self {
        Self::with_hasher(config, on_evict, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq, V, E, S: BuildHasher> LruCache<K, V, E, S> {
    /// Creates a cache with a custom hash builder.
    ///
    /// Use this for deterministic hashing or DoS-resistant hashers.
    pub fn with_hasher(
        config: LruCacheConfig,
        on_evict: Option<OnEvict<K, V, E>>,
        hash_builder: S,
    ) -> Self {
        LruCache {
            segment: Mutex::new(LruSegment::with_hasher(config, on_evict, hash_builder)),
        }
    }

    /// Maximum number of entries the cache can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.segment.lock().cap()
    }

    /// Number of entries currently cached.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.lock().len()
    }

    /// Returns `true` if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.lock().is_empty()
    }

    /// Returns `true` if `key` is cached. Does not update recency.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().contains_key(key)
    }

    /// Retrieves a clone of the value for `key`.
    ///
    /// On a hit the entry becomes the most recently used. A miss changes
    /// nothing.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.segment.lock().get(key).cloned()
    }

    /// Retrieves a value and applies `f` to it while holding the lock.
    ///
    /// Avoids cloning the value. Recency is updated exactly as for
    /// [`get`](Self::get). `f` must not call back into the cache.
    ///
    /// # Example
    ///
    /// ```
    /// use slot_lru::LruCache;
    ///
    /// let cache = LruCache::new(4, None);
    /// cache.put("greeting", "hello world".to_string()).unwrap();
    /// assert_eq!(cache.get_with(&"greeting", |value| value.len()), Some(11));
    /// ```
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.segment.lock().get(key).map(f)
    }

    /// Retrieves a clone of the value for `key` without updating recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.segment.lock().peek(key).cloned()
    }

    /// Returns a snapshot of the cache's counters.
    pub fn metrics_snapshot(&self) -> LruCacheMetrics {
        self.segment.lock().metrics()
    }

    /// Iterates over all entries in storage order.
    ///
    /// The cache stays locked until the iterator is dropped, so the loop body
    /// must not call other methods on this cache. Stopping early releases the
    /// lock as soon as the iterator goes out of scope.
    ///
    /// # Example
    ///
    /// ```
    /// use slot_lru::LruCache;
    ///
    /// let cache = LruCache::new(3, None);
    /// cache.put("a", 1).unwrap();
    /// cache.put("b", 2).unwrap();
    /// let entries: Vec<_> = cache.iter().collect();
    /// assert_eq!(entries, vec![("a", 1), ("b", 2)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            cursor: self.cursor(),
        }
    }

    /// Iterates over all keys in storage order. Holds the lock like [`iter`](Self::iter).
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            cursor: self.cursor(),
        }
    }

    /// Iterates over all values in storage order. Holds the lock like [`iter`](Self::iter).
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            cursor: self.cursor(),
        }
    }

    fn cursor(&self) -> Cursor<'_, K, V> {
        Cursor {
            slots: MutexGuard::map(self.segment.lock(), |segment| &mut segment.slots),
            pos: 0,
        }
    }
}

impl<K: Hash + Eq + Clone, V, E, S: BuildHasher> LruCache<K, V, E, S> {
    /// Inserts or updates a key-value pair.
    ///
    /// - An existing key has its value replaced and becomes the most recently
    ///   used entry; nothing is evicted.
    /// - A new key is stored in unused capacity if there is any.
    /// - Otherwise the least recently used entry is evicted, its slot is
    ///   reused for the new entry, and the eviction callback (if any) receives
    ///   the evicted key and value.
    ///
    /// # Errors
    ///
    /// Returns the callback's error when an eviction occurred and the callback
    /// failed. The new entry is stored regardless.
    ///
    /// # Panics
    ///
    /// Propagates a panic from the eviction callback. The callback runs after
    /// the new entry has replaced the evicted one, so the cache stays
    /// consistent and already holds the new entry when the panic unwinds.
    pub fn put(&self, key: K, value: V) -> Result<(), E> {
        self.segment.lock().put(key, value)
    }

    /// Removes every entry, handing each one to the eviction callback in
    /// storage order.
    ///
    /// The cache is empty and fully reusable afterwards.
    ///
    /// # Errors
    ///
    /// Returns every callback failure, in visiting order, when at least one
    /// invocation failed.
    ///
    /// # Panics
    ///
    /// Propagates a panic from the eviction callback. Entries not yet visited
    /// are dropped without reaching the callback and the cache is left empty.
    pub fn clear(&self) -> Result<(), EvictionErrors<E>> {
        self.segment.lock().clear()
    }
}

impl<K: Hash + Eq, V, E, S: BuildHasher> CacheMetrics for LruCache<K, V, E, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics_snapshot().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}

impl<K, V, E, S> fmt::Debug for LruCache<K, V, E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("LruCache");
        match self.segment.try_lock() {
            Some(segment) => d.field("segment", &*segment),
            None => d.field("segment", &format_args!("<locked>")),
        };
        d.finish()
    }
}

/// A locked, forward-only position in the slot arena.
struct Cursor<'a, K, V> {
    slots: MappedMutexGuard<'a, SlotList<K, V>>,
    pos: usize,
}

impl<K, V> Cursor<'_, K, V> {
    fn advance<T>(&mut self, f: impl FnOnce(&K, &V) -> T) -> Option<T> {
        let item = self.slots.entry(self.pos).map(|(k, v)| f(k, v))?;
        self.pos += 1;
        Some(item)
    }

    fn remaining(&self) -> usize {
        self.slots.len().saturating_sub(self.pos)
    }
}

/// Iterator over `(key, value)` clones, created by [`LruCache::iter`].
///
/// Holds the cache lock until dropped.
pub struct Iter<'a, K, V> {
    cursor: Cursor<'a, K, V>,
}

impl<K: Clone, V: Clone> Iterator for Iter<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.advance(|k, v| (k.clone(), v.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cursor.remaining();
        (remaining, Some(remaining))
    }
}

impl<K: Clone, V: Clone> ExactSizeIterator for Iter<'_, K, V> {}
impl<K: Clone, V: Clone> FusedIterator for Iter<'_, K, V> {}

/// Iterator over key clones, created by [`LruCache::keys`].
pub struct Keys<'a, K, V> {
    cursor: Cursor<'a, K, V>,
}

impl<K: Clone, V> Iterator for Keys<'_, K, V> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.cursor.advance(|k, _| k.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cursor.remaining();
        (remaining, Some(remaining))
    }
}

impl<K: Clone, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K: Clone, V> FusedIterator for Keys<'_, K, V> {}

/// Iterator over value clones, created by [`LruCache::values`].
pub struct Values<'a, K, V> {
    cursor: Cursor<'a, K, V>,
}

impl<K, V: Clone> Iterator for Values<'_, K, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        self.cursor.advance(|_, v| v.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cursor.remaining();
        (remaining, Some(remaining))
    }
}

impl<K, V: Clone> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V: Clone> FusedIterator for Values<'_, K, V> {}

macro_rules! impl_iter_debug {
    ($($name:ident),*) => {$(
        impl<K, V> fmt::Debug for $name<'_, K, V> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("pos", &self.cursor.pos)
                    .field("len", &self.cursor.slots.len())
                    .finish()
            }
        }
    )*};
}

impl_iter_debug!(Iter, Keys, Values);
