//! Concurrent Correctness Tests
//!
//! These tests validate that the cache keeps its eviction semantics and
//! internal consistency while being accessed from multiple threads.
//!
//! ## Test Strategy
//!
//! Unlike throughput benchmarks, these tests:
//! - Use small caches so evictions happen constantly
//! - Check invariants that must hold under any interleaving
//! - Share the cache both through `Arc` and through scoped borrows
//!
//! ## Segments
//!
//! 1. **Algorithm Correctness**: Eviction behavior under concurrent access
//! 2. **Thread Safety Invariants**: Cache state consistency under concurrency

use scoped_threadpool::Pool;
use slot_lru::error::BoxError;
use slot_lru::LruCache;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

// ============================================================================
// SEGMENT 1: ALGORITHM CORRECTNESS UNDER CONCURRENCY
// ============================================================================

#[test]
fn test_concurrent_lru_access_prevents_eviction() {
    let cache: Arc<LruCache<i32, i32>> = Arc::new(LruCache::new(3, None));

    cache.put(1, 10).unwrap();
    cache.put(2, 20).unwrap();
    cache.put(3, 30).unwrap();

    // Touch key 1 from another thread; recency is global to the cache
    {
        let cache = Arc::clone(&cache);
        thread::spawn(move || assert_eq!(cache.get(&1), Some(10)))
            .join()
            .unwrap();
    }

    cache.put(4, 40).unwrap();

    assert!(cache.get(&2).is_none(), "Key 2 should be evicted (LRU)");
    assert!(cache.get(&1).is_some(), "Key 1 should remain");
    assert!(cache.get(&3).is_some(), "Key 3 should remain");
    assert!(cache.get(&4).is_some(), "Key 4 should be present");
}

#[test]
fn test_concurrent_lru_writes_maintain_capacity() {
    let cache: Arc<LruCache<i32, i32>> = Arc::new(LruCache::new(20, None));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..100 {
                    let key = t * 1000 + i;
                    cache.put(key, key).unwrap();
                    assert!(cache.len() <= 20);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 20);
}

#[test]
fn test_concurrent_lru_every_overflow_is_reported() {
    let evictions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&evictions);
    let cache: Arc<LruCache<u64, u64>> = Arc::new(LruCache::new(
        16,
        Some(Box::new(move |_key: u64, _value: u64| -> Result<(), BoxError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })),
    ));

    let threads = 8u64;
    let per_thread = 250u64;
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..per_thread {
                    cache.put(t * per_thread + i, i).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // every distinct key beyond the capacity displaced exactly one entry
    let inserted = (threads * per_thread) as usize;
    assert_eq!(evictions.load(Ordering::SeqCst), inserted - 16);
    assert_eq!(cache.len(), 16);
}

#[test]
fn test_concurrent_lru_evicted_and_resident_partition_keys() {
    let evicted = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&evicted);
    let cache: LruCache<u32, u32> = LruCache::new(
        32,
        Some(Box::new(move |key: u32, _value: u32| -> Result<(), BoxError> {
            sink.lock().unwrap().push(key);
            Ok(())
        })),
    );

    let mut pool = Pool::new(4);
    pool.scoped(|scope| {
        for t in 0..4u32 {
            let cache = &cache;
            scope.execute(move || {
                for i in 0..200 {
                    cache.put(t * 10_000 + i, i).unwrap();
                    let _ = cache.get(&(t * 10_000 + i / 2));
                }
            });
        }
    });

    let evicted: HashSet<u32> = evicted.lock().unwrap().iter().copied().collect();
    let resident: HashSet<u32> = cache.keys().collect();
    assert_eq!(resident.len(), 32);
    assert!(evicted.is_disjoint(&resident));
    assert_eq!(evicted.len() + resident.len(), 800);
}

// ============================================================================
// SEGMENT 2: THREAD SAFETY INVARIANTS
// ============================================================================

#[test]
fn test_concurrent_lru_mixed_operations() {
    let cache: Arc<LruCache<String, usize>> = Arc::new(LruCache::new(100, None));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..1000 {
                    let key = format!("key_{}", i % 200);
                    match i % 4 {
                        0 => cache.put(key, i).unwrap(),
                        1 => {
                            let _ = cache.get(&key);
                        }
                        2 => {
                            let _ = cache.get_with(&key, |v| *v + 1);
                        }
                        3 => {
                            let _ = cache.peek(&key);
                        }
                        _ => unreachable!(),
                    }

                    if i == 500 && t == 0 {
                        cache.clear().unwrap();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= 100);
    let keys: Vec<String> = cache.keys().collect();
    let unique: HashSet<&String> = keys.iter().collect();
    assert_eq!(keys.len(), unique.len(), "Keys must be unique");
    assert_eq!(keys.len(), cache.len());
}

#[test]
fn test_concurrent_lru_values_match_last_write() {
    // Each thread owns its key range, so the last write per key is known
    let cache: LruCache<(usize, usize), usize> = LruCache::new(64, None);

    let mut pool = Pool::new(4);
    pool.scoped(|scope| {
        for t in 0..4usize {
            let cache = &cache;
            scope.execute(move || {
                for round in 0..50 {
                    for i in 0..16 {
                        cache.put((t, i), round).unwrap();
                    }
                }
            });
        }
    });

    assert_eq!(cache.len(), 64);
    for (_, value) in cache.iter() {
        assert_eq!(value, 49);
    }
}

#[test]
fn test_concurrent_lru_iteration_sees_consistent_snapshot() {
    let cache: Arc<LruCache<u32, u32>> = Arc::new(LruCache::new(50, None));
    for i in 0..50 {
        cache.put(i, i).unwrap();
    }

    let writer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for i in 50..5_000 {
                cache.put(i, i).unwrap();
            }
        })
    };

    for _ in 0..100 {
        // keys equal values for every write, so any torn read would show up
        let entries: Vec<_> = cache.iter().collect();
        assert_eq!(entries.len(), 50);
        assert!(entries.iter().all(|(k, v)| k == v));
    }

    writer.join().unwrap();
}

#[test]
fn test_concurrent_lru_clear_under_load() {
    let cleared = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&cleared);
    let cache: Arc<LruCache<u32, u32>> = Arc::new(LruCache::new(
        10,
        Some(Box::new(move |_key: u32, _value: u32| -> Result<(), BoxError> {
            counter.fetch_add(1, Ordering::Relaxed);
            Ok(())
        })),
    ));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..500u32 {
                    if t == 0 && i % 50 == 0 {
                        cache.clear().unwrap();
                    } else {
                        cache.put(t * 1000 + i, i).unwrap();
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= 10);
    cache.clear().unwrap();
    assert!(cache.is_empty());
    // every stored entry left through an eviction or a clear exactly once
    let stored = 3 * 500 + (500 - 10);
    assert_eq!(cleared.load(Ordering::Relaxed), stored);
}
