//! Basic Usage Example
//!
//! Walks through the cache API: recency-driven eviction, the eviction
//! callback, clearing, iteration, sharing between threads and metrics.
//!
//! Run with: cargo run --example basic_usage

use slot_lru::config::LruCacheConfig;
use slot_lru::error::BoxError;
use slot_lru::metrics::CacheMetrics;
use slot_lru::LruCache;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

fn main() {
    println!("slot-lru Usage Examples");
    println!("=======================\n");

    recency_eviction();
    eviction_callback();
    iteration();
    shared_between_threads();
}

fn recency_eviction() {
    println!("1. Recency-driven eviction");

    let cache = LruCache::new(2, None);
    cache.put("a", 1).unwrap();
    cache.put("b", 2).unwrap();
    println!("   get(a) = {:?}", cache.get(&"a"));

    cache.put("c", 3).unwrap();
    println!("   after put(c): get(b) = {:?}", cache.get(&"b"));
    println!("   get(a) = {:?}, get(c) = {:?}\n", cache.get(&"a"), cache.get(&"c"));
}

fn eviction_callback() {
    println!("2. Eviction callback");

    let cache: LruCache<String, u32> = LruCache::init(
        LruCacheConfig { capacity: 2 },
        Some(Box::new(|key: String, value: u32| -> Result<(), BoxError> {
            println!("   evicted {} = {}", key, value);
            if value > 1 {
                return Err(format!("could not persist {}", key).into());
            }
            Ok(())
        })),
    );

    for (i, name) in ["alpha", "beta", "gamma", "delta"].iter().enumerate() {
        if let Err(err) = cache.put(name.to_string(), i as u32) {
            println!("   put({}) reported: {}", name, err);
        }
    }

    match cache.clear() {
        Ok(()) => println!("   cleared without errors\n"),
        Err(errors) => println!("   clear reported {} error(s):\n{}\n", errors.len(), errors),
    }
}

fn iteration() {
    println!("3. Iteration (storage order)");

    let cache = LruCache::new(4, None);
    for (i, word) in ["one", "two", "three", "four", "five"].iter().enumerate() {
        cache.put(*word, i).unwrap();
    }

    for (key, value) in cache.iter() {
        println!("   {} -> {}", key, value);
    }
    let keys: Vec<_> = cache.keys().collect();
    println!("   keys: {:?}\n", keys);
}

fn shared_between_threads() {
    println!("4. Sharing between threads");

    let cache: Arc<LruCache<String, usize>> = Arc::new(LruCache::new(1_000, None));
    let start = Instant::now();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..10_000 {
                    let key = format!("key_{}", (t * 7919 + i) % 2_000);
                    if i % 3 == 0 {
                        cache.put(key, i).unwrap();
                    } else {
                        let _ = cache.get(&key);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    println!("   40,000 operations in {:?}", start.elapsed());
    println!("   {} entries cached", cache.len());

    println!("   {} metrics:", cache.algorithm_name());
    for (name, value) in cache.metrics() {
        println!("     {:<18} {:.3}", name, value);
    }
}
