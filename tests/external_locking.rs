// ==============================================
// SHARED ACCESS BEHIND AN EXTERNAL LOCK
// ==============================================
//
// The cache itself is unsynchronized; these tests share one instance across
// threads through `parking_lot::Mutex` and check that the structure survives.

use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use recency_cache::OrderedCacheIndex;

#[test]
fn concurrent_writers_respect_capacity() {
    let cache = Arc::new(Mutex::new(OrderedCacheIndex::with_capacity(64)));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..500u32 {
                    let key = format!("t{t}-k{}", i % 100);
                    let mut guard = cache.lock();
                    if guard.get(&key).is_none() {
                        guard.store(key, i);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let guard = cache.lock();
    assert!(guard.len() <= 64);
    assert!(guard.check_invariants().is_ok());
}

#[test]
fn reader_sees_writer_promotion() {
    let cache = Arc::new(Mutex::new(OrderedCacheIndex::with_capacity(8)));
    {
        let mut guard = cache.lock();
        guard.store("a", 1);
        guard.store("b", 2);
    }

    let writer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            cache.lock().get("a");
        })
    };
    writer.join().unwrap();

    assert_eq!(cache.lock().first_key(), Some("a"));
}
