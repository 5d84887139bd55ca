#![no_main]

use libfuzzer_sys::fuzz_target;
use recency_cache::{CacheBuilder, EvictionPolicy};

// Fuzz arbitrary operation sequences on OrderedCacheIndex
//
// First byte picks capacity and eviction policy, then each byte pair is an
// (operation, key) step over a small key space so hits and evictions are
// frequent.
fuzz_target!(|data: &[u8]| {
    let Some((&header, ops)) = data.split_first() else {
        return;
    };

    let capacity = usize::from(header % 16) + 1;
    let policy = if header & 0x80 != 0 {
        EvictionPolicy::Bulk
    } else {
        EvictionPolicy::Single
    };
    let mut cache = CacheBuilder::new()
        .capacity(capacity)
        .eviction_policy(policy)
        .build::<u32>();

    for step in ops.chunks_exact(2) {
        let key = format!("k{}", step[1] % 32);
        let value = u32::from(step[1]);

        match step[0] % 9 {
            0 | 1 => {
                cache.store(key.as_str(), value);
                assert_eq!(cache.first_key(), Some(key.as_str()));
                assert_eq!(cache.peek(&key), Some(&value));
            }
            2 => {
                if cache.get(&key).is_some() {
                    assert_eq!(cache.first_key(), Some(key.as_str()));
                }
            }
            3 => {
                let before = cache.all_keys();
                let _ = cache.get_with(&key, false);
                assert_eq!(cache.all_keys(), before);
            }
            4 => {
                let had = cache.contains(&key);
                assert_eq!(cache.remove(&key).is_some(), had);
                assert!(!cache.contains(&key));
            }
            5 => {
                let tail = cache.last_key().map(str::to_owned);
                let popped = cache.pop_lru().map(|(k, _)| k);
                assert_eq!(popped, tail);
            }
            6 => {
                cache.touch(&key);
            }
            7 => {
                if let Some(rank) = cache.recency_rank(&key) {
                    assert_eq!(cache.all_keys()[rank], key);
                }
            }
            _ => {
                if step[1] % 8 == 0 {
                    cache.clear();
                    assert!(cache.is_empty());
                }
            }
        }

        assert!(cache.len() <= capacity);
        assert_eq!(cache.all_keys().len(), cache.len());
        assert!(cache.check_invariants().is_ok());
    }
});
