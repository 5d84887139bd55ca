use recency_cache::{CacheBuilder, EvictionPolicy};

fn main() {
    let mut cache = CacheBuilder::new()
        .capacity(4)
        .eviction_policy(EvictionPolicy::Bulk)
        .build::<u32>();

    for i in 0..5 {
        cache.store(format!("item-{i}"), i);
    }

    println!("len after overflow: {}", cache.len());
    println!("order: {:?}", cache.all_keys());
}

// Expected output:
// len after overflow: 3
// order: ["item-4", "item-3", "item-2"]
//
// Explanation: the fifth store overflows capacity 4, and bulk eviction drops
// capacity / 2 = 2 entries from the tail at once.
