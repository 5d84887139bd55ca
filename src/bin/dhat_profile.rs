//! DHAT heap profiler for recency-cache.
//!
//! Run with: cargo run --bin dhat_profile --release --features dhat-heap
//! View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use recency_cache::persist::PersistenceCodec;
use recency_cache::{EvictionPolicy, OrderedCacheIndex};

/// XorShift64 so runs allocate identically.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

/// 90% of accesses hit 10% of keys.
fn hotset_workload(cache: &mut OrderedCacheIndex<u64>, operations: usize, universe: u64) {
    let mut rng = XorShift64::new(42);
    let hot_size = (universe / 10).max(1);

    for _ in 0..operations {
        let id = if rng.next_u64() % 10 != 0 {
            rng.next_u64() % hot_size
        } else {
            hot_size + rng.next_u64() % (universe - hot_size).max(1)
        };
        let key = format!("key-{id}");
        if cache.get(&key).is_none() {
            cache.store(key, id);
        }
    }
}

fn eviction_churn(cache: &mut OrderedCacheIndex<u64>, operations: usize) {
    for i in 0..operations as u64 {
        cache.store(format!("churn-{i}"), i);
    }
}

fn profile(policy: EvictionPolicy) {
    println!("Profiling {:?} eviction...", policy);
    let capacity = 4096;
    let operations = 100_000;

    let mut cache = OrderedCacheIndex::builder()
        .capacity(capacity)
        .eviction_policy(policy)
        .build::<u64>();
    hotset_workload(&mut cache, operations, (capacity * 4) as u64);
    eviction_churn(&mut cache, operations / 4);

    let serialized = PersistenceCodec::serialize(&cache);
    let restored = PersistenceCodec::deserialize(serialized);

    println!("  Final size: {} (restored {})", cache.len(), restored.len());
    println!(
        "  Approx bytes: {} (restored {})",
        cache.approx_bytes(),
        restored.approx_bytes()
    );
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    println!("recency-cache DHAT Heap Profiling");
    println!("=================================\n");

    profile(EvictionPolicy::Single);
    profile(EvictionPolicy::Bulk);

    println!("\n=================================");
    println!("Profiling complete!");
}
