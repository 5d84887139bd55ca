use recency_cache::OrderedCacheIndex;

fn main() {
    let mut cache: OrderedCacheIndex<String> = OrderedCacheIndex::with_capacity(2);

    cache.store("alpha", "first".to_string());
    cache.store("beta", "second".to_string());

    if let Some(value) = cache.get("alpha") {
        println!("hit alpha: {}", value);
    }

    cache.store("gamma", "third".to_string());

    println!("contains beta? {}", cache.contains("beta"));
    println!("order: {:?}", cache.all_keys());
}

// Expected output:
// hit alpha: first
// contains beta? false
// order: ["gamma", "alpha"]
//
// Explanation: capacity=2; after get("alpha"), alpha is most recent and beta
// is least recent. Storing gamma evicts beta.
