use recency_cache::persist;
use recency_cache::OrderedCacheIndex;

fn main() {
    let path = std::env::temp_dir().join("recency-cache-demo.json");

    let mut cache = OrderedCacheIndex::with_capacity(3);
    cache.store("a", 1);
    cache.store("b", 2);
    cache.store("c", 3);
    cache.get("a");

    if !persist::save_best_effort(&cache, &path) {
        eprintln!("could not write {}", path.display());
        return;
    }

    match persist::load_or_none::<i32>(&path) {
        Some(restored) => println!("restored order: {:?}", restored.all_keys()),
        None => println!("nothing to restore"),
    }

    let _ = std::fs::remove_file(&path);
}

// Expected output:
// restored order: ["a", "c", "b"]
