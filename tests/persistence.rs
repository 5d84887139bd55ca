// ==============================================
// DISK PERSISTENCE (integration)
// ==============================================
//
// Save/load through real files in a temporary directory: order survives a
// restart, failures are typed on the hardened path and swallowed on the
// best-effort path.

use std::fs;

use recency_cache::persist::{self, Json, PersistenceCodec};
use recency_cache::prelude::*;

fn sample() -> OrderedCacheIndex<String> {
    let mut cache = CacheBuilder::new()
        .capacity(4)
        .eviction_policy(EvictionPolicy::Bulk)
        .build();
    for (key, value) in [("a", "alpha"), ("b", "beta"), ("c", "gamma")] {
        cache.store(key, value.to_string());
    }
    cache.get("a");
    cache
}

#[test]
fn restart_preserves_order_values_and_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let original = sample();

    original.save_to_disk(&path).unwrap();
    let restored = OrderedCacheIndex::<String>::load_from_disk(&path).unwrap();

    assert_eq!(restored.all_keys(), ["a", "c", "b"]);
    assert_eq!(restored.all_values(), original.all_values());
    assert_eq!(restored.capacity(), 4);
    assert_eq!(restored.eviction_policy(), EvictionPolicy::Bulk);
    assert!(restored.check_invariants().is_ok());
}

#[test]
fn restored_cache_keeps_evicting_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");

    let mut cache = OrderedCacheIndex::with_capacity(3);
    cache.store("a", 1);
    cache.store("b", 2);
    cache.store("c", 3);
    persist::save_to_disk(&cache, &path).unwrap();

    let mut restored: OrderedCacheIndex<i32> = persist::load_from_disk(&path).unwrap();
    restored.store("d", 4);
    assert_eq!(restored.all_keys(), ["d", "c", "b"]);
}

#[test]
fn file_written_by_hand_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    fs::write(
        &path,
        r#"{"orderedKeys":["new","old","lost"],"values":{"old":1,"new":2}}"#,
    )
    .unwrap();

    let cache: OrderedCacheIndex<i32> = persist::load_from_disk(&path).unwrap();
    assert_eq!(cache.all_keys(), ["new", "old"]);
    assert_eq!(cache.capacity(), DEFAULT_CAPACITY);
}

#[test]
fn missing_and_corrupt_files_are_distinguished() {
    let dir = tempfile::tempdir().unwrap();

    let missing = persist::load_from_disk::<i32>(dir.path().join("nope.json")).unwrap_err();
    assert!(missing.is_not_found());

    let corrupt_path = dir.path().join("corrupt.json");
    fs::write(&corrupt_path, "{\"orderedKeys\": [").unwrap();
    let corrupt = persist::load_from_disk::<i32>(&corrupt_path).unwrap_err();
    assert!(corrupt.is_encoding());
    assert!(!corrupt.is_not_found());
}

#[test]
fn best_effort_pair_never_errors() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("cache.json");
    let bad = dir.path().join("missing-dir").join("cache.json");

    assert!(persist::save_best_effort(&sample(), &good));
    assert!(!persist::save_best_effort(&sample(), &bad));

    assert!(persist::load_or_none::<String>(&good).is_some());
    assert!(persist::load_or_none::<String>(&bad).is_none());
}

/// Value the JSON encoder rejects partway through a save.
struct Unencodable;

impl serde::Serialize for Unencodable {
    fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("value cannot be encoded"))
    }
}

#[test]
fn failed_save_keeps_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    persist::save_to_disk(&sample(), &path).unwrap();
    let before = fs::read(&path).unwrap();

    let mut other = OrderedCacheIndex::with_capacity(2);
    other.store("z", Unencodable);
    let err = persist::save_to_disk(&other, &path).unwrap_err();
    assert!(err.is_encoding());

    assert_eq!(fs::read(&path).unwrap(), before);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn pretty_codec_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pretty.json");
    let codec = PersistenceCodec::with_format(Json::pretty());

    codec.save(&sample(), &path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"orderedKeys\""));
    assert!(text.lines().count() > 1);

    let restored: OrderedCacheIndex<String> = codec.load(&path).unwrap();
    assert_eq!(restored.all_keys(), ["a", "c", "b"]);
}
