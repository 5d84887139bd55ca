//! # Persistence
//!
//! Saves an [`OrderedCacheIndex`] to disk and rebuilds it, keeping recency
//! order.
//!
//! ## Data Shape
//!
//! A hash map alone loses order, so the cache is captured as two parts: the
//! keys from head to tail, and an unordered key → value map. Configuration
//! rides along as an optional third part.
//!
//! ```text
//!   {
//!     "orderedKeys": ["c", "b", "a"],          head → tail
//!     "values":      {"a": 1, "b": 2, "c": 3}, unordered
//!     "settings":    {"capacity": 3, "autoEvict": true, "eviction": "single"}
//!   }
//! ```
//!
//! Rebuilding walks `orderedKeys` and appends each key at the tail, so the
//! first key ends up at head again. Keys missing from `values` are skipped,
//! and a key listed twice keeps its first position. Files without `settings`
//! load with the default configuration.
//!
//! ## Writing
//!
//! ```text
//!   encode ──► .<name>.XXXXXX.tmp ──► sync_all ──► rename over <name>
//! ```
//!
//! Each save gets its own uniquely named temporary file next to the target
//! (via `tempfile`), so concurrent writers never rename each other's partial
//! output. A crash or error before the rename leaves the previous file
//! intact.
//!
//! ## API Levels
//!
//! | Function               | Failure handling                           |
//! |------------------------|--------------------------------------------|
//! | `save_to_disk`         | `Result<(), PersistError>`                 |
//! | `load_from_disk`       | `Result<OrderedCacheIndex<V>, PersistError>` |
//! | `save_best_effort`     | logs with `tracing`, returns `bool`        |
//! | `load_or_none`         | logs with `tracing`, returns `Option`      |
//!
//! ## Example
//!
//! ```
//! use recency_cache::persist::PersistenceCodec;
//! use recency_cache::OrderedCacheIndex;
//!
//! let mut cache = OrderedCacheIndex::with_capacity(3);
//! cache.store("a", 1);
//! cache.store("b", 2);
//!
//! let serialized = PersistenceCodec::serialize(&cache);
//! assert_eq!(serialized.ordered_keys, ["b", "a"]);
//!
//! let restored = PersistenceCodec::deserialize(serialized);
//! assert_eq!(restored.all_keys(), ["b", "a"]);
//! ```

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::builder::CacheSettings;
use crate::error::PersistError;
use crate::policy::ordered::OrderedCacheIndex;
use crate::traits::DiskCache;

/// Order-preserving representation of a cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedCache<V> {
    /// Keys from most to least recent.
    pub ordered_keys: Vec<String>,
    pub values: HashMap<String, V>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<CacheSettings>,
}

/// Borrowing twin of [`SerializedCache`] used when writing, so saving does
/// not clone every value.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SerializedCacheRef<'a, V> {
    ordered_keys: Vec<&'a str>,
    values: HashMap<&'a str, &'a V>,
    settings: Option<CacheSettings>,
}

impl<'a, V> SerializedCacheRef<'a, V> {
    fn capture(cache: &'a OrderedCacheIndex<V>) -> Self {
        Self {
            ordered_keys: cache.keys().collect(),
            values: cache.iter().collect(),
            settings: Some(cache.settings()),
        }
    }
}

/// Byte encoding used for cache files.
pub trait WireFormat {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, PersistError>;
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, PersistError>;
}

/// JSON through `serde_json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Json {
    pub pretty: bool,
}

impl Json {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl WireFormat for Json {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, PersistError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(bytes)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, PersistError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Converts caches to and from [`SerializedCache`] and moves them to and
/// from disk in format `F`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersistenceCodec<F = Json> {
    format: F,
}

impl PersistenceCodec {
    /// Codec writing compact JSON.
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures head-to-tail key order, every value and the configuration.
    pub fn serialize<V: Clone>(cache: &OrderedCacheIndex<V>) -> SerializedCache<V> {
        SerializedCache {
            ordered_keys: cache.all_keys(),
            values: cache.snapshot(),
            settings: Some(cache.settings()),
        }
    }

    /// Rebuilds a cache from its serialized form.
    ///
    /// Never fails: unusable settings fall back to defaults, keys without a
    /// value are skipped, and an auto-evicting result is trimmed to capacity
    /// from the tail.
    pub fn deserialize<V>(serialized: SerializedCache<V>) -> OrderedCacheIndex<V> {
        rebuild(serialized)
    }
}

impl<F: WireFormat> PersistenceCodec<F> {
    pub fn with_format(format: F) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &F {
        &self.format
    }

    pub fn encode<V: Serialize>(
        &self,
        cache: &OrderedCacheIndex<V>,
    ) -> Result<Vec<u8>, PersistError> {
        self.format.encode(&SerializedCacheRef::capture(cache))
    }

    pub fn decode<V: DeserializeOwned>(
        &self,
        bytes: &[u8],
    ) -> Result<OrderedCacheIndex<V>, PersistError> {
        let serialized: SerializedCache<V> = self.format.decode(bytes)?;
        Ok(rebuild(serialized))
    }

    /// Writes `cache` to `path` atomically.
    pub fn save<V: Serialize>(
        &self,
        cache: &OrderedCacheIndex<V>,
        path: impl AsRef<Path>,
    ) -> Result<(), PersistError> {
        let path = path.as_ref();
        let bytes = self.encode(cache)?;
        write_atomic(path, &bytes)?;
        debug!(
            path = %path.display(),
            entries = cache.len(),
            bytes = bytes.len(),
            "saved cache to disk"
        );
        Ok(())
    }

    /// Reads a cache previously written by [`save`](Self::save).
    pub fn load<V: DeserializeOwned>(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<OrderedCacheIndex<V>, PersistError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|err| PersistError::io(path, err))?;
        let cache = self.decode(&bytes)?;
        debug!(
            path = %path.display(),
            entries = cache.len(),
            "loaded cache from disk"
        );
        Ok(cache)
    }

    /// Like [`save`](Self::save) but logs failures instead of returning them.
    /// Returns `true` when the file was written.
    pub fn save_best_effort<V: Serialize>(
        &self,
        cache: &OrderedCacheIndex<V>,
        path: impl AsRef<Path>,
    ) -> bool {
        let path = path.as_ref();
        match self.save(cache, path) {
            Ok(()) => true,
            Err(err) => {
                error!(path = %path.display(), error = %err, "cache save failed");
                false
            },
        }
    }

    /// Like [`load`](Self::load) but returns `None` on any failure. A missing
    /// file is logged at debug level, anything else as a warning.
    pub fn load_or_none<V: DeserializeOwned>(
        &self,
        path: impl AsRef<Path>,
    ) -> Option<OrderedCacheIndex<V>> {
        let path = path.as_ref();
        match self.load(path) {
            Ok(cache) => Some(cache),
            Err(err) if err.is_not_found() => {
                debug!(path = %path.display(), "no cache file to load");
                None
            },
            Err(err) => {
                warn!(path = %path.display(), error = %err, "discarding unreadable cache file");
                None
            },
        }
    }
}

fn rebuild<V>(serialized: SerializedCache<V>) -> OrderedCacheIndex<V> {
    let SerializedCache {
        ordered_keys,
        mut values,
        settings,
    } = serialized;

    let settings = settings.unwrap_or_default();
    let mut cache = match OrderedCacheIndex::from_settings(settings) {
        Ok(cache) => cache,
        Err(err) => {
            warn!(error = %err, "ignoring persisted cache settings");
            OrderedCacheIndex::new()
        },
    };

    let mut skipped = 0usize;
    for key in ordered_keys {
        // Taking the value out makes a repeated key miss, so it keeps its
        // first position.
        match values.remove(key.as_str()) {
            Some(value) => {
                cache.push_lru(key, value);
            },
            None => skipped += 1,
        }
    }

    if skipped > 0 || !values.is_empty() {
        debug!(
            skipped,
            unordered = values.len(),
            "dropped entries with no value or no position"
        );
    }

    if cache.auto_evict() {
        cache.evict_to_capacity();
    }
    cache
}

/// Directory that receives the temporary file: the target's own directory,
/// so the final rename never crosses file systems.
fn temp_dir_for(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn temp_prefix(path: &Path) -> OsString {
    let mut prefix = OsString::from(".");
    prefix.push(path.file_name().unwrap_or_else(|| OsStr::new("cache")));
    prefix.push(".");
    prefix
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PersistError> {
    let dir = temp_dir_for(path);
    let mut tmp = tempfile::Builder::new()
        .prefix(&temp_prefix(path))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|err| PersistError::io(dir, err))?;

    // Dropping `tmp` on any early return deletes the partial file.
    let written = tmp.write_all(bytes).and_then(|()| tmp.as_file().sync_all());
    if let Err(err) = written {
        return Err(PersistError::io(tmp.path(), err));
    }

    tmp.persist(path)
        .map_err(|err| PersistError::io(path, err.error))?;
    Ok(())
}

/// Saves `cache` as JSON.
pub fn save_to_disk<V: Serialize>(
    cache: &OrderedCacheIndex<V>,
    path: impl AsRef<Path>,
) -> Result<(), PersistError> {
    PersistenceCodec::new().save(cache, path)
}

/// Loads a JSON cache file.
pub fn load_from_disk<V: DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<OrderedCacheIndex<V>, PersistError> {
    PersistenceCodec::new().load(path)
}

pub fn save_best_effort<V: Serialize>(
    cache: &OrderedCacheIndex<V>,
    path: impl AsRef<Path>,
) -> bool {
    PersistenceCodec::new().save_best_effort(cache, path)
}

pub fn load_or_none<V: DeserializeOwned>(path: impl AsRef<Path>) -> Option<OrderedCacheIndex<V>> {
    PersistenceCodec::new().load_or_none(path)
}

impl<V: Serialize + DeserializeOwned> DiskCache for OrderedCacheIndex<V> {
    fn save_to_disk(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        save_to_disk(self, path)
    }

    fn load_from_disk(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        load_from_disk(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ordered::EvictionPolicy;

    fn abc() -> OrderedCacheIndex<i32> {
        let mut cache = OrderedCacheIndex::with_capacity(3);
        cache.store("a", 1);
        cache.store("b", 2);
        cache.store("c", 3);
        cache
    }

    fn serialized(keys: &[&str], values: &[(&str, i32)]) -> SerializedCache<i32> {
        SerializedCache {
            ordered_keys: keys.iter().map(|k| k.to_string()).collect(),
            values: values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            settings: None,
        }
    }

    mod codec {
        use super::*;

        #[test]
        fn serialize_captures_order_values_and_settings() {
            let form = PersistenceCodec::serialize(&abc());
            assert_eq!(form.ordered_keys, ["c", "b", "a"]);
            assert_eq!(form.values.len(), 3);
            assert_eq!(form.values["b"], 2);
            assert_eq!(form.settings.map(|s| s.capacity), Some(3));
        }

        #[test]
        fn round_trip_preserves_order_and_values() {
            let mut cache = abc();
            cache.get("a");
            let restored = PersistenceCodec::deserialize(PersistenceCodec::serialize(&cache));
            assert_eq!(restored.all_keys(), cache.all_keys());
            assert_eq!(restored.all_values(), cache.all_values());
            assert_eq!(restored.settings(), cache.settings());
            assert!(restored.check_invariants().is_ok());
        }

        #[test]
        fn keys_without_values_are_skipped() {
            let form = serialized(&["x", "ghost", "y"], &[("x", 1), ("y", 2)]);
            let cache = PersistenceCodec::deserialize(form);
            assert_eq!(cache.all_keys(), ["x", "y"]);
        }

        #[test]
        fn duplicate_keys_keep_first_position() {
            let form = serialized(&["a", "b", "a"], &[("a", 1), ("b", 2)]);
            let cache = PersistenceCodec::deserialize(form);
            assert_eq!(cache.all_keys(), ["a", "b"]);
            assert!(cache.check_invariants().is_ok());
        }

        #[test]
        fn values_without_position_are_dropped() {
            let form = serialized(&["a"], &[("a", 1), ("orphan", 9)]);
            let cache = PersistenceCodec::deserialize(form);
            assert_eq!(cache.all_keys(), ["a"]);
            assert!(!cache.contains("orphan"));
        }

        #[test]
        fn missing_settings_use_defaults() {
            let cache = PersistenceCodec::deserialize(serialized(&["a"], &[("a", 1)]));
            assert_eq!(cache.settings(), CacheSettings::default());
        }

        #[test]
        fn zero_capacity_settings_fall_back_to_defaults() {
            let mut form = serialized(&["a"], &[("a", 1)]);
            form.settings = Some(CacheSettings {
                capacity: 0,
                auto_evict: true,
                eviction: EvictionPolicy::Single,
            });
            let cache = PersistenceCodec::deserialize(form);
            assert_eq!(cache.capacity(), CacheSettings::default().capacity);
            assert_eq!(cache.len(), 1);
        }

        #[test]
        fn oversized_payload_is_trimmed_from_tail() {
            let mut form = serialized(
                &["a", "b", "c", "d"],
                &[("a", 1), ("b", 2), ("c", 3), ("d", 4)],
            );
            form.settings = Some(CacheSettings {
                capacity: 2,
                auto_evict: true,
                eviction: EvictionPolicy::Bulk,
            });
            let cache = PersistenceCodec::deserialize(form);
            assert_eq!(cache.all_keys(), ["a", "b"]);
        }

        #[test]
        fn oversized_payload_kept_without_auto_evict() {
            let mut form = serialized(&["a", "b", "c"], &[("a", 1), ("b", 2), ("c", 3)]);
            form.settings = Some(CacheSettings {
                capacity: 1,
                auto_evict: false,
                eviction: EvictionPolicy::Single,
            });
            let cache = PersistenceCodec::deserialize(form);
            assert_eq!(cache.len(), 3);
        }

        #[test]
        fn empty_cache_round_trips() {
            let cache: OrderedCacheIndex<i32> = OrderedCacheIndex::new();
            let restored = PersistenceCodec::deserialize(PersistenceCodec::serialize(&cache));
            assert!(restored.is_empty());
            assert_eq!(restored.first_key(), None);
        }
    }

    mod wire {
        use super::*;

        #[test]
        fn json_uses_camel_case_field_names() {
            let bytes = PersistenceCodec::new().encode(&abc()).unwrap();
            let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(value["orderedKeys"], serde_json::json!(["c", "b", "a"]));
            assert_eq!(value["values"]["a"], 1);
            assert_eq!(value["settings"]["autoEvict"], true);
        }

        #[test]
        fn decode_accepts_payload_without_settings() {
            let json = br#"{"orderedKeys":["b","a"],"values":{"a":1,"b":2}}"#;
            let cache: OrderedCacheIndex<i32> = PersistenceCodec::new().decode(json).unwrap();
            assert_eq!(cache.all_keys(), ["b", "a"]);
        }

        #[test]
        fn decode_rejects_garbage_as_encoding_error() {
            let err = PersistenceCodec::new()
                .decode::<i32>(b"{not json")
                .unwrap_err();
            assert!(err.is_encoding());
        }

        #[test]
        fn pretty_json_decodes_the_same() {
            let codec = PersistenceCodec::with_format(Json::pretty());
            let bytes = codec.encode(&abc()).unwrap();
            assert!(bytes.contains(&b'\n'));
            let cache: OrderedCacheIndex<i32> = codec.decode(&bytes).unwrap();
            assert_eq!(cache.all_keys(), ["c", "b", "a"]);
        }

        /// Format that refuses to encode, standing in for a full disk or a
        /// value the target format cannot represent.
        struct Refusing;

        impl WireFormat for Refusing {
            fn encode<T: Serialize + ?Sized>(&self, _value: &T) -> Result<Vec<u8>, PersistError> {
                Err(PersistError::encoding("format refuses to encode"))
            }

            fn decode<T: DeserializeOwned>(&self, _bytes: &[u8]) -> Result<T, PersistError> {
                Err(PersistError::encoding(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "format refuses to decode",
                )))
            }
        }

        #[test]
        fn custom_format_errors_surface_as_encoding() {
            let codec = PersistenceCodec::with_format(Refusing);
            let err = codec.encode(&abc()).unwrap_err();
            assert!(err.is_encoding());
            assert!(err.to_string().contains("refuses to encode"));

            let err = codec.decode::<i32>(b"{}").unwrap_err();
            assert!(err.is_encoding());
            assert!(std::error::Error::source(&err).is_some());
        }

        #[test]
        fn failed_encode_keeps_previous_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("cache.json");
            save_to_disk(&abc(), &path).unwrap();
            let before = fs::read(&path).unwrap();

            let err = PersistenceCodec::with_format(Refusing)
                .save(&abc(), &path)
                .unwrap_err();
            assert!(err.is_encoding());
            assert_eq!(fs::read(&path).unwrap(), before);
            assert!(!PersistenceCodec::with_format(Refusing).save_best_effort(&abc(), &path));
        }
    }

    mod disk {
        use super::*;

        fn dir_entries(dir: &Path) -> Vec<String> {
            let mut names: Vec<String> = fs::read_dir(dir)
                .unwrap()
                .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        }

        #[test]
        fn temp_file_lives_beside_target() {
            assert_eq!(
                temp_dir_for(Path::new("/data/cache.json")),
                Path::new("/data")
            );
            assert_eq!(temp_dir_for(Path::new("cache.json")), Path::new("."));
            assert_eq!(temp_prefix(Path::new("/data/cache.json")), ".cache.json.");
        }

        #[test]
        fn save_leaves_no_temp_files_behind() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("cache.json");
            save_to_disk(&abc(), &path).unwrap();
            save_to_disk(&abc(), &path).unwrap();
            assert_eq!(dir_entries(dir.path()), ["cache.json"]);
        }

        #[test]
        fn concurrent_saves_to_one_path_never_mix() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("shared.json");

            std::thread::scope(|scope| {
                for t in 0..8i32 {
                    let path = &path;
                    scope.spawn(move || {
                        let mut cache = OrderedCacheIndex::with_capacity(64);
                        for i in 0..50 {
                            cache.store(format!("t{t}-{i}"), t);
                        }
                        for _ in 0..5 {
                            save_to_disk(&cache, path).unwrap();
                        }
                    });
                }
            });

            let restored: OrderedCacheIndex<i32> = load_from_disk(&path).unwrap();
            assert_eq!(restored.len(), 50);
            let owner = *restored.first_value().unwrap();
            assert!(restored.values().all(|&v| v == owner));
            assert_eq!(dir_entries(dir.path()), ["shared.json"]);
        }

        #[test]
        fn save_then_load_round_trips() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("cache.json");

            save_to_disk(&abc(), &path).unwrap();
            let restored: OrderedCacheIndex<i32> = load_from_disk(&path).unwrap();
            assert_eq!(restored.all_keys(), ["c", "b", "a"]);
        }

        #[test]
        fn save_replaces_previous_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("cache.json");

            save_to_disk(&abc(), &path).unwrap();
            let mut smaller = OrderedCacheIndex::with_capacity(3);
            smaller.store("z", 26);
            save_to_disk(&smaller, &path).unwrap();

            let restored: OrderedCacheIndex<i32> = load_from_disk(&path).unwrap();
            assert_eq!(restored.all_keys(), ["z"]);
        }

        #[test]
        fn load_missing_file_is_not_found() {
            let dir = tempfile::tempdir().unwrap();
            let err = load_from_disk::<i32>(dir.path().join("absent.json")).unwrap_err();
            assert!(err.is_not_found());
            assert!(load_or_none::<i32>(dir.path().join("absent.json")).is_none());
        }

        #[test]
        fn save_into_missing_directory_fails_cleanly() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("no").join("such").join("cache.json");
            let err = save_to_disk(&abc(), &path).unwrap_err();
            assert!(err.is_io());
            assert!(!save_best_effort(&abc(), &path));
        }

        #[test]
        fn corrupt_file_loads_as_none() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("cache.json");
            fs::write(&path, b"\x00\x01garbage").unwrap();
            assert!(load_from_disk::<i32>(&path).unwrap_err().is_encoding());
            assert!(load_or_none::<i32>(&path).is_none());
        }

        #[test]
        fn disk_cache_trait_round_trips() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("trait.json");
            let mut cache: OrderedCacheIndex<String> = OrderedCacheIndex::new();
            cache.store("greeting", "hello".to_string());
            DiskCache::save_to_disk(&cache, &path).unwrap();

            let restored =
                <OrderedCacheIndex<String> as DiskCache>::load_from_disk(&path).unwrap();
            assert_eq!(restored.first_key(), Some("greeting"));
            assert_eq!(restored.peek("greeting").map(String::as_str), Some("hello"));
        }
    }
}
