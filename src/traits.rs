//! # Cache Trait Hierarchy
//!
//! Small set of traits describing what the recency cache offers, so code that
//! only needs "a cache" or "something that can be saved" does not have to
//! name [`OrderedCacheIndex`](crate::policy::ordered::OrderedCacheIndex).
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │            CoreCache<K, V>              │
//!   │  insert / get / contains / len /        │
//!   │  is_empty / capacity / clear            │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │           MutableCache<K, V>            │
//!   │  remove / remove_batch                  │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │          LruCacheTrait<K, V>            │
//!   │  pop_lru / peek_lru / touch /           │
//!   │  recency_rank                           │
//!   └─────────────────────────────────────────┘
//!
//!   ┌─────────────────────────────────────────┐
//!   │              DiskCache                  │
//!   │  save_to_disk / load_from_disk          │
//!   └─────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//!
//! None of these traits imply synchronization. Implementations are
//! single-threaded; share them behind a lock.

use std::path::Path;

use crate::error::PersistError;

/// Operations every cache supports.
///
/// # Example
///
/// ```
/// use recency_cache::traits::CoreCache;
/// use recency_cache::OrderedCacheIndex;
///
/// fn warm<C: CoreCache<String, u32>>(cache: &mut C) {
///     cache.insert("a".to_string(), 1);
///     cache.insert("b".to_string(), 2);
/// }
///
/// let mut cache = OrderedCacheIndex::with_capacity(8);
/// warm(&mut cache);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts or updates `key`, returning the previous value if it existed.
    ///
    /// May evict entries to stay within capacity.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Returns the value for `key` and records the access.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Returns `true` if `key` is cached. Does not record an access.
    fn contains(&self, key: &K) -> bool;

    /// Number of cached entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries kept when eviction is active.
    fn capacity(&self) -> usize;

    /// Removes every entry.
    fn clear(&mut self);
}

/// Caches that allow removing arbitrary keys.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes `key`, returning its value if it was present.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes each key in order; absent keys yield `None`.
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|key| self.remove(key)).collect()
    }
}

/// Recency-ordered caches.
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least recently used entry.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Returns the least recently used entry without changing order.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Marks `key` as most recently used. Returns `false` if absent.
    fn touch(&mut self, key: &K) -> bool;

    /// Position of `key` in recency order, 0 being most recent.
    fn recency_rank(&self, key: &K) -> Option<usize>;
}

/// Caches that can be written to and restored from a file.
///
/// # Example
///
/// ```no_run
/// use recency_cache::traits::DiskCache;
/// use recency_cache::OrderedCacheIndex;
///
/// let mut cache: OrderedCacheIndex<String> = OrderedCacheIndex::new();
/// cache.store("greeting", "hello".to_string());
/// cache.save_to_disk("cache.json")?;
///
/// let restored = OrderedCacheIndex::<String>::load_from_disk("cache.json")?;
/// assert_eq!(restored.first_key(), Some("greeting"));
/// # Ok::<(), recency_cache::error::PersistError>(())
/// ```
pub trait DiskCache: Sized {
    /// Writes the whole cache to `path`, replacing any previous file atomically.
    fn save_to_disk(&self, path: impl AsRef<Path>) -> Result<(), PersistError>;

    /// Rebuilds a cache from a file written by [`save_to_disk`](Self::save_to_disk).
    fn load_from_disk(path: impl AsRef<Path>) -> Result<Self, PersistError>;
}
