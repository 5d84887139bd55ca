//! # Ordered Cache Index
//!
//! String-keyed LRU cache built from a hash index and an arena-backed recency
//! list.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                      OrderedCacheIndex<V>                            │
//!   │                                                                      │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  FxHashMap<String, SlotId>                                   │   │
//!   │   │    "c" ───────────────┐                                      │   │
//!   │   │    "b" ─────────────┐ │                                      │   │
//!   │   │    "a" ───────────┐ │ │                                      │   │
//!   │   └───────────────────┼─┼─┼──────────────────────────────────────┘   │
//!   │                       ▼ ▼ ▼                                          │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  RecencyList<Entry<V>>  (nodes live in a SlotArena)          │   │
//!   │   │                                                              │   │
//!   │   │  head ──► [c] ◄──► [b] ◄──► [a] ◄── tail                     │   │
//!   │   │   (MRU)                            (LRU)                     │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   │                                                                      │
//!   │   capacity: 500 (default)   auto_evict: true   eviction: Single      │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each list entry stores its own key so eviction from the tail can clean up
//! the index without a reverse lookup.
//!
//! ## Operations
//!
//! | Method                 | Complexity | Description                              |
//! |------------------------|------------|------------------------------------------|
//! | `store(k, v)`          | O(1)*      | Insert or update, promote, maybe evict   |
//! | `get(&k)`              | O(1)       | Lookup and promote to head               |
//! | `get_with(&k, false)`  | O(1)       | Lookup without promotion                 |
//! | `peek(&k)`             | O(1)       | Lookup through `&self`                   |
//! | `remove(&k)`           | O(1)       | Unlink and drop an entry                 |
//! | `first_*` / `last_*`   | O(1)       | Head / tail key or value                 |
//! | `all_keys` / `values`  | O(n)       | Head-to-tail traversal                   |
//! | `snapshot()`           | O(n)       | Unordered key → value copy               |
//! | `clear()`              | O(n)       | Drop every entry                         |
//! | `recency_rank(&k)`     | O(n)       | Position from head                       |
//!
//! \* bulk eviction is O(capacity / 2) on the store that triggers it.
//!
//! ## Eviction
//!
//! When `auto_evict` is on and a store of a new key pushes the count above
//! `capacity`, entries are removed from the tail:
//!
//! - [`EvictionPolicy::Single`]: exactly enough to get back to `capacity`
//!   (one entry per overflowing store).
//! - [`EvictionPolicy::Bulk`]: `capacity / 2` entries at once (or more if
//!   needed to get back within `capacity`), so the next evictions are far
//!   apart.
//!
//! With `auto_evict` off the capacity is advisory; call
//! [`evict_to_capacity`](OrderedCacheIndex::evict_to_capacity) to trim.
//!
//! ## Example
//!
//! ```
//! use recency_cache::OrderedCacheIndex;
//!
//! let mut cache = OrderedCacheIndex::with_capacity(3);
//! cache.store("a", 1);
//! cache.store("b", 2);
//! cache.store("c", 3);
//! assert_eq!(cache.all_keys(), ["c", "b", "a"]);
//!
//! cache.store("d", 4); // evicts "a"
//! assert_eq!(cache.all_keys(), ["d", "c", "b"]);
//!
//! cache.get("b");
//! assert_eq!(cache.all_keys(), ["b", "d", "c"]);
//! ```
//!
//! ## Thread Safety
//!
//! Not synchronized. The index is `Send` when `V: Send`; wrap it in a lock to
//! share it.

use std::collections::HashMap;
use std::fmt;
use std::mem;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::builder::{CacheBuilder, CacheSettings};
use crate::ds::{RecencyList, SlotId};
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LruMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, LruMetricsReadRecorder, LruMetricsRecorder,
};
use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

/// Capacity used by [`OrderedCacheIndex::new`].
pub const DEFAULT_CAPACITY: usize = 500;

/// How many entries leave the tail once the cache overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EvictionPolicy {
    /// Evict only the overflow: one tail entry per store past capacity.
    #[default]
    Single,
    /// Evict half the capacity at once to amortize eviction work.
    Bulk,
}

impl EvictionPolicy {
    /// Number of tail entries to drop for a cache holding `len` entries.
    ///
    /// Zero while `len <= capacity`. Never less than the overflow, so the
    /// cache is always back within capacity afterwards.
    pub fn eviction_count(self, len: usize, capacity: usize) -> usize {
        let overflow = len.saturating_sub(capacity);
        if overflow == 0 {
            return 0;
        }
        match self {
            EvictionPolicy::Single => overflow,
            EvictionPolicy::Bulk => overflow.max(capacity / 2),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry<V> {
    key: String,
    value: V,
}

/// String-keyed LRU cache with O(1) lookup, promotion and eviction.
///
/// Head is the most recently stored or fetched entry, tail the least recent.
/// See the [module docs](self) for the layout and eviction rules.
#[derive(Clone)]
pub struct OrderedCacheIndex<V> {
    index: FxHashMap<String, SlotId>,
    list: RecencyList<Entry<V>>,
    capacity: usize,
    auto_evict: bool,
    eviction: EvictionPolicy,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl OrderedCacheIndex<()> {
    /// Returns a builder for configuring capacity, auto-eviction and policy.
    ///
    /// The value type is chosen at [`build`](CacheBuilder::build).
    ///
    /// ```
    /// use recency_cache::{EvictionPolicy, OrderedCacheIndex};
    ///
    /// let mut cache = OrderedCacheIndex::builder()
    ///     .capacity(2)
    ///     .eviction_policy(EvictionPolicy::Bulk)
    ///     .build::<u32>();
    /// cache.store("a", 1);
    /// assert_eq!(cache.capacity(), 2);
    ///
    /// let inferred: OrderedCacheIndex<String> = OrderedCacheIndex::builder().build();
    /// assert!(inferred.is_empty());
    /// ```
    pub fn builder() -> CacheBuilder {
        CacheBuilder::new()
    }
}

impl<V> OrderedCacheIndex<V> {
    /// Creates an empty cache with capacity 500, auto-eviction on and
    /// [`EvictionPolicy::Single`].
    pub fn new() -> Self {
        Self::from_parts(CacheSettings::default())
    }

    /// Creates an empty cache with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use
    /// [`try_with_capacity`](Self::try_with_capacity) for untrusted input.
    ///
    /// # Example
    ///
    /// ```
    /// use recency_cache::OrderedCacheIndex;
    ///
    /// let cache: OrderedCacheIndex<String> = OrderedCacheIndex::with_capacity(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible form of [`with_capacity`](Self::with_capacity).
    pub fn try_with_capacity(capacity: usize) -> Result<Self, ConfigError> {
        Self::from_settings(CacheSettings {
            capacity,
            ..CacheSettings::default()
        })
    }

    /// Creates an empty cache from validated settings.
    pub fn from_settings(settings: CacheSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self::from_parts(settings))
    }

    fn from_parts(settings: CacheSettings) -> Self {
        // Pre-size for small caches only; large capacities grow on demand.
        let reserve = settings.capacity.min(1024);
        Self {
            index: FxHashMap::with_capacity_and_hasher(reserve, Default::default()),
            list: RecencyList::with_capacity(reserve),
            capacity: settings.capacity,
            auto_evict: settings.auto_evict,
            eviction: settings.eviction,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Current configuration as a serializable value.
    pub fn settings(&self) -> CacheSettings {
        CacheSettings {
            capacity: self.capacity,
            auto_evict: self.auto_evict,
            eviction: self.eviction,
        }
    }

    /// Applies every field of `settings`, trimming if the result overflows.
    ///
    /// Returns the number of evicted entries.
    pub fn apply_settings(&mut self, settings: CacheSettings) -> Result<usize, ConfigError> {
        settings.validate()?;
        self.capacity = settings.capacity;
        self.auto_evict = settings.auto_evict;
        self.eviction = settings.eviction;
        Ok(if self.auto_evict {
            self.evict_overflow()
        } else {
            0
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the capacity. With auto-eviction on, a smaller capacity trims
    /// the tail immediately using the active policy.
    ///
    /// Returns the number of evicted entries.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<usize, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::zero_capacity());
        }
        self.capacity = capacity;
        Ok(if self.auto_evict {
            self.evict_overflow()
        } else {
            0
        })
    }

    #[inline]
    pub fn auto_evict(&self) -> bool {
        self.auto_evict
    }

    /// Turns capacity enforcement on or off.
    ///
    /// Turning it on trims an overflowing cache right away and returns the
    /// number of evicted entries.
    pub fn set_auto_evict(&mut self, enabled: bool) -> usize {
        self.auto_evict = enabled;
        if enabled {
            self.evict_overflow()
        } else {
            0
        }
    }

    #[inline]
    pub fn eviction_policy(&self) -> EvictionPolicy {
        self.eviction
    }

    /// Selects the policy used by future evictions.
    pub fn set_eviction_policy(&mut self, policy: EvictionPolicy) {
        self.eviction = policy;
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Inserts or updates `key`, returning the previous value.
    ///
    /// An existing key keeps its node: the value is replaced and the node is
    /// promoted to head, and nothing is evicted. A new key is linked at head;
    /// if that pushes the count above capacity and auto-eviction is on, tail
    /// entries are evicted according to the [`EvictionPolicy`].
    ///
    /// # Example
    ///
    /// ```
    /// use recency_cache::OrderedCacheIndex;
    ///
    /// let mut cache = OrderedCacheIndex::with_capacity(2);
    /// assert_eq!(cache.store("a", 1), None);
    /// assert_eq!(cache.store("b", 2), None);
    /// assert_eq!(cache.store("a", 10), Some(1)); // update + promote
    ///
    /// cache.store("c", 3); // "b" is now least recent and goes
    /// assert!(!cache.contains("b"));
    /// assert_eq!(cache.all_keys(), ["c", "a"]);
    /// ```
    pub fn store(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&id) = self.index.get(key.as_str()) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            self.list.move_to_front(id);
            let previous = self
                .list
                .get_mut(id)
                .map(|entry| mem::replace(&mut entry.value, value));

            #[cfg(debug_assertions)]
            self.debug_check_shape();

            return previous;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        let id = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);

        if self.auto_evict {
            self.evict_overflow();
        }

        #[cfg(debug_assertions)]
        self.debug_check_shape();

        None
    }

    /// Removes `key` and returns its value. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let id = self.index.remove(key)?;
        let entry = self.list.remove(id)?;

        #[cfg(feature = "metrics")]
        self.metrics.record_remove_found();

        #[cfg(debug_assertions)]
        self.debug_check_shape();

        Some(entry.value)
    }

    /// Drops every entry. Capacity and policy are kept.
    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.list.clear();
        self.index.clear();
    }

    /// Drops every entry and releases the backing storage.
    pub fn clear_shrink(&mut self) {
        self.clear();
        self.list.clear_shrink();
        self.index.shrink_to_fit();
    }

    /// Trims tail entries until the count is within capacity, whether or not
    /// auto-eviction is on. Removes exactly the overflow, ignoring the bulk
    /// policy.
    ///
    /// Returns the number of evicted entries.
    pub fn evict_to_capacity(&mut self) -> usize {
        self.evict_with(EvictionPolicy::Single)
    }

    fn evict_overflow(&mut self) -> usize {
        self.evict_with(self.eviction)
    }

    fn evict_with(&mut self, policy: EvictionPolicy) -> usize {
        let count = policy.eviction_count(self.list.len(), self.capacity);
        if count == 0 {
            return 0;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        let mut evicted = 0;
        for _ in 0..count {
            let Some(entry) = self.list.pop_back() else {
                break;
            };
            self.index.remove(entry.key.as_str());
            evicted += 1;

            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
        }

        match policy {
            EvictionPolicy::Single => trace!(
                evicted,
                remaining = self.list.len(),
                capacity = self.capacity,
                "evicted least recently used entry"
            ),
            EvictionPolicy::Bulk => debug!(
                evicted,
                remaining = self.list.len(),
                capacity = self.capacity,
                "bulk eviction pruned cache tail"
            ),
        }

        evicted
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(String, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_call();

        let entry = self.list.pop_back()?;
        self.index.remove(entry.key.as_str());

        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_found();

        Some((entry.key, entry.value))
    }

    /// Promotes `key` to head without reading it. Returns `false` if absent.
    pub fn touch(&mut self, key: &str) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_touch_call();

        match self.index.get(key) {
            Some(&id) => {
                self.list.move_to_front(id);

                #[cfg(feature = "metrics")]
                self.metrics.record_touch_found();

                true
            },
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Returns the value for `key` and promotes it to head.
    #[inline]
    pub fn get(&mut self, key: &str) -> Option<&V> {
        self.get_with(key, true)
    }

    /// Returns the value for `key`, promoting it to head only when `promote`
    /// is `true`.
    pub fn get_with(&mut self, key: &str, promote: bool) -> Option<&V> {
        let Some(&id) = self.index.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        if promote {
            self.list.move_to_front(id);
        }
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Returns a mutable reference to the value for `key`, promoting it.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let &id = self.index.get(key)?;
        self.list.move_to_front(id);
        self.list.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Returns the value for `key` without touching recency order.
    pub fn peek(&self, key: &str) -> Option<&V> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_call();

        let &id = self.index.get(key)?;

        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_found();

        self.list.get(id).map(|entry| &entry.value)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Value at head (most recent).
    pub fn first_value(&self) -> Option<&V> {
        self.list.front().map(|entry| &entry.value)
    }

    /// Value at tail (least recent).
    pub fn last_value(&self) -> Option<&V> {
        self.list.back().map(|entry| &entry.value)
    }

    /// Key at head (most recent).
    pub fn first_key(&self) -> Option<&str> {
        self.list.front().map(|entry| entry.key.as_str())
    }

    /// Key at tail (least recent).
    pub fn last_key(&self) -> Option<&str> {
        self.list.back().map(|entry| entry.key.as_str())
    }

    /// Least recently used entry, without changing order.
    pub fn peek_lru(&self) -> Option<(&str, &V)> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_lru_call();

        let entry = self.list.back()?;

        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_lru_found();

        Some((entry.key.as_str(), &entry.value))
    }

    /// Position of `key` counted from head (0 = most recent).
    pub fn recency_rank(&self, key: &str) -> Option<usize> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_recency_rank_call();

        let &target = self.index.get(key)?;
        for (rank, id) in self.list.iter_ids().enumerate() {
            #[cfg(feature = "metrics")]
            (&self.metrics).record_recency_rank_scan_step();

            if id == target {
                #[cfg(feature = "metrics")]
                (&self.metrics).record_recency_rank_found();
                return Some(rank);
            }
        }
        None
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Same as [`len`](Self::len).
    #[inline]
    pub fn count(&self) -> usize {
        self.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Rough heap footprint: list nodes, index buckets and key bytes.
    pub fn approx_bytes(&self) -> usize {
        let index_slot = mem::size_of::<(String, SlotId)>() + 1;
        let key_bytes: usize = self.list.iter().map(|entry| 2 * entry.key.capacity()).sum();
        mem::size_of::<Self>()
            + self.list.approx_bytes()
            + self.index.capacity() * index_slot
            + key_bytes
    }

    // -----------------------------------------------------------------------
    // Traversal
    // -----------------------------------------------------------------------

    /// Iterates `(key, value)` from head to tail.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &V)> + '_ {
        self.list
            .iter()
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    /// Iterates keys from head to tail.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.list.iter().map(|entry| entry.key.as_str())
    }

    /// Iterates values from head to tail.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + '_ {
        self.list.iter().map(|entry| &entry.value)
    }

    /// Keys from most to least recent, copied out of the cache.
    pub fn all_keys(&self) -> Vec<String> {
        self.keys().map(str::to_owned).collect()
    }

    /// Values from most to least recent, copied out of the cache.
    pub fn all_values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.values().cloned().collect()
    }

    /// Unordered key → value copy of the cache contents.
    ///
    /// Loses recency order; pair it with [`all_keys`](Self::all_keys) to
    /// rebuild an equivalent cache.
    pub fn snapshot(&self) -> HashMap<String, V>
    where
        V: Clone,
    {
        self.list
            .iter()
            .map(|entry| (entry.key.clone(), entry.value.clone()))
            .collect()
    }

    /// Appends `key` at the tail, behind every existing entry.
    ///
    /// Used when rebuilding a cache from its head-to-tail key order. Returns
    /// `false` and leaves the cache untouched if `key` is already present.
    /// Never evicts.
    pub(crate) fn push_lru(&mut self, key: String, value: V) -> bool {
        if self.index.contains_key(key.as_str()) {
            return false;
        }
        let id = self.list.push_back(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
        true
    }

    // -----------------------------------------------------------------------
    // Invariants
    // -----------------------------------------------------------------------

    /// Checks that the index and the recency list describe the same entries,
    /// that the list is a single well-formed chain, and that an
    /// auto-evicting cache is within capacity.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.validate().map_err(InvariantError::new)?;

        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but list holds {} nodes",
                self.index.len(),
                self.list.len()
            )));
        }

        for (key, &id) in &self.index {
            let entry = self.list.get(id).ok_or_else(|| {
                InvariantError::new(format!("key {:?} points at freed slot {:?}", key, id))
            })?;
            if entry.key != *key {
                return Err(InvariantError::new(format!(
                    "key {:?} points at node holding {:?}",
                    key, entry.key
                )));
            }
        }

        if self.auto_evict && self.list.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "auto-evicting cache holds {} entries, capacity {}",
                self.list.len(),
                self.capacity
            )));
        }

        Ok(())
    }

    /// O(1) shape checks run after every mutation in debug builds.
    #[cfg(debug_assertions)]
    fn debug_check_shape(&self) {
        debug_assert_eq!(self.index.len(), self.list.len());
        debug_assert_eq!(self.list.front_id().is_none(), self.list.is_empty());
        debug_assert_eq!(self.list.back_id().is_none(), self.list.is_empty());
        debug_assert!(!self.auto_evict || self.list.len() <= self.capacity);
    }
}

#[cfg(feature = "metrics")]
impl<V> OrderedCacheIndex<V> {
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        self.metrics.to_snapshot(self.len(), self.capacity)
    }

    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }
}

impl<V> CoreCache<String, V> for OrderedCacheIndex<V> {
    #[inline]
    fn insert(&mut self, key: String, value: V) -> Option<V> {
        OrderedCacheIndex::store(self, key, value)
    }

    #[inline]
    fn get(&mut self, key: &String) -> Option<&V> {
        OrderedCacheIndex::get(self, key.as_str())
    }

    #[inline]
    fn contains(&self, key: &String) -> bool {
        OrderedCacheIndex::contains(self, key.as_str())
    }

    #[inline]
    fn len(&self) -> usize {
        OrderedCacheIndex::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        OrderedCacheIndex::capacity(self)
    }

    fn clear(&mut self) {
        OrderedCacheIndex::clear(self)
    }
}

impl<V> MutableCache<String, V> for OrderedCacheIndex<V> {
    #[inline]
    fn remove(&mut self, key: &String) -> Option<V> {
        OrderedCacheIndex::remove(self, key.as_str())
    }
}

impl<V> LruCacheTrait<String, V> for OrderedCacheIndex<V> {
    fn pop_lru(&mut self) -> Option<(String, V)> {
        OrderedCacheIndex::pop_lru(self)
    }

    fn peek_lru(&self) -> Option<(&String, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    fn touch(&mut self, key: &String) -> bool {
        OrderedCacheIndex::touch(self, key.as_str())
    }

    fn recency_rank(&self, key: &String) -> Option<usize> {
        OrderedCacheIndex::recency_rank(self, key.as_str())
    }
}

impl<V> Default for OrderedCacheIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for OrderedCacheIndex<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedCacheIndex")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("auto_evict", &self.auto_evict)
            .field("eviction", &self.eviction)
            .field("head", &self.first_key())
            .field("tail", &self.last_key())
            .finish_non_exhaustive()
    }
}

/// Owning iterator over `(key, value)` from head to tail.
pub struct IntoIter<V> {
    list: RecencyList<Entry<V>>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front().map(|entry| (entry.key, entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> IntoIterator for OrderedCacheIndex<V> {
    type Item = (String, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self.list }
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for OrderedCacheIndex<V> {
    /// Stores each pair in order, so the last pair ends up at head.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.store(key, value);
        }
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedCacheIndex<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut cache = Self::new();
        cache.extend(iter);
        cache
    }
}
