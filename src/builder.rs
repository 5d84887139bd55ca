//! Cache configuration.
//!
//! [`CacheBuilder`] collects capacity, auto-eviction and eviction policy and
//! produces an [`OrderedCacheIndex`]. [`CacheSettings`] is the plain,
//! serializable form of the same configuration; it is what gets persisted
//! next to the cache contents.
//!
//! ## Example
//!
//! ```rust
//! use recency_cache::builder::CacheBuilder;
//! use recency_cache::EvictionPolicy;
//!
//! let mut cache = CacheBuilder::new()
//!     .capacity(100)
//!     .eviction_policy(EvictionPolicy::Bulk)
//!     .build::<String>();
//! cache.store("k", "hello".to_string());
//! assert_eq!(cache.get("k"), Some(&"hello".to_string()));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::policy::ordered::{DEFAULT_CAPACITY, EvictionPolicy, OrderedCacheIndex};

/// Serializable cache configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheSettings {
    /// Maximum entry count when `auto_evict` is on. Must be non-zero.
    pub capacity: usize,
    /// Enforce `capacity` on every store.
    pub auto_evict: bool,
    pub eviction: EvictionPolicy,
}

impl CacheSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::zero_capacity());
        }
        Ok(())
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            auto_evict: true,
            eviction: EvictionPolicy::Single,
        }
    }
}

/// Builder for [`OrderedCacheIndex`].
#[derive(Debug, Clone, Default)]
pub struct CacheBuilder {
    settings: CacheSettings,
}

impl CacheBuilder {
    /// Starts from the defaults: capacity 500, auto-eviction on, single-entry
    /// eviction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from existing settings, e.g. ones read back from disk.
    pub fn from_settings(settings: CacheSettings) -> Self {
        Self { settings }
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.settings.capacity = capacity;
        self
    }

    pub fn auto_evict(mut self, enabled: bool) -> Self {
        self.settings.auto_evict = enabled;
        self
    }

    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.settings.eviction = policy;
        self
    }

    pub fn settings(&self) -> CacheSettings {
        self.settings
    }

    /// Builds the cache.
    ///
    /// # Panics
    ///
    /// Panics if the capacity is zero.
    pub fn build<V>(self) -> OrderedCacheIndex<V> {
        match self.try_build() {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Builds the cache, rejecting invalid settings.
    pub fn try_build<V>(self) -> Result<OrderedCacheIndex<V>, ConfigError> {
        OrderedCacheIndex::from_settings(self.settings)
    }
}
