//! recency-cache: a string-keyed LRU cache that keeps its recency order across
//! restarts.
//!
//! The engine is [`OrderedCacheIndex`]: a hash index over an arena-backed
//! doubly linked list, giving O(1) store, lookup, promotion and tail
//! eviction. [`persist`] saves it as ordered keys plus a value map and
//! rebuilds it in the same order.
//!
//! ```
//! use recency_cache::OrderedCacheIndex;
//!
//! let mut cache = OrderedCacheIndex::with_capacity(2);
//! cache.store("a", 1);
//! cache.store("b", 2);
//! cache.get("a");
//! cache.store("c", 3);
//!
//! assert_eq!(cache.all_keys(), ["c", "a"]);
//! ```

pub mod builder;
pub mod ds;
pub mod error;
pub mod persist;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;

pub use builder::{CacheBuilder, CacheSettings};
pub use error::{ConfigError, InvariantError, PersistError};
pub use persist::{PersistenceCodec, SerializedCache};
pub use policy::ordered::{DEFAULT_CAPACITY, EvictionPolicy, OrderedCacheIndex};
