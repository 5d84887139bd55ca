//! Eviction policies.
//!
//! - [`ordered`]: string-keyed LRU with single-entry or bulk eviction.

pub mod ordered;

pub use ordered::{DEFAULT_CAPACITY, EvictionPolicy, OrderedCacheIndex};
