pub use crate::builder::{CacheBuilder, CacheSettings};
pub use crate::ds::{RecencyList, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError, PersistError};
#[cfg(feature = "metrics")]
pub use crate::metrics::{LruMetricsSnapshot, PrometheusTextExporter};
#[cfg(feature = "metrics")]
pub use crate::metrics::traits::MetricsExporter;
pub use crate::persist::{Json, PersistenceCodec, SerializedCache, WireFormat};
pub use crate::policy::ordered::{DEFAULT_CAPACITY, EvictionPolicy, OrderedCacheIndex};
pub use crate::traits::{CoreCache, DiskCache, LruCacheTrait, MutableCache};
