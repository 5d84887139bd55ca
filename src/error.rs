//! Error types for recency-cache.
//!
//! ## Key Components
//!
//! - [`InvariantError`]: returned by
//!   [`OrderedCacheIndex::check_invariants`](crate::policy::ordered::OrderedCacheIndex::check_invariants)
//!   when the index and the recency list disagree.
//! - [`ConfigError`]: returned when cache configuration is invalid (zero
//!   capacity).
//! - [`PersistError`]: returned by the disk persistence layer, split into an
//!   I/O kind and an encoding kind so callers can tell "file missing" from
//!   "file corrupt".
//!
//! ## Example Usage
//!
//! ```
//! use recency_cache::error::ConfigError;
//! use recency_cache::OrderedCacheIndex;
//!
//! let cache: Result<OrderedCacheIndex<u32>, ConfigError> =
//!     OrderedCacheIndex::try_with_capacity(16);
//! assert!(cache.is_ok());
//!
//! let bad = OrderedCacheIndex::<u32>::try_with_capacity(0);
//! assert!(bad.is_err());
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Carries a human-readable description of which invariant failed. Seeing one
/// of these outside of a test means a bug in the cache, not bad input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`OrderedCacheIndex::try_with_capacity`](crate::policy::ordered::OrderedCacheIndex::try_with_capacity)
/// and [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build).
///
/// # Example
///
/// ```
/// use recency_cache::builder::CacheBuilder;
///
/// let err = CacheBuilder::new().capacity(0).try_build::<u64>().unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }

    pub(crate) fn zero_capacity() -> Self {
        Self::new("cache capacity must be greater than zero")
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// PersistError
// ---------------------------------------------------------------------------

/// Error returned by disk persistence.
///
/// `Io` covers reading, writing, flushing and renaming files; `Encoding`
/// covers turning the cache into bytes and back.
#[derive(Debug)]
pub enum PersistError {
    /// A file-system operation on `path` failed.
    Io { path: PathBuf, source: io::Error },
    /// The wire format rejected the payload.
    Encoding(Box<dyn std::error::Error + Send + Sync>),
}

impl PersistError {
    /// Wraps an error raised by a [`WireFormat`](crate::persist::WireFormat).
    pub fn encoding(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        PersistError::Encoding(err.into())
    }

    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        PersistError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// `true` when the failure came from the file system.
    pub fn is_io(&self) -> bool {
        matches!(self, PersistError::Io { .. })
    }

    /// `true` when the failure came from encoding or decoding.
    pub fn is_encoding(&self) -> bool {
        matches!(self, PersistError::Encoding(_))
    }

    /// `true` when the cache file does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            PersistError::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            PersistError::Encoding(_) => false,
        }
    }
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io { path, source } => {
                write!(f, "cache file {}: {}", path.display(), source)
            },
            PersistError::Encoding(err) => write!(f, "cache encoding failed: {}", err),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io { source, .. } => Some(source),
            PersistError::Encoding(err) => Some(err.as_ref()),
        }
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(err: serde_json::Error) -> Self {
        PersistError::Encoding(Box::new(err))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("index length mismatch");
        assert_eq!(err.to_string(), "index length mismatch");
        assert_eq!(err.message(), "index length mismatch");
    }

    #[test]
    fn invariant_clone_and_eq() {
        let a = InvariantError::new("x");
        assert_eq!(a.clone(), a);
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_zero_capacity_mentions_capacity() {
        let err = ConfigError::zero_capacity();
        assert!(err.message().contains("capacity"));
    }

    #[test]
    fn errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvariantError>();
        assert_error::<ConfigError>();
        assert_error::<PersistError>();
    }

    // -- PersistError -----------------------------------------------------

    #[test]
    fn persist_not_found_is_io() {
        let err = PersistError::io(
            Path::new("/missing/cache.json"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.is_io());
        assert!(err.is_not_found());
        assert!(!err.is_encoding());
        assert!(err.to_string().contains("/missing/cache.json"));
    }

    #[test]
    fn persist_permission_denied_is_not_not_found() {
        let err = PersistError::io(
            Path::new("cache.json"),
            io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(err.is_io());
        assert!(!err.is_not_found());
    }

    #[test]
    fn persist_encoding_from_serde_json() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err = PersistError::from(json_err);
        assert!(err.is_encoding());
        assert!(!err.is_not_found());
        assert!(std::error::Error::source(&err).is_some());
    }
}
