//! Error types for the chainlru library.
//!
//! ## Key Components
//!
//! - [`CacheError`]: Status returned by every fallible cache operation
//!   (`add`, `pop`, `push`, `allocate`, `release`, construction).
//! - [`ConfigError`]: Returned when construction parameters are invalid
//!   (e.g. a bucket count of zero).
//! - [`InvariantError`]: Returned by [`ChainedLru::check_invariants`] when the
//!   bucket index and the recency list disagree.
//!
//! ## Example Usage
//!
//! ```
//! use chainlru::error::CacheError;
//! use chainlru::policy::lru::ChainedLru;
//!
//! let bad = ChainedLru::<u32, u32>::try_new(0, 8);
//! assert!(matches!(bad, Err(CacheError::Config(_))));
//!
//! let mut cache = ChainedLru::<u32, u32>::try_new(4, 0).unwrap();
//! assert_eq!(cache.add(1, 10), Err(CacheError::AllocationFailure));
//! ```
//!
//! [`ChainedLru::check_invariants`]: crate::policy::lru::ChainedLru::check_invariants

use std::fmt;

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Status of a failed cache operation.
///
/// None of the operations that return this error leave the bucket index and
/// the recency list out of step with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CacheError {
    /// The entry handle does not refer to live storage (never allocated,
    /// released, or reclaimed since the handle was taken).
    Null,
    /// No storage could be obtained and there was no entry to reclaim.
    AllocationFailure,
    /// The entry or key is absent from the structure that was searched.
    NotFound,
    /// The cache already holds `capacity` linked entries.
    Full,
    /// The entry is already linked into the cache.
    Linked,
    /// Another entry for the same key is already linked and duplicate keys
    /// are not allowed.
    Duplicate,
    /// Construction parameters were rejected.
    Config(ConfigError),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Null => f.write_str("entry handle does not refer to live storage"),
            CacheError::AllocationFailure => {
                f.write_str("no storage available and no entry to reclaim")
            },
            CacheError::NotFound => f.write_str("entry not found"),
            CacheError::Full => f.write_str("cache is at capacity"),
            CacheError::Linked => f.write_str("entry is already linked into the cache"),
            CacheError::Duplicate => f.write_str("an entry for this key is already linked"),
            CacheError::Config(err) => write!(f, "invalid configuration: {err}"),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for CacheError {
    fn from(err: ConfigError) -> Self {
        CacheError::Config(err)
    }
}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by [`ChainedLru::check_invariants`](crate::policy::lru::ChainedLru::check_invariants).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
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
/// Produced by [`ChainedLru::try_new`](crate::policy::lru::ChainedLru::try_new)
/// and [`LruBuilder::try_build`](crate::builder::LruBuilder::try_build), wrapped
/// in [`CacheError::Config`].
///
/// # Example
///
/// ```
/// use chainlru::builder::LruBuilder;
/// use chainlru::error::CacheError;
///
/// let err = LruBuilder::new(8)
///     .bucket_count(0)
///     .try_build::<u64, u64>()
///     .unwrap_err();
/// assert!(err.to_string().contains("bucket_count"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
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

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
