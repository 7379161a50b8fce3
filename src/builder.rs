//! Builder and behavior switches for [`ChainedLru`].
//!
//! ## Example
//!
//! ```rust
//! use chainlru::builder::{DuplicateKeys, LruBuilder, RemovePolicy};
//! use chainlru::traits::FxBucketHasher;
//!
//! let mut cache = LruBuilder::new(64)
//!     .bucket_count(16)
//!     .hasher(FxBucketHasher)
//!     .duplicate_keys(DuplicateKeys::Overwrite)
//!     .remove_policy(RemovePolicy::KeepCapacity)
//!     .try_build::<u64, u64>()
//!     .unwrap();
//!
//! cache.add(1, 100).unwrap();
//! assert_eq!(cache.get(1), Some(&100));
//! assert_eq!(cache.bucket_count(), 16);
//! ```
//!
//! ## Options
//!
//! | Option           | Default          | Description                              |
//! |------------------|------------------|------------------------------------------|
//! | `capacity`       | (required)       | Maximum number of linked entries         |
//! | `bucket_count`   | `max(capacity,1)`| Size of the chained bucket index         |
//! | `hasher`         | `ModuloHasher`   | Key to bucket mapping                    |
//! | `duplicate_keys` | `Overwrite`      | What `add` does with a key already held  |
//! | `remove_policy`  | `KeepCapacity`   | Whether `remove` shrinks capacity        |

use crate::error::CacheError;
use crate::policy::lru::ChainedLru;
use crate::traits::{BucketHasher, CacheKey, ModuloHasher};

/// How `add` treats a key that is already in the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateKeys {
    /// Overwrite the existing entry's value and promote it.
    #[default]
    Overwrite,
    /// Link a second entry under the same key. Lookups find whichever entry
    /// is first in the bucket chain, which is the most recently added one.
    Allow,
}

/// What `remove` does to the cache's capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RemovePolicy {
    /// Capacity is unaffected by removals.
    #[default]
    KeepCapacity,
    /// Every successful removal lowers capacity by one. Repeated removals can
    /// drive capacity to zero, after which `add` fails.
    ShrinkCapacity,
}

/// Builder for [`ChainedLru`].
#[derive(Debug, Clone)]
pub struct LruBuilder<H = ModuloHasher> {
    capacity: usize,
    bucket_count: Option<usize>,
    hasher: H,
    duplicate_keys: DuplicateKeys,
    remove_policy: RemovePolicy,
}

impl LruBuilder<ModuloHasher> {
    /// Starts a builder for a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            bucket_count: None,
            hasher: ModuloHasher,
            duplicate_keys: DuplicateKeys::default(),
            remove_policy: RemovePolicy::default(),
        }
    }
}

impl<H> LruBuilder<H> {
    pub fn bucket_count(mut self, bucket_count: usize) -> Self {
        self.bucket_count = Some(bucket_count);
        self
    }

    /// Replaces the key to bucket mapping.
    pub fn hasher<H2>(self, hasher: H2) -> LruBuilder<H2> {
        LruBuilder {
            capacity: self.capacity,
            bucket_count: self.bucket_count,
            hasher,
            duplicate_keys: self.duplicate_keys,
            remove_policy: self.remove_policy,
        }
    }

    pub fn duplicate_keys(mut self, mode: DuplicateKeys) -> Self {
        self.duplicate_keys = mode;
        self
    }

    pub fn remove_policy(mut self, policy: RemovePolicy) -> Self {
        self.remove_policy = policy;
        self
    }

    /// Builds the cache, rejecting a zero bucket count.
    pub fn try_build<K, V>(self) -> Result<ChainedLru<K, V, H>, CacheError>
    where
        K: CacheKey,
        H: BucketHasher<K>,
    {
        let bucket_count = self.bucket_count.unwrap_or(self.capacity.max(1));
        ChainedLru::from_parts(
            bucket_count,
            self.capacity,
            self.hasher,
            self.duplicate_keys,
            self.remove_policy,
        )
    }

    /// Builds the cache.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is rejected by [`try_build`](Self::try_build).
    pub fn build<K, V>(self) -> ChainedLru<K, V, H>
    where
        K: CacheKey,
        H: BucketHasher<K>,
    {
        match self.try_build() {
            Ok(cache) => cache,
            Err(err) => panic!("invalid cache configuration: {err}"),
        }
    }
}
