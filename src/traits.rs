//! # Key and Bucket-Mapping Traits
//!
//! The cache is keyed by fixed-width integers and maps each key to one slot
//! of its bucket index through a [`BucketHasher`].
//!
//! ```text
//!   key ──► BucketHasher::bucket(key, bucket_count) ──► 0..bucket_count
//!
//!   ModuloHasher    key mod bucket_count   (Euclidean, negatives stay in range)
//!   FxBucketHasher  FxHash(key) mod bucket_count
//! ```
//!
//! | Trait          | Purpose                                           |
//! |----------------|---------------------------------------------------|
//! | `CacheKey`     | Integer key with a direct modulo bucket mapping   |
//! | `BucketHasher` | Pluggable mapping from key to bucket index        |
//!
//! A `BucketHasher` must be deterministic: the same key and bucket count
//! always produce the same index, and that index is below `bucket_count`.
//! The bucket index relies on this to find an entry again when it is
//! detached.

use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

/// Fixed-width integer usable as a cache key.
pub trait CacheKey: Copy + Eq + Hash + Debug {
    /// Returns `self mod bucket_count`, always in `0..bucket_count`.
    ///
    /// `bucket_count` must be non-zero.
    fn bucket_of(self, bucket_count: usize) -> usize;
}

macro_rules! impl_cache_key_unsigned {
    ($($t:ty),* $(,)?) => {
        $(
            impl CacheKey for $t {
                #[inline]
                fn bucket_of(self, bucket_count: usize) -> usize {
                    (self as u128 % bucket_count as u128) as usize
                }
            }
        )*
    };
}

macro_rules! impl_cache_key_signed {
    ($($t:ty),* $(,)?) => {
        $(
            impl CacheKey for $t {
                #[inline]
                fn bucket_of(self, bucket_count: usize) -> usize {
                    (self as i128).rem_euclid(bucket_count as i128) as usize
                }
            }
        )*
    };
}

impl_cache_key_unsigned!(u8, u16, u32, u64, u128, usize);
impl_cache_key_signed!(i8, i16, i32, i64, i128, isize);

/// Maps a key to a bucket of the chained index.
pub trait BucketHasher<K> {
    /// Returns the bucket for `key`; must be `< bucket_count`.
    fn bucket(&self, key: K, bucket_count: usize) -> usize;
}

/// Plain `key mod bucket_count` mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModuloHasher;

impl<K: CacheKey> BucketHasher<K> for ModuloHasher {
    #[inline]
    fn bucket(&self, key: K, bucket_count: usize) -> usize {
        key.bucket_of(bucket_count)
    }
}

/// Scrambles keys with FxHash before reducing them.
///
/// Useful when keys share a stride with the bucket count (e.g. page numbers
/// that are all multiples of 8 with 8 buckets), which would otherwise pile
/// every entry into one chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FxBucketHasher;

impl<K: CacheKey> BucketHasher<K> for FxBucketHasher {
    #[inline]
    fn bucket(&self, key: K, bucket_count: usize) -> usize {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        (hasher.finish() % bucket_count as u64) as usize
    }
}

impl<K, F> BucketHasher<K> for F
where
    F: Fn(K, usize) -> usize,
{
    #[inline]
    fn bucket(&self, key: K, bucket_count: usize) -> usize {
        self(key, bucket_count)
    }
}
