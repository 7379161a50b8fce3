//! Chained hash index over arena-resident entries.
//!
//! Each bucket holds the handle of the first entry of a singly linked chain;
//! the rest of the chain is threaded through [`Entry::chain`]. The index does
//! not own entries, it only links handles that live in the shared
//! [`SlotArena`].
//!
//! ```text
//!   heads[0] ─► None
//!   heads[1] ─► [k=9] ─chain─► [k=5] ─chain─► [k=1] ─► None
//!   heads[2] ─► [k=6] ─► None
//!   heads[3] ─► None
//! ```
//!
//! - `attach`: O(1), new entry becomes the first of its chain
//! - `detach` / `find`: O(chain length), linear scan from the chain head

use crate::ds::entry::Entry;
use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::{CacheError, ConfigError};
use crate::traits::{BucketHasher, CacheKey};

#[derive(Debug, Clone)]
pub struct BucketIndex<H> {
    heads: Vec<Option<SlotId>>,
    hasher: H,
}

impl<H> BucketIndex<H> {
    /// Creates `bucket_count` empty buckets.
    ///
    /// Fails with a configuration error for zero buckets and with
    /// [`CacheError::AllocationFailure`] if the bucket array cannot be
    /// allocated.
    pub fn try_new(bucket_count: usize, hasher: H) -> Result<Self, CacheError> {
        if bucket_count == 0 {
            return Err(ConfigError::new("bucket_count must be > 0").into());
        }
        let mut heads = Vec::new();
        heads
            .try_reserve_exact(bucket_count)
            .map_err(|_| CacheError::AllocationFailure)?;
        heads.resize(bucket_count, None);
        Ok(Self { heads, hasher })
    }

    pub fn bucket_count(&self) -> usize {
        self.heads.len()
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// First entry of `bucket`'s chain.
    pub fn head(&self, bucket: usize) -> Option<SlotId> {
        self.heads.get(bucket).copied().flatten()
    }

    /// Empties every bucket without touching the arena.
    pub fn clear(&mut self) {
        self.heads.fill(None);
    }

    /// Iterates the handles of `bucket`'s chain, first to last.
    pub fn chain<'a, K, V>(
        &self,
        arena: &'a SlotArena<Entry<K, V>>,
        bucket: usize,
    ) -> ChainIter<'a, K, V> {
        ChainIter {
            arena,
            current: self.head(bucket),
        }
    }

    /// Number of entries linked into `bucket`.
    pub fn chain_len<K, V>(&self, arena: &SlotArena<Entry<K, V>>, bucket: usize) -> usize {
        self.chain(arena, bucket).count()
    }
}

impl<H> BucketIndex<H> {
    /// Bucket that `key` belongs to.
    #[inline]
    pub fn bucket_for<K>(&self, key: K) -> usize
    where
        K: CacheKey,
        H: BucketHasher<K>,
    {
        let bucket = self.hasher.bucket(key, self.heads.len());
        debug_assert!(bucket < self.heads.len(), "hasher returned out-of-range bucket");
        bucket % self.heads.len()
    }

    /// Scans `key`'s bucket and returns the first entry holding it.
    pub fn find<K, V>(&self, arena: &SlotArena<Entry<K, V>>, key: K) -> Option<SlotId>
    where
        K: CacheKey,
        H: BucketHasher<K>,
    {
        let bucket = self.bucket_for(key);
        let mut cursor = self.heads[bucket];
        while let Some(id) = cursor {
            let entry = arena.get(id)?;
            if entry.key == key {
                return Some(id);
            }
            cursor = entry.chain;
        }
        None
    }

    /// Links `id` in front of its bucket's chain.
    ///
    /// The caller guarantees `id` is live and not already chained.
    pub fn attach<K, V>(&mut self, arena: &mut SlotArena<Entry<K, V>>, id: SlotId)
    where
        K: CacheKey,
        H: BucketHasher<K>,
    {
        let Some(key) = arena.get(id).map(|entry| entry.key) else {
            return;
        };
        let bucket = self.bucket_for(key);
        let first = self.heads[bucket];
        if let Some(entry) = arena.get_mut(id) {
            entry.chain = first;
        }
        self.heads[bucket] = Some(id);
    }

    /// Unlinks `id` from its bucket's chain and clears its chain link.
    ///
    /// Fails with [`CacheError::Null`] if `id` is not live and with
    /// [`CacheError::NotFound`] if it is not in the chain its key maps to.
    /// Nothing is modified on failure.
    pub fn detach<K, V>(
        &mut self,
        arena: &mut SlotArena<Entry<K, V>>,
        id: SlotId,
    ) -> Result<(), CacheError>
    where
        K: CacheKey,
        H: BucketHasher<K>,
    {
        let key = arena.get(id).ok_or(CacheError::Null)?.key;
        let bucket = self.bucket_for(key);

        let mut prev: Option<SlotId> = None;
        let mut cursor = self.heads[bucket];
        while let Some(current) = cursor {
            let Some(next) = arena.get(current).map(|entry| entry.chain) else {
                break;
            };
            if current == id {
                match prev {
                    None => self.heads[bucket] = next,
                    Some(prev_id) => {
                        if let Some(prev_entry) = arena.get_mut(prev_id) {
                            prev_entry.chain = next;
                        }
                    },
                }
                if let Some(entry) = arena.get_mut(id) {
                    entry.chain = None;
                }
                return Ok(());
            }
            prev = Some(current);
            cursor = next;
        }
        Err(CacheError::NotFound)
    }
}

/// Iterator over the handles of one bucket chain.
pub struct ChainIter<'a, K, V> {
    arena: &'a SlotArena<Entry<K, V>>,
    current: Option<SlotId>,
}

impl<'a, K, V> Iterator for ChainIter<'a, K, V> {
    type Item = (SlotId, &'a Entry<K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let entry = self.arena.get(id)?;
        self.current = entry.chain;
        Some((id, entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ModuloHasher;

    fn setup(
        bucket_count: usize,
        keys: &[u32],
    ) -> (BucketIndex<ModuloHasher>, SlotArena<Entry<u32, u32>>, Vec<SlotId>) {
        let mut index = BucketIndex::try_new(bucket_count, ModuloHasher).unwrap();
        let mut arena = SlotArena::new();
        let mut ids = Vec::new();
        for &key in keys {
            let id = arena.try_insert(Entry::detached(key, key * 10)).unwrap();
            index.attach(&mut arena, id);
            ids.push(id);
        }
        (index, arena, ids)
    }

    fn chain_keys(
        index: &BucketIndex<ModuloHasher>,
        arena: &SlotArena<Entry<u32, u32>>,
        bucket: usize,
    ) -> Vec<u32> {
        index.chain(arena, bucket).map(|(_, e)| e.key).collect()
    }

    #[test]
    fn zero_buckets_is_a_config_error() {
        let err = BucketIndex::try_new(0, ModuloHasher).unwrap_err();
        assert!(matches!(err, CacheError::Config(_)));
    }

    #[test]
    fn attach_prepends_to_chain() {
        let (index, arena, _) = setup(4, &[1, 5, 9, 2]);
        assert_eq!(chain_keys(&index, &arena, 1), vec![9, 5, 1]);
        assert_eq!(chain_keys(&index, &arena, 2), vec![2]);
        assert_eq!(index.chain_len(&arena, 0), 0);
        assert_eq!(index.chain_len(&arena, 3), 0);
    }

    #[test]
    fn find_scans_only_the_key_bucket() {
        let (index, arena, ids) = setup(4, &[1, 5, 9]);
        assert_eq!(index.find(&arena, 5), Some(ids[1]));
        assert_eq!(index.find(&arena, 13), None);
        assert_eq!(index.find(&arena, 2), None);
    }

    #[test]
    fn detach_first_middle_and_last_of_chain() {
        let (mut index, mut arena, ids) = setup(4, &[1, 5, 9]);

        // middle
        index.detach(&mut arena, ids[1]).unwrap();
        assert_eq!(chain_keys(&index, &arena, 1), vec![9, 1]);
        assert_eq!(arena.get(ids[1]).unwrap().chain, None);

        // first
        index.detach(&mut arena, ids[2]).unwrap();
        assert_eq!(chain_keys(&index, &arena, 1), vec![1]);

        // last and only
        index.detach(&mut arena, ids[0]).unwrap();
        assert!(chain_keys(&index, &arena, 1).is_empty());
        assert_eq!(index.head(1), None);
    }

    #[test]
    fn detach_unchained_entry_is_not_found() {
        let (mut index, mut arena, _) = setup(4, &[1, 5]);
        let loose = arena.try_insert(Entry::detached(9, 90)).unwrap();

        assert_eq!(index.detach(&mut arena, loose), Err(CacheError::NotFound));
        assert_eq!(chain_keys(&index, &arena, 1), vec![5, 1]);
    }

    #[test]
    fn detach_dead_handle_is_null() {
        let (mut index, mut arena, ids) = setup(4, &[3]);
        index.detach(&mut arena, ids[0]).unwrap();
        arena.remove(ids[0]);
        assert_eq!(index.detach(&mut arena, ids[0]), Err(CacheError::Null));
    }

    #[test]
    fn detach_twice_is_not_found() {
        let (mut index, mut arena, ids) = setup(2, &[0, 2]);
        index.detach(&mut arena, ids[0]).unwrap();
        assert_eq!(index.detach(&mut arena, ids[0]), Err(CacheError::NotFound));
        assert_eq!(chain_keys(&index, &arena, 0), vec![2]);
    }

    #[test]
    fn clear_empties_all_buckets() {
        let (mut index, arena, _) = setup(3, &[0, 1, 2, 3]);
        index.clear();
        for bucket in 0..3 {
            assert_eq!(index.chain_len(&arena, bucket), 0);
        }
        assert_eq!(index.bucket_count(), 3);
    }
}
