//! # Chained-Hash LRU Cache
//!
//! Fixed-capacity integer key/value cache with least-recently-used eviction.
//! A chained bucket index answers lookups, a doubly linked recency list
//! orders entries for eviction, and both thread through the same entries.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                        ChainedLru<K, V, H>                           │
//!   │                                                                      │
//!   │   BucketIndex<H>                     SlotArena<Entry<K, V>>          │
//!   │   ┌────────┐                         ┌────────┬──────────────────┐   │
//!   │   │ b[0]   │──► id_2 ─chain─► id_0   │ id_0   │ k=4 prev next .. │   │
//!   │   │ b[1]   │──► id_1                 │ id_1   │ k=1 prev next .. │   │
//!   │   │ b[2]   │──► None                 │ id_2   │ k=8 prev next .. │   │
//!   │   │ b[3]   │──► None                 └────────┴──────────────────┘   │
//!   │   └────────┘                                                         │
//!   │                                                                      │
//!   │   RecencyList:  head ──► [id_1] ◄──► [id_2] ◄──► [id_0] ◄── tail     │
//!   │                          MRU                      LRU                │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every linked entry is in exactly one bucket chain (the one its key maps
//! to) and at exactly one position in the recency list.
//!
//! ## Operations
//!
//! | Method            | Cost          | Description                                  |
//! |-------------------|---------------|----------------------------------------------|
//! | `add(k, v)`       | O(chain)      | Insert at head; reclaims the tail when full  |
//! | `search(k)`       | O(chain)      | Find and promote to head                     |
//! | `remove(k)`       | O(chain)      | Unlink and free                              |
//! | `pop(id)`         | O(chain)      | Unlink from both structures, keep storage    |
//! | `push(id)`        | O(chain)      | Link a detached entry at the head            |
//! | `peek(k)`         | O(chain)      | Find without promoting                       |
//! | `peek_lru()`      | O(1)          | Tail entry                                   |
//! | `clear()`         | O(n)          | Release every entry                          |
//!
//! ## Reclaim on a full cache
//!
//! ```text
//!   Before (capacity = 3):
//!     head ──► [A] ◄──► [B] ◄──► [C] ◄── tail
//!
//!   add(D):
//!     1. pop(C): unlink from its bucket chain and the recency list
//!     2. overwrite C's slot with D (the slot moves to a new generation)
//!     3. push(D): link into D's bucket and at the head
//!
//!   After:
//!     head ──► [D] ◄──► [A] ◄──► [B] ◄── tail
//! ```
//!
//! Once the cache is full, every insert of a new key reuses the tail's slot.
//! No fresh storage is allocated at that point.
//!
//! ## Example
//!
//! ```
//! use chainlru::policy::lru::ChainedLru;
//!
//! let mut cache: ChainedLru<u32, u32> = ChainedLru::new(4, 2);
//! cache.add(1, 10).unwrap();
//! cache.add(2, 20).unwrap();
//!
//! assert_eq!(cache.get(1), Some(&10)); // 1 is now MRU
//! cache.add(3, 30).unwrap(); // evicts 2
//!
//! assert!(cache.search(2).is_none());
//! assert!(cache.contains(1) && cache.contains(3));
//! ```
//!
//! ## Thread Safety
//!
//! `ChainedLru` is a plain single-threaded structure. Wrap it in a lock to
//! share it.

use std::fmt;

use rustc_hash::FxHashSet;
use tracing::{debug, trace, warn};

use crate::builder::{DuplicateKeys, RemovePolicy};
use crate::ds::{BucketIndex, Entry, RecencyList, SlotArena, SlotId};
use crate::error::{CacheError, InvariantError};
use crate::traits::{BucketHasher, CacheKey, ModuloHasher};

/// Handle to an entry stored in a [`ChainedLru`].
///
/// Handles stay valid while the entry's storage is live. Once the entry is
/// removed, released, or reclaimed for another key, the handle stops
/// resolving and operations on it report [`CacheError::Null`].
pub type EntryId = SlotId;

/// LRU cache over a chained hash index and an intrusive recency list.
pub struct ChainedLru<K, V, H = ModuloHasher> {
    arena: SlotArena<Entry<K, V>>,
    buckets: BucketIndex<H>,
    recency: RecencyList,
    len: usize,
    capacity: usize,
    duplicate_keys: DuplicateKeys,
    remove_policy: RemovePolicy,
}

impl<K, V> ChainedLru<K, V, ModuloHasher>
where
    K: CacheKey,
{
    /// Creates a cache with `bucket_count` buckets that holds at most
    /// `capacity` entries, using `key mod bucket_count` as the mapping.
    ///
    /// # Errors
    ///
    /// [`CacheError::Config`] if `bucket_count` is zero,
    /// [`CacheError::AllocationFailure`] if the bucket array cannot be
    /// allocated.
    pub fn try_new(bucket_count: usize, capacity: usize) -> Result<Self, CacheError> {
        Self::with_hasher(bucket_count, capacity, ModuloHasher)
    }

    /// Creates a cache, see [`try_new`](Self::try_new).
    ///
    /// # Panics
    ///
    /// Panics if `bucket_count` is zero or the bucket array cannot be
    /// allocated.
    pub fn new(bucket_count: usize, capacity: usize) -> Self {
        match Self::try_new(bucket_count, capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("failed to create cache: {err}"),
        }
    }
}

impl<K, V, H> ChainedLru<K, V, H>
where
    K: CacheKey,
    H: BucketHasher<K>,
{
    /// Creates a cache with a custom key to bucket mapping.
    pub fn with_hasher(
        bucket_count: usize,
        capacity: usize,
        hasher: H,
    ) -> Result<Self, CacheError> {
        Self::from_parts(
            bucket_count,
            capacity,
            hasher,
            DuplicateKeys::default(),
            RemovePolicy::default(),
        )
    }

    pub(crate) fn from_parts(
        bucket_count: usize,
        capacity: usize,
        hasher: H,
        duplicate_keys: DuplicateKeys,
        remove_policy: RemovePolicy,
    ) -> Result<Self, CacheError> {
        let buckets = BucketIndex::try_new(bucket_count, hasher)?;
        debug!(
            bucket_count,
            capacity,
            ?duplicate_keys,
            ?remove_policy,
            "created chained lru cache"
        );
        Ok(Self {
            arena: SlotArena::new(),
            buckets,
            recency: RecencyList::new(),
            len: 0,
            capacity,
            duplicate_keys,
            remove_policy,
        })
    }

    // -----------------------------------------------------------------------
    // Low-level primitives
    // -----------------------------------------------------------------------

    /// Unlinks `id` from its bucket chain and from the recency list, keeping
    /// its storage.
    ///
    /// # Errors
    ///
    /// - [`CacheError::Null`]: `id` does not refer to live storage.
    /// - [`CacheError::NotFound`]: the entry is not in its bucket chain. The
    ///   recency list is left untouched in that case.
    pub fn pop(&mut self, id: EntryId) -> Result<(), CacheError> {
        if !self.arena.contains(id) {
            return Err(CacheError::Null);
        }
        self.buckets.detach(&mut self.arena, id)?;
        self.recency.detach(&mut self.arena, id);
        if let Some(entry) = self.arena.get_mut(id) {
            entry.linked = false;
        }
        self.len -= 1;
        Ok(())
    }

    /// Links a detached entry at the front of its bucket and at the head of
    /// the recency list.
    ///
    /// # Errors
    ///
    /// - [`CacheError::Null`]: `id` does not refer to live storage.
    /// - [`CacheError::Linked`]: the entry is already linked.
    /// - [`CacheError::Duplicate`]: under [`DuplicateKeys::Overwrite`], another
    ///   entry with the same key is already linked.
    /// - [`CacheError::Full`]: `len() == capacity()`.
    ///
    /// All checks run before anything is modified.
    pub fn push(&mut self, id: EntryId) -> Result<(), CacheError> {
        let entry = self.arena.get(id).ok_or(CacheError::Null)?;
        if entry.linked {
            return Err(CacheError::Linked);
        }
        if self.duplicate_keys == DuplicateKeys::Overwrite
            && self.buckets.find(&self.arena, entry.key).is_some()
        {
            return Err(CacheError::Duplicate);
        }
        if self.len >= self.capacity {
            return Err(CacheError::Full);
        }

        self.buckets.attach(&mut self.arena, id);
        self.recency.attach(&mut self.arena, id);
        if let Some(entry) = self.arena.get_mut(id) {
            entry.linked = true;
        }
        self.len += 1;
        Ok(())
    }

    /// Stores a detached entry that can later be linked with [`push`](Self::push).
    ///
    /// Detached entries do not count towards `len()` and are never evicted.
    pub fn allocate(&mut self, key: K, value: V) -> Result<EntryId, CacheError> {
        self.arena
            .try_insert(Entry::detached(key, value))
            .map_err(|_| CacheError::AllocationFailure)
    }

    /// Frees a detached entry and returns its key and value.
    ///
    /// # Errors
    ///
    /// [`CacheError::Null`] for a dead handle, [`CacheError::Linked`] if the
    /// entry must be [`pop`](Self::pop)ped first.
    pub fn release(&mut self, id: EntryId) -> Result<(K, V), CacheError> {
        let entry = self.arena.get(id).ok_or(CacheError::Null)?;
        if entry.linked {
            return Err(CacheError::Linked);
        }
        self.arena
            .remove(id)
            .map(|entry| (entry.key, entry.value))
            .ok_or(CacheError::Null)
    }

    // -----------------------------------------------------------------------
    // Cache operations
    // -----------------------------------------------------------------------

    /// Inserts `key` at the head of the recency list.
    ///
    /// Below capacity a fresh entry is allocated. At capacity, or when fresh
    /// storage cannot be obtained, the least recently used entry is unlinked
    /// and its slot is reused for `key`.
    ///
    /// With [`DuplicateKeys::Overwrite`] (the default) an existing entry for
    /// `key` has its value replaced and is promoted instead.
    ///
    /// # Errors
    ///
    /// [`CacheError::AllocationFailure`] when nothing can be allocated and
    /// there is no entry to reclaim, which is always the case for a
    /// zero-capacity cache.
    pub fn add(&mut self, key: K, value: V) -> Result<EntryId, CacheError> {
        if self.duplicate_keys == DuplicateKeys::Overwrite {
            if let Some(id) = self.buckets.find(&self.arena, key) {
                trace!(?key, "overwriting existing entry");
                if let Some(entry) = self.arena.get_mut(id) {
                    entry.value = value;
                }
                self.promote(id)?;
                return Ok(id);
            }
        }

        let fresh = self.len < self.capacity && self.arena.try_reserve(1).is_ok();
        let id = if fresh {
            self.arena.insert(Entry::detached(key, value))
        } else {
            self.reclaim_tail(key, value)?
        };
        self.push(id)?;
        Ok(id)
    }

    /// Unlinks the tail and reuses its slot for `key`/`value`, leaving the
    /// new entry detached.
    fn reclaim_tail(&mut self, key: K, value: V) -> Result<EntryId, CacheError> {
        let tail = self.recency.tail().ok_or(CacheError::AllocationFailure)?;
        self.pop(tail)?;
        let (id, evicted) = self
            .arena
            .replace(tail, Entry::detached(key, value))
            .ok_or(CacheError::Null)?;
        trace!(evicted = ?evicted.key, inserted = ?key, "reclaimed least recently used entry");
        Ok(id)
    }

    /// Pops and re-pushes `id`, moving it to the front of its bucket and to
    /// the recency head.
    fn promote(&mut self, id: EntryId) -> Result<(), CacheError> {
        self.pop(id)?;
        self.push(id)
    }

    /// Finds `key` and promotes its entry to most recently used.
    pub fn search(&mut self, key: K) -> Option<EntryId> {
        let id = self.buckets.find(&self.arena, key)?;
        self.promote(id).ok()?;
        Some(id)
    }

    /// Returns the value for `key`, promoting it to most recently used.
    pub fn get(&mut self, key: K) -> Option<&V> {
        let id = self.search(key)?;
        self.arena.get(id).map(|entry| &entry.value)
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        let id = self.search(key)?;
        self.arena.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Returns the value for `key` without touching recency order.
    pub fn peek(&self, key: K) -> Option<&V> {
        let id = self.buckets.find(&self.arena, key)?;
        self.arena.get(id).map(|entry| &entry.value)
    }

    pub fn contains(&self, key: K) -> bool {
        self.buckets.find(&self.arena, key).is_some()
    }

    /// Removes `key` and returns its value; a missing key is a no-op.
    ///
    /// Under [`RemovePolicy::ShrinkCapacity`] a successful removal also
    /// lowers capacity by one.
    pub fn remove(&mut self, key: K) -> Option<V> {
        let id = self.buckets.find(&self.arena, key)?;
        self.pop(id).ok()?;
        let entry = self.arena.remove(id)?;

        if self.remove_policy == RemovePolicy::ShrinkCapacity {
            self.capacity = self.capacity.saturating_sub(1);
            if self.capacity == 0 {
                warn!("cache capacity shrunk to zero by removals; further adds will fail");
            }
        }
        trace!(?key, len = self.len, capacity = self.capacity, "removed entry");
        Some(entry.value)
    }

    /// Releases every entry, linked or detached. Outstanding handles stop
    /// resolving.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.buckets.clear();
        self.recency.clear();
        self.len = 0;
        trace!("cleared cache");
    }

    /// Checks that the bucket index and the recency list describe the same
    /// set of entries.
    ///
    /// Verifies mutual `prev`/`next` links, terminated ends, that every
    /// chained entry sits in the bucket its key maps to, that both structures
    /// count `len()` entries, that `len() <= capacity()`, and, unless
    /// duplicates are allowed, that keys are unique.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.len > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.len, self.capacity
            )));
        }

        let mut in_list: FxHashSet<EntryId> = FxHashSet::default();
        let mut prev: Option<EntryId> = None;
        let mut current = self.recency.head();
        while let Some(id) = current {
            let entry = self
                .arena
                .get(id)
                .ok_or_else(|| InvariantError::new("recency list references dead entry"))?;
            if !in_list.insert(id) {
                return Err(InvariantError::new("cycle in recency list"));
            }
            if entry.prev != prev {
                return Err(InvariantError::new(format!(
                    "entry {:?} has prev {:?}, expected {:?}",
                    entry.key, entry.prev, prev
                )));
            }
            if !entry.linked {
                return Err(InvariantError::new("unlinked entry in recency list"));
            }
            prev = Some(id);
            current = entry.next;
        }
        if self.recency.tail() != prev {
            return Err(InvariantError::new("tail does not terminate the recency list"));
        }
        if in_list.len() != self.len {
            return Err(InvariantError::new(format!(
                "recency list holds {} entries, len is {}",
                in_list.len(),
                self.len
            )));
        }

        let mut chained = 0usize;
        let mut keys: FxHashSet<K> = FxHashSet::default();
        for bucket in 0..self.buckets.bucket_count() {
            for (id, entry) in self.buckets.chain(&self.arena, bucket) {
                chained += 1;
                if chained > self.len {
                    return Err(InvariantError::new(
                        "bucket chains hold more entries than len",
                    ));
                }
                if self.buckets.bucket_for(entry.key) != bucket {
                    return Err(InvariantError::new(format!(
                        "key {:?} chained in bucket {}",
                        entry.key, bucket
                    )));
                }
                if !in_list.contains(&id) {
                    return Err(InvariantError::new(format!(
                        "key {:?} chained but missing from recency list",
                        entry.key
                    )));
                }
                if !keys.insert(entry.key) && self.duplicate_keys == DuplicateKeys::Overwrite {
                    return Err(InvariantError::new(format!(
                        "duplicate key {:?}",
                        entry.key
                    )));
                }
            }
        }
        if chained != self.len {
            return Err(InvariantError::new(format!(
                "bucket chains hold {chained} entries, len is {}",
                self.len
            )));
        }

        let flagged = self.arena.iter().filter(|(_, entry)| entry.linked).count();
        if flagged != self.len {
            return Err(InvariantError::new(format!(
                "{flagged} entries flagged linked, len is {}",
                self.len
            )));
        }
        Ok(())
    }
}

impl<K, V, H> ChainedLru<K, V, H>
where
    K: CacheKey,
{
    /// Number of linked entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.bucket_count()
    }

    pub fn duplicate_keys(&self) -> DuplicateKeys {
        self.duplicate_keys
    }

    pub fn remove_policy(&self) -> RemovePolicy {
        self.remove_policy
    }

    /// Reads an entry by handle, linked or detached.
    pub fn entry(&self, id: EntryId) -> Option<&Entry<K, V>> {
        self.arena.get(id)
    }

    /// Handle of the most recently used entry.
    pub fn head(&self) -> Option<EntryId> {
        self.recency.head()
    }

    /// Handle of the least recently used entry.
    pub fn tail(&self) -> Option<EntryId> {
        self.recency.tail()
    }

    /// Least recently used entry, the next to be reclaimed.
    pub fn peek_lru(&self) -> Option<(K, &V)> {
        let entry = self.arena.get(self.recency.tail()?)?;
        Some((entry.key, &entry.value))
    }

    /// Most recently used entry.
    pub fn peek_mru(&self) -> Option<(K, &V)> {
        let entry = self.arena.get(self.recency.head()?)?;
        Some((entry.key, &entry.value))
    }

    /// Iterates linked entries from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.recency
            .iter(&self.arena)
            .map(|(_, entry)| (entry.key, &entry.value))
    }

    /// Iterates `(bucket, key, value)` bucket by bucket, in chain order.
    pub fn bucket_entries(&self) -> impl Iterator<Item = (usize, K, &V)> + '_ {
        (0..self.buckets.bucket_count()).flat_map(move |bucket| {
            self.buckets
                .chain(&self.arena, bucket)
                .map(move |(_, entry)| (bucket, entry.key, &entry.value))
        })
    }
}

impl<K, V, H> fmt::Debug for ChainedLru<K, V, H>
where
    K: CacheKey,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedLru")
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("bucket_count", &self.buckets.bucket_count())
            .field("duplicate_keys", &self.duplicate_keys)
            .field("remove_policy", &self.remove_policy)
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for ChainedLru<K, V, ModuloHasher>
where
    K: CacheKey,
{
    /// Creates a cache with 16 buckets and a capacity of 16.
    fn default() -> Self {
        Self::new(16, 16)
    }
}

impl<K, V, H> Extend<(K, V)> for ChainedLru<K, V, H>
where
    K: CacheKey,
    H: BucketHasher<K>,
{
    /// Adds each pair in order. Pairs that cannot be added (zero capacity)
    /// are dropped.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            if self.add(key, value).is_err() {
                trace!(?key, "dropped pair during extend");
            }
        }
    }
}
