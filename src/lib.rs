//! chainlru: fixed-capacity LRU cache over a chained hash index.
//!
//! Entries live in a generational arena and are threaded through two
//! structures at once: a bucket chain for lookup by key and a doubly linked
//! recency list for eviction order. See `DESIGN.md` for the architecture.
//!
//! ```
//! use chainlru::ChainedLru;
//!
//! let mut cache: ChainedLru<u64, &str> = ChainedLru::new(8, 2);
//! cache.add(1, "one").unwrap();
//! cache.add(2, "two").unwrap();
//! cache.add(3, "three").unwrap(); // evicts 1
//!
//! assert!(!cache.contains(1));
//! assert_eq!(cache.peek_mru(), Some((3, &"three")));
//! ```

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod traits;

pub use crate::builder::{DuplicateKeys, LruBuilder, RemovePolicy};
pub use crate::ds::{SlotArena, SlotId};
pub use crate::error::{CacheError, ConfigError, InvariantError};
pub use crate::policy::lru::{ChainedLru, EntryId};
pub use crate::traits::{BucketHasher, CacheKey, FxBucketHasher, ModuloHasher};
