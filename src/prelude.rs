pub use crate::builder::{DuplicateKeys, LruBuilder, RemovePolicy};
pub use crate::error::CacheError;
pub use crate::policy::lru::{ChainedLru, EntryId};
pub use crate::traits::{BucketHasher, CacheKey, FxBucketHasher, ModuloHasher};
