//! Cache entry shared by the bucket index and the recency list.
//!
//! ```text
//!   ┌──────────────────────────────────────────────┐
//!   │                 Entry<K, V>                  │
//!   ├──────────────────────────────────────────────┤
//!   │  key, value                                  │
//!   │  prev, next : Option<SlotId>  recency list   │
//!   │  chain      : Option<SlotId>  bucket chain   │
//!   │  linked     : bool            in both or in  │
//!   │                               neither        │
//!   └──────────────────────────────────────────────┘
//! ```
//!
//! Links are plain arena handles with no ownership; only the arena owns the
//! entry.

use crate::ds::slot_arena::SlotId;

#[derive(Debug, Clone)]
pub struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) prev: Option<SlotId>,
    pub(crate) next: Option<SlotId>,
    pub(crate) chain: Option<SlotId>,
    pub(crate) linked: bool,
}

impl<K, V> Entry<K, V> {
    /// Creates an entry that belongs to neither structure yet.
    pub(crate) fn detached(key: K, value: V) -> Self {
        Self {
            key,
            value,
            prev: None,
            next: None,
            chain: None,
            linked: false,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns `true` while the entry is threaded through the bucket index
    /// and the recency list.
    pub fn is_linked(&self) -> bool {
        self.linked
    }
}
