pub mod bucket_index;
pub mod entry;
pub mod recency_list;
pub mod slot_arena;

pub use bucket_index::{BucketIndex, ChainIter};
pub use entry::Entry;
pub use recency_list::{RecencyIter, RecencyList};
pub use slot_arena::{SlotArena, SlotId};
