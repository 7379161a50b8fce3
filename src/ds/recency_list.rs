//! Doubly linked recency list over arena-resident entries.
//!
//! The list stores only `head` and `tail`; `prev`/`next` live in the
//! entries themselves, so the same [`Entry`] can sit in a bucket chain at the
//! same time.
//!
//! ```text
//!   head ──► [A] ◄──► [B] ◄──► [C] ◄── tail
//!            MRU                LRU
//! ```
//!
//! ## Detach cases
//!
//! ```text
//!   Sole      [A]                 head = tail = None
//!   Head      [A] ◄─► [B] ...     head = B, B.prev = None
//!   Tail      ... [B] ◄─► [C]     tail = B, B.next = None
//!   Interior  [A] ◄─► [B] ◄─► [C] A.next = C, C.prev = A
//! ```
//!
//! The list keeps no length; the owning cache does the accounting.

use crate::ds::entry::Entry;
use crate::ds::slot_arena::{SlotArena, SlotId};

/// Where an entry sits relative to the list ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Sole,
    Head,
    Tail,
    Interior,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecencyList {
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl RecencyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently used entry.
    pub fn head(&self) -> Option<SlotId> {
        self.head
    }

    /// Least recently used entry.
    pub fn tail(&self) -> Option<SlotId> {
        self.tail
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn clear(&mut self) {
        self.head = None;
        self.tail = None;
    }

    fn position_of(&self, id: SlotId) -> Position {
        match (self.head == Some(id), self.tail == Some(id)) {
            (true, true) => Position::Sole,
            (true, false) => Position::Head,
            (false, true) => Position::Tail,
            (false, false) => Position::Interior,
        }
    }

    /// Unlinks `id` and clears its `prev`/`next`.
    ///
    /// `id` must currently be a member of this list; membership is not
    /// checked here.
    pub fn detach<K, V>(&mut self, arena: &mut SlotArena<Entry<K, V>>, id: SlotId) {
        let Some((prev, next)) = arena.get(id).map(|entry| (entry.prev, entry.next)) else {
            return;
        };

        match self.position_of(id) {
            Position::Sole => {
                self.head = None;
                self.tail = None;
            },
            Position::Head => {
                self.head = next;
                if let Some(new_head) = next.and_then(|n| arena.get_mut(n)) {
                    new_head.prev = None;
                }
            },
            Position::Tail => {
                self.tail = prev;
                if let Some(new_tail) = prev.and_then(|p| arena.get_mut(p)) {
                    new_tail.next = None;
                }
            },
            Position::Interior => {
                if let Some(before) = prev.and_then(|p| arena.get_mut(p)) {
                    before.next = next;
                }
                if let Some(after) = next.and_then(|n| arena.get_mut(n)) {
                    after.prev = prev;
                }
            },
        }

        if let Some(entry) = arena.get_mut(id) {
            entry.prev = None;
            entry.next = None;
        }
    }

    /// Links `id` at the head.
    pub fn attach<K, V>(&mut self, arena: &mut SlotArena<Entry<K, V>>, id: SlotId) {
        let old_head = self.head;
        match arena.get_mut(id) {
            Some(entry) => {
                entry.prev = None;
                entry.next = old_head;
            },
            None => return,
        }

        match old_head {
            None => self.tail = Some(id),
            Some(old_head) => {
                if let Some(node) = arena.get_mut(old_head) {
                    node.prev = Some(id);
                }
            },
        }
        self.head = Some(id);
    }

    /// Iterates from head (MRU) to tail (LRU).
    pub fn iter<'a, K, V>(&self, arena: &'a SlotArena<Entry<K, V>>) -> RecencyIter<'a, K, V> {
        RecencyIter {
            arena,
            current: self.head,
        }
    }
}

/// Iterator over `(SlotId, &Entry)` from MRU to LRU.
pub struct RecencyIter<'a, K, V> {
    arena: &'a SlotArena<Entry<K, V>>,
    current: Option<SlotId>,
}

impl<'a, K, V> Iterator for RecencyIter<'a, K, V> {
    type Item = (SlotId, &'a Entry<K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let entry = self.arena.get(id)?;
        self.current = entry.next;
        Some((id, entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(values: &[u32]) -> (RecencyList, SlotArena<Entry<u32, u32>>, Vec<SlotId>) {
        let mut list = RecencyList::new();
        let mut arena = SlotArena::new();
        let mut ids = Vec::new();
        // attach in reverse so the list reads in slice order from head
        for &v in values.iter().rev() {
            let id = arena.try_insert(Entry::detached(v, v)).unwrap();
            list.attach(&mut arena, id);
            ids.push(id);
        }
        ids.reverse();
        (list, arena, ids)
    }

    fn keys(list: &RecencyList, arena: &SlotArena<Entry<u32, u32>>) -> Vec<u32> {
        list.iter(arena).map(|(_, e)| e.key).collect()
    }

    fn assert_links(list: &RecencyList, arena: &SlotArena<Entry<u32, u32>>) {
        let mut prev = None;
        for (id, entry) in list.iter(arena) {
            assert_eq!(entry.prev, prev);
            prev = Some(id);
        }
        assert_eq!(list.tail(), prev);
    }

    #[test]
    fn attach_to_empty_sets_head_and_tail() {
        let (list, arena, ids) = build(&[1]);
        assert_eq!(list.head(), Some(ids[0]));
        assert_eq!(list.tail(), Some(ids[0]));
        assert_eq!(keys(&list, &arena), vec![1]);
    }

    #[test]
    fn attach_pushes_in_front_of_head() {
        let (list, arena, ids) = build(&[1, 2, 3]);
        assert_eq!(keys(&list, &arena), vec![1, 2, 3]);
        assert_eq!(list.head(), Some(ids[0]));
        assert_eq!(list.tail(), Some(ids[2]));
        assert_links(&list, &arena);
    }

    #[test]
    fn detach_sole_entry() {
        let (mut list, mut arena, ids) = build(&[1]);
        list.detach(&mut arena, ids[0]);
        assert!(list.is_empty());
        assert_eq!(list.tail(), None);
    }

    #[test]
    fn detach_head_entry() {
        let (mut list, mut arena, ids) = build(&[1, 2, 3]);
        list.detach(&mut arena, ids[0]);
        assert_eq!(keys(&list, &arena), vec![2, 3]);
        assert_eq!(arena.get(ids[1]).unwrap().prev, None);
        let detached = arena.get(ids[0]).unwrap();
        assert_eq!((detached.prev, detached.next), (None, None));
        assert_links(&list, &arena);
    }

    #[test]
    fn detach_tail_entry() {
        let (mut list, mut arena, ids) = build(&[1, 2, 3]);
        list.detach(&mut arena, ids[2]);
        assert_eq!(keys(&list, &arena), vec![1, 2]);
        assert_eq!(list.tail(), Some(ids[1]));
        assert_eq!(arena.get(ids[1]).unwrap().next, None);
        assert_links(&list, &arena);
    }

    #[test]
    fn detach_interior_entry() {
        let (mut list, mut arena, ids) = build(&[1, 2, 3]);
        list.detach(&mut arena, ids[1]);
        assert_eq!(keys(&list, &arena), vec![1, 3]);
        assert_eq!(arena.get(ids[0]).unwrap().next, Some(ids[2]));
        assert_eq!(arena.get(ids[2]).unwrap().prev, Some(ids[0]));
        assert_links(&list, &arena);
    }

    #[test]
    fn detach_then_attach_moves_to_head() {
        let (mut list, mut arena, ids) = build(&[1, 2, 3]);
        list.detach(&mut arena, ids[2]);
        list.attach(&mut arena, ids[2]);
        assert_eq!(keys(&list, &arena), vec![3, 1, 2]);
        assert_links(&list, &arena);
    }

    #[test]
    fn clear_forgets_ends() {
        let (mut list, arena, _) = build(&[1, 2]);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.iter(&arena).count(), 0);
    }
}
