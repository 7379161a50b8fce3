//! Generational slot arena backing the cache entries.
//!
//! Entries are stored in a `Vec` of slots and addressed by [`SlotId`]
//! handles. A handle carries the slot's generation, which is bumped whenever
//! the slot's occupant is removed or replaced, so a handle taken before a
//! release or a reclaim no longer resolves afterwards.
//!
//! ```text
//!   slots: [ {gen 0, Some(a)} | {gen 1, None} | {gen 3, Some(c)} ]
//!   free_list: [1]
//!
//!   SlotId { index: 2, generation: 3 }  -> Some(c)
//!   SlotId { index: 2, generation: 2 }  -> None (stale)
//! ```
//!
//! Generations are 64-bit, so a slot cannot cycle back to an old generation
//! within any realistic number of reuses.
//!
//! Growth goes through `Vec::try_reserve`, so an allocation failure surfaces
//! as an error instead of aborting the process.

use std::collections::TryReserveError;

/// Stable handle to an occupied slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId {
    index: usize,
    generation: u64,
}

impl SlotId {
    /// Position of the slot in the arena.
    pub fn index(self) -> usize {
        self.index
    }

    /// Generation the slot had when this handle was issued.
    pub fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u64,
    value: Option<T>,
}

#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Makes room for `additional` more occupants without reallocating on
    /// the following inserts. Free slots count towards the room.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let needed = additional.saturating_sub(self.free_list.len());
        self.slots.try_reserve(needed)
    }

    /// Stores `value`, reusing a free slot when one exists.
    pub fn try_insert(&mut self, value: T) -> Result<SlotId, TryReserveError> {
        self.try_reserve(1)?;
        Ok(self.insert(value))
    }

    /// Stores `value`, reusing a free slot when one exists.
    ///
    /// Grows the slot vector infallibly; call [`try_reserve`](Self::try_reserve)
    /// first to surface allocation failure instead.
    pub fn insert(&mut self, value: T) -> SlotId {
        let id = if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index];
            slot.value = Some(value);
            SlotId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            SlotId {
                index: self.slots.len() - 1,
                generation: 0,
            }
        };
        self.len += 1;
        id
    }

    /// Removes the occupant of `id` and retires the handle.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.live_slot_mut(id)?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.index);
        self.len -= 1;
        Some(value)
    }

    /// Swaps the occupant of `id` for `value` in place.
    ///
    /// The slot keeps its storage but moves to a new generation: the returned
    /// handle addresses `value`, and `id` stops resolving.
    pub fn replace(&mut self, id: SlotId, value: T) -> Option<(SlotId, T)> {
        let slot = self.live_slot_mut(id)?;
        let old = slot.value.replace(value)?;
        slot.generation = slot.generation.wrapping_add(1);
        Some((
            SlotId {
                index: id.index,
                generation: slot.generation,
            },
            old,
        ))
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.live_slot_mut(id).and_then(|slot| slot.value.as_mut())
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Drops every occupant and retires all outstanding handles.
    ///
    /// Slot storage is kept so generations survive the clear.
    pub fn clear(&mut self) {
        self.free_list.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free_list.push(index);
        }
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    SlotId {
                        index,
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }

    fn live_slot_mut(&mut self, id: SlotId) -> Option<&mut Slot<T>> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation && slot.value.is_some())
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
