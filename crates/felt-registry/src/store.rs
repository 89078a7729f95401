//! Dense, index-stable slot storage for one component kind.
//!
//! A [`SlotStore`] never compacts or relocates live entries: the component
//! index holds raw `u32` slot references, so a slot index must keep its
//! meaning for as long as the value it names is live. Released slots become
//! tombstones and their indices go on a free list for reuse.

use std::any::Any;

use tracing::warn;

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// One position in a kind's dense array: a live value or a tombstone.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    Live(T),
    Tombstone,
}

impl<T> Slot<T> {
    fn as_ref(&self) -> Option<&T> {
        match self {
            Slot::Live(value) => Some(value),
            Slot::Tombstone => None,
        }
    }

    fn as_mut(&mut self) -> Option<&mut T> {
        match self {
            Slot::Live(value) => Some(value),
            Slot::Tombstone => None,
        }
    }

    fn is_live(&self) -> bool {
        matches!(self, Slot::Live(_))
    }
}

// ---------------------------------------------------------------------------
// SlotStore
// ---------------------------------------------------------------------------

/// Dense storage for one component kind with free-list slot reuse.
#[derive(Debug, Default)]
pub struct SlotStore<T> {
    /// The dense array; tombstones mark released slots.
    slots: Vec<Slot<T>>,
    /// Indices of tombstoned slots available for reuse (LIFO).
    free: Vec<u32>,
}

impl<T> SlotStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Insert a value, reusing a free slot when one exists.
    ///
    /// The returned slot index is stable until [`release`](Self::release) is
    /// called for it.
    pub fn insert(&mut self, value: T) -> u32 {
        if let Some(slot) = self.free.pop() {
            debug_assert!(!self.slots[slot as usize].is_live());
            self.slots[slot as usize] = Slot::Live(value);
            slot
        } else {
            let slot = self.slots.len() as u32;
            self.slots.push(Slot::Live(value));
            slot
        }
    }

    /// Tombstone a slot and push its index on the free list.
    ///
    /// Returns `true` if the slot was live. Releasing an out-of-range or
    /// already-tombstoned slot leaves the store untouched and returns
    /// `false`.
    pub fn release(&mut self, slot: u32) -> bool {
        match self.slots.get_mut(slot as usize) {
            Some(entry) if entry.is_live() => {
                *entry = Slot::Tombstone;
                self.free.push(slot);
                true
            }
            _ => {
                warn!(slot, "release of a slot that is not live");
                false
            }
        }
    }

    /// The value in `slot`, or `None` for tombstones and out-of-range indices.
    pub fn get(&self, slot: u32) -> Option<&T> {
        self.slots.get(slot as usize).and_then(Slot::as_ref)
    }

    /// Mutable access to the value in `slot`.
    pub fn get_mut(&mut self, slot: u32) -> Option<&mut T> {
        self.slots.get_mut(slot as usize).and_then(Slot::as_mut)
    }

    /// Pre-allocate room for `additional` more slots.
    ///
    /// A hint only: it never changes the logical contents and never acts as
    /// a ceiling on the dense array.
    pub fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }

    /// Length of the dense array, tombstones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the dense array is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of live slots.
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of free (tombstoned) slots.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}

// ---------------------------------------------------------------------------
// ErasedStore
// ---------------------------------------------------------------------------

/// Object-safe view of a [`SlotStore`] for the operations that do not need
/// the value type: releasing slots, capacity hints, and bookkeeping counts.
///
/// The registry keeps one boxed `ErasedStore` per kind and downcasts through
/// [`as_any`](Self::as_any) for typed access, after checking the kind's
/// registered `TypeId`.
pub trait ErasedStore: Send + Sync {
    /// See [`SlotStore::release`].
    fn release(&mut self, slot: u32) -> bool;
    /// See [`SlotStore::reserve`].
    fn reserve(&mut self, additional: usize);
    /// See [`SlotStore::len`].
    fn len(&self) -> usize;
    /// See [`SlotStore::live_count`].
    fn live_count(&self) -> usize;
    /// See [`SlotStore::free_count`].
    fn free_count(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Send + Sync + 'static> ErasedStore for SlotStore<T> {
    fn release(&mut self, slot: u32) -> bool {
        SlotStore::release(self, slot)
    }

    fn reserve(&mut self, additional: usize) {
        SlotStore::reserve(self, additional);
    }

    fn len(&self) -> usize {
        SlotStore::len(self)
    }

    fn live_count(&self) -> usize {
        SlotStore::live_count(self)
    }

    fn free_count(&self) -> usize {
        SlotStore::free_count(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_appends_then_reuses() {
        let mut store = SlotStore::new();
        let a = store.insert("ace");
        let b = store.insert("king");
        assert_eq!((a, b), (0, 1));
        assert_eq!(store.len(), 2);

        assert!(store.release(a));
        assert_eq!(store.get(a), None);
        assert_eq!(store.free_count(), 1);

        // The freed index is reused; the dense array does not grow.
        let c = store.insert("queen");
        assert_eq!(c, a);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(c), Some(&"queen"));
    }

    #[test]
    fn live_index_is_stable_across_churn() {
        let mut store = SlotStore::new();
        let a = store.insert(10);
        let b = store.insert(20);
        let c = store.insert(30);
        store.release(b);
        store.insert(40);
        store.release(a);
        assert_eq!(store.get(c), Some(&30));
    }

    #[test]
    fn release_rejects_dead_and_out_of_range() {
        let mut store = SlotStore::new();
        let a = store.insert(1);
        assert!(store.release(a));
        assert!(!store.release(a));
        assert!(!store.release(99));
        assert_eq!(store.free_count(), 1);
    }

    #[test]
    fn get_mut_modifies_in_place() {
        let mut store = SlotStore::new();
        let a = store.insert(5);
        *store.get_mut(a).unwrap() = 7;
        assert_eq!(store.get(a), Some(&7));
    }

    #[test]
    fn reserve_is_only_a_hint() {
        let mut store = SlotStore::new();
        store.reserve(1);
        store.insert(1);
        store.insert(2);
        store.insert(3);
        assert_eq!(store.live_count(), 3);
    }

    #[test]
    fn counts_partition_the_dense_array() {
        let mut store = SlotStore::new();
        let slots: Vec<u32> = (0..6).map(|i| store.insert(i)).collect();
        store.release(slots[1]);
        store.release(slots[4]);
        assert_eq!(store.len(), store.live_count() + store.free_count());
        assert_eq!(store.live_count(), 4);
    }

    #[test]
    fn erased_release_reaches_typed_store() {
        let mut boxed: Box<dyn ErasedStore> = Box::new(SlotStore::<u32>::new());
        let slot = boxed
            .as_any_mut()
            .downcast_mut::<SlotStore<u32>>()
            .unwrap()
            .insert(99);
        assert!(boxed.release(slot));
        assert_eq!(boxed.live_count(), 0);
        assert_eq!(boxed.free_count(), 1);
    }
}
