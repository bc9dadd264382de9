use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// A named position inside a fixed-size slot table.
pub trait Slot: Copy + Debug + PartialEq + 'static {
    /// Every slot, in positional order.
    const ALL: &'static [Self];

    fn position(self) -> usize;
}

/// Fixed-size table that can only be addressed through its slot enum `S`.
#[derive(Clone, PartialEq)]
pub struct SlotTable<S: Slot, T> {
    entries: Vec<Option<T>>,
    _slot: PhantomData<S>,
}

impl<S: Slot, T> Default for SlotTable<S, T> {
    fn default() -> Self {
        SlotTable {
            entries: S::ALL.iter().map(|_| None).collect(),
            _slot: PhantomData,
        }
    }
}

impl<S: Slot, T> SlotTable<S, T> {
    pub fn get(&self, slot: S) -> Option<&T> {
        self.entries[slot.position()].as_ref()
    }

    pub fn set(&mut self, slot: S, value: Option<T>) -> Option<T> {
        std::mem::replace(&mut self.entries[slot.position()], value)
    }

    pub fn is_set(&self, slot: S) -> bool {
        self.entries[slot.position()].is_some()
    }

    /// Occupied slots only, in positional order.
    pub fn iter(&self) -> impl Iterator<Item = (S, &T)> {
        S::ALL
            .iter()
            .zip(self.entries.iter())
            .filter_map(|(slot, entry)| entry.as_ref().map(|value| (*slot, value)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (S, &mut T)> {
        S::ALL
            .iter()
            .zip(self.entries.iter_mut())
            .filter_map(|(slot, entry)| entry.as_mut().map(|value| (*slot, value)))
    }
}

impl<S: Slot, T> Index<S> for SlotTable<S, T> {
    type Output = Option<T>;

    fn index(&self, slot: S) -> &Option<T> {
        &self.entries[slot.position()]
    }
}

impl<S: Slot, T> IndexMut<S> for SlotTable<S, T> {
    fn index_mut(&mut self, slot: S) -> &mut Option<T> {
        &mut self.entries[slot.position()]
    }
}

impl<S: Slot, T: Debug> Debug for SlotTable<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
