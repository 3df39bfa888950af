use std::collections::VecDeque;
use std::ops::{Index, IndexMut};

use crate::r#const::POOL_BATCH;

/// Handle to a node in a [`Pool`]. Freeing a node bumps the generation of its slot, so handles
/// kept past a free are caught instead of aliasing the next occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Arena for list nodes, grown [`POOL_BATCH`] slots at a time. Freed slots are recycled oldest
/// first.
#[derive(Debug)]
pub(crate) struct Pool<T> {
    slots: Vec<Slot<T>>,
    free: VecDeque<u32>,
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Pool {
            slots: Vec::new(),
            free: VecDeque::new(),
        }
    }

    pub fn alloc(&mut self, value: T) -> NodeId {
        if self.free.is_empty() {
            self.grow();
        }
        let index = self.free.pop_front().unwrap_or_default();
        let slot = &mut self.slots[index as usize];
        slot.value = Some(value);
        NodeId {
            index,
            generation: slot.generation,
        }
    }

    pub fn free(&mut self, id: NodeId) {
        let slot = &mut self.slots[id.index as usize];
        debug_assert_eq!(slot.generation, id.generation, "double free of {id:?}");
        debug_assert!(slot.value.is_some(), "double free of {id:?}");

        slot.value = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push_back(id.index);
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Nodes currently allocated
    #[cfg(test)]
    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn grow(&mut self) {
        let start = self.slots.len();
        self.slots.reserve(POOL_BATCH);
        for index in start..start + POOL_BATCH {
            self.slots.push(Slot {
                generation: 0,
                value: None,
            });
            self.free.push_back(index as u32);
        }
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<NodeId> for Pool<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        match self.get(id) {
            Some(value) => value,
            None => panic!("stale node handle {id:?}"),
        }
    }
}

impl<T> IndexMut<NodeId> for Pool<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        match self.get_mut(id) {
            Some(value) => value,
            None => panic!("stale node handle {id:?}"),
        }
    }
}
