//! Slot identifiers and allocation for the entity arena.
//!
//! An [`EntityId`] names a slot in the [`EntityManager`](crate::manager::EntityManager)
//! arena. It packs a *generation* counter in the high 32 bits and a slot
//! *index* in the low 32 bits. The generation is bumped every time a slot is
//! released by the destroyed-sweep, so a handle kept across an eviction is
//! detected as stale instead of silently aliasing the next occupant.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

// ---------------------------------------------------------------------------
// EntityId
// ---------------------------------------------------------------------------

/// A generational slot handle.
///
/// Layout: `[generation: u32 | index: u32]`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Construct an `EntityId` from a slot index and generation.
    #[inline]
    pub fn new(index: u32, generation: u32) -> Self {
        Self((generation as u64) << 32 | index as u64)
    }

    /// The slot index (low 32 bits).
    #[inline]
    pub fn index(self) -> u32 {
        self.0 as u32
    }

    /// The generation (high 32 bits).
    #[inline]
    pub fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Raw `u64` representation.
    #[inline]
    pub fn to_raw(self) -> u64 {
        self.0
    }

    /// Reconstruct from a raw `u64`.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}v{})", self.index(), self.generation())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

// ---------------------------------------------------------------------------
// SlotAllocator
// ---------------------------------------------------------------------------

/// Hands out and recycles arena slots with generational tracking.
///
/// Freed indices go into a FIFO queue so that a projectile-heavy scene, which
/// frees and reuses slots every few frames, spreads generation bumps across
/// the whole arena instead of hammering one hot slot.
#[derive(Debug, Default)]
pub struct SlotAllocator {
    generations: Vec<u32>,
    occupied: Vec<bool>,
    free_indices: VecDeque<u32>,
}

impl SlotAllocator {
    /// Create an empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a slot. Recycled indices carry their already-bumped generation.
    pub fn allocate(&mut self) -> EntityId {
        if let Some(index) = self.free_indices.pop_front() {
            self.occupied[index as usize] = true;
            EntityId::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            self.occupied.push(true);
            EntityId::new(index, 0)
        }
    }

    /// Release a slot and bump its generation so outstanding handles go stale.
    ///
    /// Returns `false` if `id` was already released or is stale.
    pub fn release(&mut self, id: EntityId) -> bool {
        if !self.is_occupied(id) {
            return false;
        }
        let idx = id.index() as usize;
        self.occupied[idx] = false;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free_indices.push_back(id.index());
        true
    }

    /// Whether `id` names a currently occupied slot of the same generation.
    pub fn is_occupied(&self, id: EntityId) -> bool {
        let idx = id.index() as usize;
        idx < self.generations.len()
            && self.occupied[idx]
            && self.generations[idx] == id.generation()
    }

    /// Total number of slots ever created (occupied or free).
    pub fn capacity(&self) -> usize {
        self.generations.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
