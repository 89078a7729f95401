//! Entity identifiers and the bounded identity pool.
//!
//! An [`EntityId`] is a plain `u32` handle in `[0, capacity)`. Destroyed ids
//! are recycled verbatim through a FIFO queue, so a handle that outlives its
//! entity may later refer to a different one; callers that need to revalidate
//! do so through [`EntityPool::is_alive`].

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::RegistryError;

// ---------------------------------------------------------------------------
// EntityId
// ---------------------------------------------------------------------------

/// An opaque entity identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Construct an `EntityId` from a raw index.
    #[inline]
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw index of this id.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// EntityPool
// ---------------------------------------------------------------------------

/// Allocates and recycles [`EntityId`]s under a fixed capacity.
///
/// Ids are issued sequentially until `capacity` distinct ids exist; after
/// that, only recycled ids can be handed out. The counter lives on the pool
/// instance, so independent pools never share id sequences.
#[derive(Debug, Default)]
pub struct EntityPool {
    /// Maximum number of concurrently live ids.
    capacity: u32,
    /// Count of distinct ids ever issued; the next fresh id.
    issued: u32,
    /// Liveness flag per issued id, indexed by `EntityId::index`.
    alive: Vec<bool>,
    /// Recyclable ids in destruction order (FIFO).
    recycled: VecDeque<u32>,
}

impl EntityPool {
    /// Create an empty pool with capacity zero.
    ///
    /// Until [`set_capacity`](Self::set_capacity) is called, every
    /// [`create`](Self::create) fails with
    /// [`RegistryError::StorageExhausted`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the maximum number of concurrently live ids.
    ///
    /// Raising the capacity is always allowed. Lowering it clamps to the
    /// number of ids already issued, so already-live ids never fall outside
    /// `[0, capacity)`.
    pub fn set_capacity(&mut self, capacity: u32) {
        self.capacity = capacity.max(self.issued);
    }

    /// Allocate an id.
    ///
    /// Issues the next sequential id while fewer than `capacity` ids exist,
    /// then falls back to the front of the recycle queue.
    pub fn create(&mut self) -> Result<EntityId, RegistryError> {
        if self.issued < self.capacity {
            let index = self.issued;
            self.issued += 1;
            self.alive.push(true);
            Ok(EntityId::new(index))
        } else if let Some(index) = self.recycled.pop_front() {
            self.alive[index as usize] = true;
            Ok(EntityId::new(index))
        } else {
            Err(RegistryError::StorageExhausted {
                capacity: self.capacity,
            })
        }
    }

    /// Destroy an id, returning it to the recycle queue.
    ///
    /// Returns `true` if the id was live. A dead or never-issued id leaves
    /// the pool untouched and returns `false`.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        match self.alive.get_mut(id.as_usize()) {
            Some(flag) if *flag => {
                *flag = false;
                self.recycled.push_back(id.index());
                true
            }
            _ => false,
        }
    }

    /// Whether `id` is currently live.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.alive.get(id.as_usize()).copied().unwrap_or(false)
    }

    /// Number of currently live ids.
    pub fn live_count(&self) -> usize {
        // Every issued id is either live or sitting in the recycle queue.
        self.issued as usize - self.recycled.len()
    }

    /// The configured capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
