//! Per-entity component bookkeeping.
//!
//! The [`ComponentIndex`] is the cross-link between entities and slot
//! storage: for each live entity it holds a row mapping [`KindId`] to the
//! slot index carrying that entity's value for the kind. Rows live in a
//! direct array indexed by entity id, so every lookup is O(1) with no
//! scanning.

use std::collections::HashMap;

use crate::entity::EntityId;
use crate::kind::KindId;

/// One entity's `kind -> slot` mapping.
type Row = HashMap<KindId, u32>;

/// Bidirectional bookkeeping between entities and component slots.
#[derive(Debug, Default)]
pub struct ComponentIndex {
    /// Indexed by `EntityId::index`; `None` for entities without a row.
    rows: Vec<Option<Row>>,
}

impl ComponentIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an empty row for a newly created entity.
    pub fn create_row(&mut self, entity: EntityId) {
        let idx = entity.as_usize();
        if idx >= self.rows.len() {
            self.rows.resize_with(idx + 1, || None);
        }
        debug_assert!(self.rows[idx].is_none(), "row already exists for {entity}");
        self.rows[idx] = Some(Row::new());
    }

    /// Remove the row for `entity`, returning every `(kind, slot)` pair it
    /// held. The caller must release each returned slot in its store.
    pub fn drop_row(&mut self, entity: EntityId) -> Vec<(KindId, u32)> {
        self.rows
            .get_mut(entity.as_usize())
            .and_then(Option::take)
            .map(|row| row.into_iter().collect())
            .unwrap_or_default()
    }

    /// Record that `entity`'s value for `kind` lives in `slot`.
    ///
    /// Returns `false` without side effect if the entity has no row or is
    /// already bound for this kind.
    pub fn bind(&mut self, entity: EntityId, kind: KindId, slot: u32) -> bool {
        let Some(Some(row)) = self.rows.get_mut(entity.as_usize()) else {
            return false;
        };
        if row.contains_key(&kind) {
            return false;
        }
        row.insert(kind, slot);
        true
    }

    /// Remove and return the slot bound to `(entity, kind)`, if any.
    pub fn unbind(&mut self, entity: EntityId, kind: KindId) -> Option<u32> {
        match self.rows.get_mut(entity.as_usize()) {
            Some(Some(row)) => row.remove(&kind),
            _ => None,
        }
    }

    /// The slot bound to `(entity, kind)`, if any.
    pub fn slot_of(&self, entity: EntityId, kind: KindId) -> Option<u32> {
        match self.rows.get(entity.as_usize()) {
            Some(Some(row)) => row.get(&kind).copied(),
            _ => None,
        }
    }

    /// Whether `entity` currently has a row.
    pub fn has_row(&self, entity: EntityId) -> bool {
        matches!(self.rows.get(entity.as_usize()), Some(Some(_)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
