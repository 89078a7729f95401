//! The [`Registry`] is the public orchestrator. It owns the entity pool, one
//! slot store per registered kind, and the component index, and keeps the
//! three consistent across every lifecycle operation.

use std::any::TypeId;

use crate::entity::{EntityId, EntityPool};
use crate::index::ComponentIndex;
use crate::kind::{KindId, KindRegistry};
use crate::store::{ErasedStore, SlotStore};
use crate::RegistryError;

/// Fixed-capacity entity/component storage.
///
/// Callers go through the registry for everything: identity lifecycle,
/// component attach/detach, and component reads. The registry fans calls out
/// to the entity pool and the relevant kind's slot store and keeps the
/// component index consistent, so the cross-referential invariants hold at
/// every public-API return:
///
/// - every `(entity, kind)` index entry points at a live slot,
/// - every free-listed slot is tombstoned and referenced by no entity,
/// - a live id is never issued twice.
///
/// The registry is single-threaded and not internally synchronized; callers
/// that share one across threads must wrap it in a single exclusive lock.
pub struct Registry {
    pool: EntityPool,
    kinds: KindRegistry,
    /// One store per kind, indexed by `KindId`.
    stores: Vec<Box<dyn ErasedStore>>,
    index: ComponentIndex,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("entity_count", &self.pool.live_count())
            .field("kind_count", &self.kinds.len())
            .finish()
    }
}

impl Registry {
    /// Create an empty registry.
    ///
    /// The entity capacity starts at zero; call
    /// [`set_entity_capacity`](Self::set_entity_capacity) before the first
    /// [`create`](Self::create).
    pub fn new() -> Self {
        Self {
            pool: EntityPool::new(),
            kinds: KindRegistry::new(),
            stores: Vec::new(),
            index: ComponentIndex::new(),
        }
    }

    // -- configuration ------------------------------------------------------

    /// Fix the maximum number of concurrently live entities.
    ///
    /// Intended to be called once, before the first [`create`](Self::create).
    /// Lowering the capacity clamps to the number of ids already issued.
    pub fn set_entity_capacity(&mut self, capacity: u32) {
        self.pool.set_capacity(capacity);
    }

    /// Register a component kind under `name` with value type `T`.
    ///
    /// Idempotent: registering the same `(name, T)` pair again returns the
    /// existing [`KindId`]. The kind's slot store is created on first
    /// registration.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered with a different value type.
    pub fn register_kind<T>(&mut self, name: &str) -> KindId
    where
        T: Send + Sync + 'static,
    {
        let id = self.kinds.register::<T>(name);
        if id.as_usize() == self.stores.len() {
            self.stores.push(Box::new(SlotStore::<T>::new()));
        }
        id
    }

    /// Pre-allocate room for `capacity` total slots in the named kind's
    /// store.
    ///
    /// A performance hint only: it never caps or shrinks the dense array and
    /// never fails. Silently does nothing if `name` is not a registered kind.
    pub fn set_kind_capacity(&mut self, name: &str, capacity: usize) {
        if let Some(id) = self.kinds.lookup(name) {
            let store = &mut self.stores[id.as_usize()];
            store.reserve(capacity.saturating_sub(store.len()));
        }
    }

    // -- entity lifecycle ---------------------------------------------------

    /// Create an entity with an empty component row.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::StorageExhausted`] when the pool is at
    /// capacity with no recyclable id.
    pub fn create(&mut self) -> Result<EntityId, RegistryError> {
        let entity = self.pool.create()?;
        self.index.create_row(entity);
        Ok(entity)
    }

    /// Destroy an entity: release every component slot it owned, drop its
    /// component row, and return its id to the pool.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::EntityNotAlive`] for a dead or never-issued
    /// id, with no state change -- destroying twice leaves the registry
    /// observably identical to destroying once.
    pub fn destroy(&mut self, entity: EntityId) -> Result<(), RegistryError> {
        if !self.pool.is_alive(entity) {
            return Err(RegistryError::EntityNotAlive { entity });
        }
        for (kind, slot) in self.index.drop_row(entity) {
            self.stores[kind.as_usize()].release(slot);
        }
        self.pool.destroy(entity);
        Ok(())
    }

    /// Whether `entity` is currently live.
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.pool.is_alive(entity)
    }

    // -- component attach / detach ------------------------------------------

    /// Attach a component of the named kind to an entity.
    ///
    /// Attaching a kind the entity already carries is rejected with no side
    /// effect.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownKind`] if `kind` is not registered,
    /// [`RegistryError::KindTypeMismatch`] if `T` is not the kind's
    /// registered value type, [`RegistryError::EntityNotAlive`] for a dead
    /// entity, and [`RegistryError::ComponentAlreadyPresent`] for a
    /// duplicate attach.
    pub fn add_component<T>(
        &mut self,
        entity: EntityId,
        kind: &str,
        value: T,
    ) -> Result<(), RegistryError>
    where
        T: Send + Sync + 'static,
    {
        let id = self.lookup_kind(kind)?;
        let info = self.kinds.info(id);
        if info.type_id != TypeId::of::<T>() {
            return Err(RegistryError::KindTypeMismatch {
                kind: kind.to_owned(),
                expected: info.type_name,
                requested: std::any::type_name::<T>(),
            });
        }
        if !self.pool.is_alive(entity) {
            return Err(RegistryError::EntityNotAlive { entity });
        }
        if self.index.slot_of(entity, id).is_some() {
            return Err(RegistryError::ComponentAlreadyPresent {
                entity,
                kind: kind.to_owned(),
            });
        }

        let store = self.stores[id.as_usize()]
            .as_any_mut()
            .downcast_mut::<SlotStore<T>>()
            .expect("kind type checked before downcast");
        let slot = store.insert(value);
        let bound = self.index.bind(entity, id, slot);
        debug_assert!(bound, "bind after guards cannot fail");
        Ok(())
    }

    /// Detach the named kind from an entity, releasing its slot.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownKind`] if `kind` is not registered,
    /// [`RegistryError::EntityNotAlive`] for a dead entity, and
    /// [`RegistryError::ComponentNotPresent`] if the entity does not carry
    /// the kind.
    pub fn remove_component(&mut self, entity: EntityId, kind: &str) -> Result<(), RegistryError> {
        let id = self.lookup_kind(kind)?;
        if !self.pool.is_alive(entity) {
            return Err(RegistryError::EntityNotAlive { entity });
        }
        let slot = self
            .index
            .unbind(entity, id)
            .ok_or_else(|| RegistryError::ComponentNotPresent {
                entity,
                kind: kind.to_owned(),
            })?;
        let released = self.stores[id.as_usize()].release(slot);
        debug_assert!(released, "index never references a dead slot");
        Ok(())
    }

    // -- component access ---------------------------------------------------

    /// The entity's value for the named kind.
    ///
    /// `None` for dead entities, unknown kinds, kinds the entity does not
    /// carry, or a `T` that is not the kind's value type.
    pub fn get_component<T: 'static>(&self, entity: EntityId, kind: &str) -> Option<&T> {
        let id = self.kinds.lookup(kind)?;
        if !self.pool.is_alive(entity) {
            return None;
        }
        let slot = self.index.slot_of(entity, id)?;
        let store = self.stores[id.as_usize()]
            .as_any()
            .downcast_ref::<SlotStore<T>>()?;
        store.get(slot)
    }

    /// Mutable access to the entity's value for the named kind.
    pub fn get_component_mut<T: 'static>(
        &mut self,
        entity: EntityId,
        kind: &str,
    ) -> Option<&mut T> {
        let id = self.kinds.lookup(kind)?;
        if !self.pool.is_alive(entity) {
            return None;
        }
        let slot = self.index.slot_of(entity, id)?;
        let store = self.stores[id.as_usize()]
            .as_any_mut()
            .downcast_mut::<SlotStore<T>>()?;
        store.get_mut(slot)
    }

    /// Whether the entity currently carries the named kind.
    pub fn has_component(&self, entity: EntityId, kind: &str) -> bool {
        let Some(id) = self.kinds.lookup(kind) else {
            return false;
        };
        self.pool.is_alive(entity) && self.index.slot_of(entity, id).is_some()
    }

    // -- bookkeeping --------------------------------------------------------

    /// Number of currently live entities.
    pub fn entity_count(&self) -> usize {
        self.pool.live_count()
    }

    /// The configured entity capacity.
    pub fn entity_capacity(&self) -> u32 {
        self.pool.capacity()
    }

    /// Number of registered kinds.
    pub fn kind_count(&self) -> usize {
        self.kinds.len()
    }

    /// Dense-array length of the named kind's store, tombstones included.
    pub fn kind_len(&self, name: &str) -> Option<usize> {
        let id = self.kinds.lookup(name)?;
        Some(self.stores[id.as_usize()].len())
    }

    /// Number of live slots in the named kind's store.
    pub fn kind_live_count(&self, name: &str) -> Option<usize> {
        let id = self.kinds.lookup(name)?;
        Some(self.stores[id.as_usize()].live_count())
    }

    /// Number of free-listed slots in the named kind's store.
    pub fn kind_free_count(&self, name: &str) -> Option<usize> {
        let id = self.kinds.lookup(name)?;
        Some(self.stores[id.as_usize()].free_count())
    }

    fn lookup_kind(&self, name: &str) -> Result<KindId, RegistryError> {
        self.kinds
            .lookup(name)
            .ok_or_else(|| RegistryError::UnknownKind {
                name: name.to_owned(),
                registered: self.kinds.registered_names().join(", "),
            })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
