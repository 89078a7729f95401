//! Felt Registry -- fixed-capacity, slot-based entity/component storage.
//!
//! This crate provides the storage core of a 2D table-simulation engine.
//! Entity identities come from a bounded pool that recycles destroyed ids
//! verbatim; each registered component kind owns a dense, index-stable slot
//! store with free-list reuse; and a per-entity component index cross-links
//! the two by raw integer indices, never pointers. Rendering and scripting
//! layers consume the handles this core produces and are deliberately
//! outside it.
//!
//! # Quick Start
//!
//! ```
//! use felt_registry::prelude::*;
//!
//! # fn main() -> Result<(), RegistryError> {
//! let mut registry = Registry::new();
//! registry.set_entity_capacity(64);
//! registry.register_kind::<Position>("position");
//! registry.register_kind::<Velocity>("velocity");
//!
//! let card = registry.create()?;
//! registry.add_component(card, "position", Position { x: 120.0, y: 80.0 })?;
//! registry.add_component(card, "velocity", Velocity { dx: 1.0, dy: 0.0 })?;
//!
//! if let Some(pos) = registry.get_component_mut::<Position>(card, "position") {
//!     pos.x += 1.0;
//! }
//! assert_eq!(
//!     registry.get_component::<Position>(card, "position"),
//!     Some(&Position { x: 121.0, y: 80.0 })
//! );
//!
//! registry.destroy(card)?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod components;
pub mod entity;
pub mod index;
pub mod kind;
pub mod registry;
pub mod store;

use crate::entity::EntityId;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by registry operations.
///
/// Every rejected operation is an explicit variant rather than a silent
/// no-op, so callers can distinguish them. A rejected operation mutates
/// nothing.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The entity pool is at capacity with no recyclable id.
    #[error("entity pool exhausted: all {capacity} ids are live")]
    StorageExhausted { capacity: u32 },

    /// The entity is dead or was never issued.
    #[error("entity {entity} is not alive")]
    EntityNotAlive { entity: EntityId },

    /// A component kind was named that has not been registered.
    #[error("component kind '{name}' not registered. Registered kinds: [{registered}]")]
    UnknownKind { name: String, registered: String },

    /// The value type does not match the kind's registered type.
    #[error("component kind '{kind}' stores values of type {expected}, not {requested}")]
    KindTypeMismatch {
        kind: String,
        expected: &'static str,
        requested: &'static str,
    },

    /// The entity already carries this kind.
    #[error("entity {entity} already has a '{kind}' component")]
    ComponentAlreadyPresent { entity: EntityId, kind: String },

    /// The entity does not carry this kind.
    #[error("entity {entity} has no '{kind}' component")]
    ComponentNotPresent { entity: EntityId, kind: String },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::components::{
        BoundingBox, BoundingCircle, Health, Position, SpriteRect, Velocity,
    };
    pub use crate::entity::EntityId;
    pub use crate::kind::KindId;
    pub use crate::registry::Registry;
    pub use crate::RegistryError;
}

// ---------------------------------------------------------------------------
// Integration Tests
// ---------------------------------------------------------------------------
