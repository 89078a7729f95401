//! Component kind registration and metadata.
//!
//! Component kinds are identified by a runtime string name so that kinds can
//! be registered dynamically, one slot store per kind. Registration interns
//! the name into a dense [`KindId`], which is the key every other module uses
//! internally; the string only appears at the public API surface.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// KindId
// ---------------------------------------------------------------------------

/// Opaque, lightweight identifier for a registered component kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KindId(pub(crate) u32);

impl KindId {
    #[inline]
    pub(crate) fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KindId({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// KindInfo
// ---------------------------------------------------------------------------

/// Metadata about a registered component kind.
#[derive(Debug, Clone)]
pub struct KindInfo {
    /// Unique id assigned at registration time.
    pub id: KindId,
    /// The runtime name the kind was registered under.
    pub name: String,
    /// Rust `TypeId` of the value type, checked on typed access.
    pub type_id: TypeId,
    /// Value type name, for error messages.
    pub type_name: &'static str,
}

// ---------------------------------------------------------------------------
// KindRegistry
// ---------------------------------------------------------------------------

/// Registry interning kind names to [`KindId`]s and their metadata.
///
/// Registration is idempotent for the same `(name, type)` pair; re-registering
/// a name with a different Rust type panics.
#[derive(Debug, Default)]
pub struct KindRegistry {
    /// Name -> KindId for lookup by string name.
    by_name: HashMap<String, KindId>,
    /// Indexed by `KindId.0`.
    infos: Vec<KindInfo>,
}

impl KindRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component kind under the given `name` with value type `T`.
    ///
    /// If `name` is already registered with the same type, the existing
    /// [`KindId`] is returned.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered with a different value type.
    pub fn register<T: 'static>(&mut self, name: &str) -> KindId {
        if let Some(&existing) = self.by_name.get(name) {
            let info = &self.infos[existing.as_usize()];
            if info.type_id != TypeId::of::<T>() {
                panic!(
                    "component kind '{}' is already registered with value type {}",
                    name, info.type_name
                );
            }
            return existing;
        }

        let id = KindId(self.infos.len() as u32);
        self.infos.push(KindInfo {
            id,
            name: name.to_owned(),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        });
        self.by_name.insert(name.to_owned(), id);
        id
    }

    /// Look up a kind by its registered name.
    pub fn lookup(&self, name: &str) -> Option<KindId> {
        self.by_name.get(name).copied()
    }

    /// Metadata for a registered kind.
    pub fn info(&self, id: KindId) -> &KindInfo {
        &self.infos[id.as_usize()]
    }

    /// Total number of registered kinds.
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Whether any kinds have been registered.
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Names of all registered kinds, sorted. Used in error messages.
    pub fn registered_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
