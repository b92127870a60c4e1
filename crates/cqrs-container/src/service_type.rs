//! Service type tags
//!
//! A [`ServiceType`] stands in for a runtime `Type` object: it identifies a
//! service interface (usually `dyn Trait`) or a concrete type by `TypeId`
//! and keeps the type name around for diagnostics.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a registrable service
#[derive(Clone, Copy)]
pub struct ServiceType {
    id: TypeId,
    name: &'static str,
}

impl ServiceType {
    /// Tag for the type `T`, which may be unsized (`dyn Trait`)
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Underlying `TypeId`
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ServiceType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceType {}

impl Hash for ServiceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceType").field(&self.name).finish()
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
