//! Dependency identification keys.
//!
//! [`DependencyKey`] identifies both sides of a registration: the service
//! contract that callers resolve (often a `dyn Trait`) and the concrete
//! implementation that gets built.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use sijill_support::rendering::shorten_type_name;

/// Uniquely identifies a service or implementation type.
///
/// Equality and hashing use only the [`TypeId`]; the type name is kept for
/// diagnostics.
///
/// # Examples
/// ```
/// use sijill_container::key::DependencyKey;
///
/// trait Clock {}
///
/// let key = DependencyKey::of::<dyn Clock>();
/// assert!(key.type_name().ends_with("Clock"));
/// assert_eq!(key, DependencyKey::of::<dyn Clock>());
/// assert_ne!(key, DependencyKey::of::<String>());
/// ```
#[derive(Clone)]
pub struct DependencyKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl DependencyKey {
    /// Creates the key for type `T`. Unsized types (trait objects) work.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Returns the fully qualified type name.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the type name without module paths.
    pub fn short_name(&self) -> String {
        shorten_type_name(self.type_name)
    }
}

impl PartialEq for DependencyKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for DependencyKey {}

impl Hash for DependencyKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DependencyKey({})", self.type_name)
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}
