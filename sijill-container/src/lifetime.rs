//! Service lifetimes.
//!
//! - [`Lifetime::Transient`]: a new instance on every resolve
//! - [`Lifetime::Singleton`]: one instance per service key, built on first
//!   resolve and kept until the container is dropped

use std::fmt;

use serde::{Deserialize, Serialize};

/// Controls whether resolving a service reuses a cached instance.
///
/// # Examples
/// ```
/// use sijill_container::lifetime::Lifetime;
///
/// assert_eq!(Lifetime::default(), Lifetime::Transient);
/// assert!(Lifetime::Singleton.is_cached());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// New instance created on every resolve call. Never cached.
    #[default]
    Transient,

    /// One instance per service key.
    ///
    /// Cached under the service key (not the implementation), so two
    /// service keys bound to the same implementation get two instances.
    Singleton,
}

impl Lifetime {
    /// Returns `true` if resolved instances are kept in the instance cache.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, Lifetime::Singleton)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Transient => write!(f, "Transient"),
            Lifetime::Singleton => write!(f, "Singleton"),
        }
    }
}
