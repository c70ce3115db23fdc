//! Container settings.
//!
//! Settings are plain serde structs so a host application can load them
//! from whatever configuration format it already uses.

use serde::{Deserialize, Serialize};

use crate::lifetime::Lifetime;

/// Default limit on nested resolutions per top-level `resolve` call.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Tunables for a [`Container`](crate::container::Container).
///
/// # Examples
/// ```
/// use sijill_container::settings::ContainerSettings;
/// use sijill_container::lifetime::Lifetime;
///
/// let settings = ContainerSettings {
///     default_lifetime: Lifetime::Singleton,
///     ..ContainerSettings::default()
/// };
/// assert_eq!(settings.max_depth, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    /// Longest resolution path allowed before failing with
    /// [`SijillError::DepthExceeded`](crate::error::SijillError::DepthExceeded).
    pub max_depth: usize,

    /// Lifetime used by [`Container::bind`](crate::container::Container::bind).
    pub default_lifetime: Lifetime,
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            default_lifetime: Lifetime::Transient,
        }
    }
}
