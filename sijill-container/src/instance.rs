//! Type-erased instance handles.
//!
//! Every resolved service is an `Arc<S>`. Inside the container it travels
//! as an [`Instance`] wrapping that `Arc<S>`, so cache hits and
//! constructor arguments can be cloned without knowing `S`.

use std::any::{Any, type_name};
use std::sync::Arc;

use crate::error::{Result, SijillError};
use crate::key::DependencyKey;

/// A cloneable, type-erased service handle (an `Arc<S>` inside an `Arc`).
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Erases a service handle.
pub(crate) fn erase<S: ?Sized + Send + Sync + 'static>(service: Arc<S>) -> Instance {
    Arc::new(service)
}

/// Recovers the `Arc<S>` stored in `instance`.
pub(crate) fn restore<S: ?Sized + Send + Sync + 'static>(
    instance: &Instance,
    key: &DependencyKey,
) -> Result<Arc<S>> {
    instance
        .downcast_ref::<Arc<S>>()
        .cloned()
        .ok_or_else(|| SijillError::type_mismatch(key, type_name::<Arc<S>>()))
}
