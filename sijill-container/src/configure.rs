//! Post-construction configuration.
//!
//! A registration may attach a callback to its implementation type. The
//! resolver runs it once per construction with a [`Configurator`] holding
//! the new instance and the active [`Resolver`].
//!
//! Callbacks are stored in a map keyed by type, one typed slot per
//! implementation, so a stored callback always matches the instance it is
//! given.

use std::sync::Arc;

use anymap2::SendSyncAnyMap;

use crate::error::Result;
use crate::resolver::Resolver;

/// A configuration callback for implementation `I`.
pub type ConfigureFn<I> = Arc<dyn Fn(&Configurator<'_, I>) -> Result<()> + Send + Sync>;

/// Context handed to a configuration callback.
///
/// `target` is the same allocation the resolved service points to, so
/// mutations must go through interior mutability. Resolving through
/// [`Configurator::resolve`] shares the current resolution path and
/// instance cache.
pub struct Configurator<'r, I> {
    target: Arc<I>,
    resolver: &'r Resolver<'r>,
}

impl<'r, I> Configurator<'r, I> {
    pub(crate) fn new(target: Arc<I>, resolver: &'r Resolver<'r>) -> Self {
        Self { target, resolver }
    }

    /// The freshly constructed instance.
    pub fn target(&self) -> &Arc<I> {
        &self.target
    }

    pub fn resolver(&self) -> &'r Resolver<'r> {
        self.resolver
    }

    /// Shorthand for `self.resolver().resolve::<S>()`.
    pub fn resolve<S: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<S>> {
        self.resolver.resolve::<S>()
    }
}

struct Slot<I: 'static>(Option<ConfigureFn<I>>);

/// Configuration callbacks keyed by implementation type.
pub(crate) struct ConfigurationStore {
    slots: SendSyncAnyMap,
}

impl ConfigurationStore {
    pub fn new() -> Self {
        Self {
            slots: SendSyncAnyMap::new(),
        }
    }

    /// Sets (or clears, with `None`) the callback for `I`.
    pub fn set<I: Send + Sync + 'static>(&mut self, configure: Option<ConfigureFn<I>>) {
        self.slots.insert(Slot(configure));
    }

    pub fn get<I: Send + Sync + 'static>(&self) -> Option<ConfigureFn<I>> {
        self.slots.get::<Slot<I>>().and_then(|slot| slot.0.clone())
    }

    /// Number of implementations that have a slot, set or cleared.
    pub fn len(&self) -> usize {
        self.slots.len()
    }
}
