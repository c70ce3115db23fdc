//! The resolution engine.
//!
//! A [`Resolver`] is a short-lived context created for each top-level
//! `resolve` call. It borrows the container's stores and tracks the keys
//! currently being built, which is how dependency cycles are reported as
//! errors instead of overflowing the stack.
//!
//! # Algorithm
//! For a service key:
//! 1. Cached singleton → return it.
//! 2. Look up the registration (`NotRegistered` if missing).
//! 3. Push the key on the resolution path (`CircularDependency` if it is
//!    already there since the last callback boundary).
//! 4. Activate: resolve constructor parameters left to right, construct,
//!    inject properties.
//! 5. Singleton → cache under the service key.
//! 6. Run the implementation's configuration callback, if any, behind a
//!    callback boundary.
//!
//! A configuration callback runs once its target is fully built, so keys
//! resolved from inside it start a fresh cycle scope. The depth limit still
//! counts the whole path, which stops a transient callback that keeps
//! re-resolving its own service.

use std::cell::RefCell;
use std::sync::Arc;

use tracing::trace;

use crate::configure::ConfigureFn;
use crate::container::Container;
use crate::error::{CircularDependencyError, NotRegisteredError, Result, SijillError};
use crate::instance::{Instance, restore};
use crate::key::DependencyKey;

/// Resolution context handed to configuration callbacks.
pub struct Resolver<'c> {
    container: &'c Container,
    path: RefCell<Vec<DependencyKey>>,
    boundaries: RefCell<Vec<usize>>,
}

impl<'c> Resolver<'c> {
    pub(crate) fn new(container: &'c Container) -> Self {
        Self {
            container,
            path: RefCell::new(Vec::new()),
            boundaries: RefCell::new(Vec::new()),
        }
    }

    /// Resolves service `S`.
    pub fn resolve<S: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<S>> {
        let key = DependencyKey::of::<S>();
        let instance = self.resolve_key(&key)?;
        restore::<S>(&instance, &key)
    }

    /// Keys currently under construction, outermost first.
    pub fn path(&self) -> Vec<DependencyKey> {
        self.path.borrow().clone()
    }

    /// Resolves `key` to its type-erased instance.
    pub fn resolve_key(&self, key: &DependencyKey) -> Result<Instance> {
        if let Some(cached) = self.container.cache.get(key) {
            trace!(key = %key, "Cache hit");
            return Ok(cached);
        }

        let registration = self.container.registry.get(key).ok_or_else(|| {
            SijillError::NotRegistered(NotRegisteredError {
                requested: key.clone(),
                required_by: self.path.borrow().last().cloned(),
                suggestions: self.container.registry.suggestions_for(key),
            })
        })?;

        let _frame = self.enter(key)?;
        trace!(
            service = %key,
            implementation = %registration.implementation,
            lifetime = %registration.lifetime,
            "Activating"
        );

        let activation = (registration.activator)(self)?;

        if registration.lifetime.is_cached() {
            if let Some(existing) = self
                .container
                .cache
                .insert_if_absent(key.clone(), Arc::clone(&activation.instance))
            {
                return Ok(existing);
            }
        }

        if let Some(configure) = activation.configure {
            trace!(implementation = %registration.implementation, "Running configuration callback");
            let boundary = self.boundary();
            let outcome = configure(self);
            drop(boundary);
            if let Err(err) = outcome {
                if registration.lifetime.is_cached() {
                    self.container.cache.remove(key);
                }
                return Err(err);
            }
        }

        Ok(activation.instance)
    }

    pub(crate) fn configuration<I: Send + Sync + 'static>(&self) -> Option<ConfigureFn<I>> {
        self.container.configurations.get::<I>()
    }

    fn enter(&self, key: &DependencyKey) -> Result<Frame<'_>> {
        let mut path = self.path.borrow_mut();
        let scope = self.boundaries.borrow().last().copied().unwrap_or(0);

        if let Some(offset) = path[scope..].iter().position(|k| k == key) {
            let mut chain = path[scope + offset..].to_vec();
            chain.push(key.clone());
            return Err(SijillError::CircularDependency(CircularDependencyError { chain }));
        }

        let limit = self.container.settings.max_depth;
        if path.len() >= limit {
            return Err(SijillError::DepthExceeded {
                key: key.clone(),
                limit,
            });
        }

        path.push(key.clone());
        Ok(Frame { path: &self.path })
    }

    fn boundary(&self) -> Boundary<'_> {
        let depth = self.path.borrow().len();
        self.boundaries.borrow_mut().push(depth);
        Boundary {
            boundaries: &self.boundaries,
        }
    }
}

impl std::fmt::Debug for Resolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("path", &self.path.borrow())
            .field("boundaries", &self.boundaries.borrow())
            .finish()
    }
}

/// Pops its key off the resolution path when dropped.
struct Frame<'r> {
    path: &'r RefCell<Vec<DependencyKey>>,
}

impl Drop for Frame<'_> {
    fn drop(&mut self) {
        self.path.borrow_mut().pop();
    }
}

/// Marks where a configuration callback started; cycle checks look no
/// further back than the innermost boundary.
struct Boundary<'r> {
    boundaries: &'r RefCell<Vec<usize>>,
}

impl Drop for Boundary<'_> {
    fn drop(&mut self) {
        self.boundaries.borrow_mut().pop();
    }
}
