//! Service registry: service key → how to build it.
//!
//! Each [`Registration`] carries a type-erased activator produced from a
//! [`Component`] at registration time. Re-registering a service key
//! replaces the previous entry.

use std::collections::HashMap;
use std::sync::Arc;

use sijill_support::rendering::suggest_similar;
use tracing::debug;

use crate::component::{Component, Provides};
use crate::configure::Configurator;
use crate::error::Result;
use crate::instance::{Instance, erase};
use crate::key::DependencyKey;
use crate::lifetime::Lifetime;
use crate::resolver::Resolver;

pub(crate) const MAX_SUGGESTIONS: usize = 3;

/// Deferred configuration step of an activation.
pub(crate) type PendingConfigure = Box<dyn FnOnce(&Resolver<'_>) -> Result<()>>;

/// Output of an activator: the service handle plus its pending
/// configuration callback, if any.
pub(crate) struct Activation {
    pub instance: Instance,
    pub configure: Option<PendingConfigure>,
}

/// Builds, injects and upcasts one implementation.
pub(crate) type ActivatorFn = Arc<dyn Fn(&Resolver<'_>) -> Result<Activation> + Send + Sync>;

fn activator<F>(activate: F) -> ActivatorFn
where
    F: Fn(&Resolver<'_>) -> Result<Activation> + Send + Sync + 'static,
{
    Arc::new(activate)
}

fn pending<F>(configure: F) -> PendingConfigure
where
    F: FnOnce(&Resolver<'_>) -> Result<()> + 'static,
{
    Box::new(configure)
}

/// Registration entry for a single service key.
#[derive(Clone)]
pub(crate) struct Registration {
    pub service: DependencyKey,
    pub implementation: DependencyKey,
    pub lifetime: Lifetime,
    pub dependencies: Vec<DependencyKey>,
    pub activator: ActivatorFn,
}

impl Registration {
    /// Describes `component` as the implementation of service `S`.
    pub fn new<S, I>(lifetime: Lifetime, component: Component<I>) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: Provides<S>,
    {
        let dependencies = component.dependencies();

        let activator = activator(move |resolver: &Resolver<'_>| {
            let target = Arc::new(component.activate(resolver)?);
            let service: Arc<S> = <I as Provides<S>>::provide(Arc::clone(&target));

            let configure = resolver.configuration::<I>().map(|callback| {
                pending(move |resolver: &Resolver<'_>| {
                    callback(&Configurator::new(target, resolver))
                })
            });

            Ok(Activation {
                instance: erase(service),
                configure,
            })
        });

        Self {
            service: DependencyKey::of::<S>(),
            implementation: DependencyKey::of::<I>(),
            lifetime,
            dependencies,
            activator,
        }
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("service", &self.service)
            .field("implementation", &self.implementation)
            .field("lifetime", &self.lifetime)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

/// Stores all service registrations.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    registrations: HashMap<DependencyKey, Registration>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `registration`, returning the one it replaced.
    pub fn register(&mut self, registration: Registration) -> Option<Registration> {
        let key = registration.service.clone();
        debug!(
            service = %key,
            implementation = %registration.implementation,
            lifetime = %registration.lifetime,
            "Registered service"
        );

        let previous = self.registrations.insert(key, registration);
        if let Some(ref previous) = previous {
            debug!(
                service = %previous.service,
                implementation = %previous.implementation,
                lifetime = %previous.lifetime,
                "Replaced previous registration"
            );
        }
        previous
    }

    pub fn get(&self, key: &DependencyKey) -> Option<&Registration> {
        self.registrations.get(key)
    }

    pub fn all_registrations(&self) -> &HashMap<DependencyKey, Registration> {
        &self.registrations
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Registered service names resembling `key`, best match first.
    pub fn suggestions_for(&self, key: &DependencyKey) -> Vec<String> {
        let names: Vec<&str> = self
            .registrations
            .keys()
            .filter(|k| *k != key)
            .map(DependencyKey::type_name)
            .collect();
        suggest_similar(key.type_name(), &names, MAX_SUGGESTIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Constructor;

    #[derive(Default)]
    struct Database;
    #[derive(Default)]
    struct DatabasePool;

    fn make_reg<T: Default + Send + Sync + 'static>(lifetime: Lifetime) -> Registration {
        Registration::new::<T, T>(lifetime, Component::new(Constructor::from_default()))
    }

    #[test]
    fn register_and_get() {
        let mut reg = Registry::new();
        reg.register(make_reg::<Database>(Lifetime::Singleton));

        let found = reg.get(&DependencyKey::of::<Database>()).unwrap();
        assert_eq!(found.lifetime, Lifetime::Singleton);
        assert_eq!(found.implementation, DependencyKey::of::<Database>());
    }

    #[test]
    fn reregister_replaces() {
        let mut reg = Registry::new();
        assert!(reg.register(make_reg::<Database>(Lifetime::Singleton)).is_none());

        let previous = reg.register(make_reg::<Database>(Lifetime::Transient)).unwrap();
        assert_eq!(previous.lifetime, Lifetime::Singleton);
        assert_eq!(reg.len(), 1);
        assert_eq!(
            reg.get(&DependencyKey::of::<Database>()).unwrap().lifetime,
            Lifetime::Transient
        );
    }

    #[test]
    fn suggestions_exclude_requested_key() {
        let mut reg = Registry::new();
        reg.register(make_reg::<Database>(Lifetime::Singleton));
        reg.register(make_reg::<DatabasePool>(Lifetime::Singleton));

        let suggestions = reg.suggestions_for(&DependencyKey::of::<Database>());
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].ends_with("DatabasePool"));
    }

    #[test]
    fn registration_records_dependencies() {
        struct Service;
        let reg = Registration::new::<Service, Service>(
            Lifetime::Transient,
            Component::new(Constructor::new(|(_,): (Arc<Database>,)| Service)),
        );
        assert_eq!(reg.dependencies, vec![DependencyKey::of::<Database>()]);
    }
}
