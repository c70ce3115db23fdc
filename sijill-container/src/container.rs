//! # The Container — heart of Sijill
//!
//! An owned context bundling the three stores the resolver works on:
//!
//! ```text
//! register*() ──> Registry            (service key → registration)
//!             └─> ConfigurationStore  (implementation → callback)
//!
//! resolve()   ──> Resolver ──> InstanceCache (service key → singleton)
//! ```
//!
//! Registration takes `&mut self`; resolution takes `&self`. Dropping the
//! container drops every cached singleton it still owns.
//!
//! # Examples
//! ```rust
//! use std::sync::Arc;
//! use sijill_container::prelude::*;
//! use sijill_container::provides;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! #[derive(Default)]
//! struct English;
//!
//! impl Greeter for English {
//!     fn greet(&self) -> String { "hello".into() }
//! }
//!
//! impl Injectable for English {
//!     fn constructor() -> Option<Constructor<Self>> {
//!         Some(Constructor::from_default())
//!     }
//! }
//!
//! provides!(English => dyn Greeter);
//!
//! let mut container = Container::new();
//! container.register::<dyn Greeter, English>(Lifetime::Singleton);
//!
//! let greeter: Arc<dyn Greeter> = container.resolve().expect("Failed to resolve");
//! assert_eq!(greeter.greet(), "hello");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::cache::InstanceCache;
use crate::component::{Component, Injectable, Provides};
use crate::configure::{ConfigurationStore, ConfigureFn, Configurator};
use crate::error::Result;
use crate::graph::{DependencyInfo, GraphValidator};
use crate::key::DependencyKey;
use crate::lifetime::Lifetime;
use crate::provider::Provider;
use crate::registry::{Registration, Registry};
use crate::resolver::Resolver;
use crate::settings::ContainerSettings;

/// Inversion-of-control container.
pub struct Container {
    pub(crate) registry: Registry,
    pub(crate) configurations: ConfigurationStore,
    pub(crate) cache: InstanceCache,
    pub(crate) settings: ContainerSettings,
}

impl Container {
    /// Creates an empty container with default settings.
    pub fn new() -> Self {
        Self::with_settings(ContainerSettings::default())
    }

    pub fn with_settings(settings: ContainerSettings) -> Self {
        Self {
            registry: Registry::new(),
            configurations: ConfigurationStore::new(),
            cache: InstanceCache::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    // ── Registration ──

    /// Maps service `S` to implementation `I`.
    ///
    /// Replaces any earlier registration of `S` and clears the
    /// configuration callback of `I`. A singleton of `S` that is already
    /// cached keeps being returned.
    pub fn register<S, I>(&mut self, lifetime: Lifetime) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: Injectable + Provides<S>,
    {
        self.register_component::<S, I>(lifetime, Component::of(), None)
    }

    /// Like [`register`](Self::register), attaching `configure` to `I`.
    ///
    /// The callback runs once per construction of `I`: on every resolve
    /// for transients, once ever for singletons.
    pub fn register_configured<S, I, F>(&mut self, lifetime: Lifetime, configure: F) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: Injectable + Provides<S>,
        F: Fn(&Configurator<'_, I>) -> Result<()> + Send + Sync + 'static,
    {
        let configure: ConfigureFn<I> = Arc::new(configure);
        self.register_component::<S, I>(lifetime, Component::of(), Some(configure))
    }

    /// Registers with [`ContainerSettings::default_lifetime`].
    pub fn bind<S, I>(&mut self) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: Injectable + Provides<S>,
    {
        let lifetime = self.settings.default_lifetime;
        self.register::<S, I>(lifetime)
    }

    /// Maps service `S` to an explicitly described implementation.
    ///
    /// The configuration entry of `I` is always overwritten, with `None`
    /// clearing it.
    pub fn register_component<S, I>(
        &mut self,
        lifetime: Lifetime,
        component: Component<I>,
        configure: Option<ConfigureFn<I>>,
    ) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: Provides<S>,
    {
        self.registry.register(Registration::new::<S, I>(lifetime, component));
        self.configurations.set::<I>(configure);
        self
    }

    /// Lets `provider` register its services.
    pub fn add_provider(&mut self, provider: &dyn Provider) -> &mut Self {
        debug!(provider = provider.name(), "Adding provider");
        provider.register(self);
        self
    }

    // ── Resolution ──

    /// Resolves service `S`, building its dependency graph as needed.
    ///
    /// ```rust,ignore
    /// let mailer: Arc<dyn Mailer> = container.resolve()?;
    /// ```
    pub fn resolve<S: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<S>> {
        let key = DependencyKey::of::<S>();
        trace!(key = %key, "Resolving");
        Resolver::new(self).resolve::<S>()
    }

    /// Checks the declared dependency graph for missing registrations and
    /// cycles without constructing anything.
    #[instrument(skip(self), name = "container_validate")]
    pub fn validate(&self) -> Result<()> {
        let infos: HashMap<DependencyKey, DependencyInfo> = self
            .registry
            .all_registrations()
            .iter()
            .map(|(key, registration)| {
                (
                    key.clone(),
                    DependencyInfo {
                        key: key.clone(),
                        dependencies: registration.dependencies.clone(),
                    },
                )
            })
            .collect();

        GraphValidator::new(infos).validate()
    }

    // ── Introspection ──

    pub fn is_registered<S: ?Sized + 'static>(&self) -> bool {
        self.registry.get(&DependencyKey::of::<S>()).is_some()
    }

    /// Returns `true` once a singleton of `S` has been built.
    pub fn is_cached<S: ?Sized + 'static>(&self) -> bool {
        self.cache.contains(&DependencyKey::of::<S>())
    }

    pub fn lifetime_of<S: ?Sized + 'static>(&self) -> Option<Lifetime> {
        self.registry
            .get(&DependencyKey::of::<S>())
            .map(|registration| registration.lifetime)
    }

    /// Number of registered service keys.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registered", &self.registry.len())
            .field("cached", &self.cache.len())
            .field("configuration_slots", &self.configurations.len())
            .field("settings", &self.settings)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::Container;
    pub use crate::component::{Component, Constructor, Injectable, Provides};
    pub use crate::configure::{Configurator, ConfigureFn};
    pub use crate::error::{Result, SijillError};
    pub use crate::inject::Property;
    pub use crate::key::DependencyKey;
    pub use crate::lifetime::Lifetime;
    pub use crate::provider::Provider;
    pub use crate::resolver::Resolver;
    pub use crate::settings::ContainerSettings;
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Constructor;
    use crate::error::SijillError;
    use crate::inject::Property;
    use parking_lot::RwLock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Clock: Send + Sync {
        fn now(&self) -> u64;
    }

    #[derive(Default)]
    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> u64 {
            42
        }
    }

    impl Injectable for FixedClock {
        fn constructor() -> Option<Constructor<Self>> {
            Some(Constructor::from_default())
        }
    }

    crate::provides!(FixedClock => dyn Clock);

    #[derive(Debug)]
    struct Audit {
        label: RwLock<String>,
    }

    impl Injectable for Audit {
        fn constructor() -> Option<Constructor<Self>> {
            Some(Constructor::new(|(): ()| Audit {
                label: RwLock::new("default".into()),
            }))
        }
    }

    struct Scheduler {
        clock: Arc<dyn Clock>,
        audit: Option<Arc<Audit>>,
    }

    impl Injectable for Scheduler {
        fn constructor() -> Option<Constructor<Self>> {
            Some(Constructor::new(|(clock,): (Arc<dyn Clock>,)| Scheduler {
                clock,
                audit: None,
            }))
        }

        fn properties() -> Vec<Property<Self>> {
            vec![Property::new("audit", |s: &mut Scheduler, audit: Arc<Audit>| {
                s.audit = Some(audit)
            })]
        }
    }

    fn container() -> Container {
        let mut container = Container::new();
        container
            .register::<dyn Clock, FixedClock>(Lifetime::Singleton)
            .register::<Audit, Audit>(Lifetime::Singleton)
            .register::<Scheduler, Scheduler>(Lifetime::Transient);
        container
    }

    #[test]
    fn resolve_trait_binding() {
        let clock: Arc<dyn Clock> = container().resolve().unwrap();
        assert_eq!(clock.now(), 42);
    }

    #[test]
    fn singleton_returns_same_instance() {
        let container = container();
        let a: Arc<dyn Clock> = container.resolve().unwrap();
        let b: Arc<dyn Clock> = container.resolve().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(container.is_cached::<dyn Clock>());
    }

    #[test]
    fn transient_returns_new_instances() {
        let container = container();
        let a: Arc<Scheduler> = container.resolve().unwrap();
        let b: Arc<Scheduler> = container.resolve().unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a.clock, &b.clock));
        assert!(!container.is_cached::<Scheduler>());
    }

    #[test]
    fn properties_are_injected() {
        let scheduler: Arc<Scheduler> = container().resolve().unwrap();
        let audit = scheduler.audit.as_ref().expect("audit injected");
        assert_eq!(*audit.label.read(), "default");
    }

    #[test]
    fn resolve_not_registered() {
        let container = Container::new();
        match container.resolve::<dyn Clock>() {
            Err(SijillError::NotRegistered(e)) => {
                assert!(e.requested.type_name().contains("Clock"));
                assert!(e.required_by.is_none());
            }
            Err(other) => panic!("Expected NotRegistered, got: {other:?}"),
            Ok(_) => panic!("Expected NotRegistered, got an instance"),
        }
        assert!(container.is_empty());
    }

    #[test]
    fn configure_runs_once_for_singleton() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut container = Container::new();
        container.register_configured::<Audit, Audit, _>(Lifetime::Singleton, {
            let calls = Arc::clone(&calls);
            move |c| {
                calls.fetch_add(1, Ordering::SeqCst);
                *c.target().label.write() = "configured".into();
                Ok(())
            }
        });

        for _ in 0..3 {
            let audit: Arc<Audit> = container.resolve().unwrap();
            assert_eq!(*audit.label.read(), "configured");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn configure_runs_per_transient_construction() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut container = Container::new();
        container.register_configured::<Audit, Audit, _>(Lifetime::Transient, {
            let calls = Arc::clone(&calls);
            move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        for _ in 0..3 {
            container.resolve::<Audit>().unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn configure_sees_cached_singleton() {
        let mut container = Container::new();
        container.register_configured::<Audit, Audit, _>(Lifetime::Singleton, |c| {
            let again: Arc<Audit> = c.resolve()?;
            assert!(Arc::ptr_eq(&again, c.target()));
            Ok(())
        });

        container.resolve::<Audit>().unwrap();
    }

    #[test]
    fn configure_reentering_transient_hits_depth_limit() {
        let mut container = Container::with_settings(ContainerSettings {
            max_depth: 8,
            ..ContainerSettings::default()
        });
        container.register_configured::<Audit, Audit, _>(Lifetime::Transient, |c| {
            c.resolve::<Audit>()?;
            Ok(())
        });

        match container.resolve::<Audit>() {
            Err(SijillError::DepthExceeded { key, limit }) => {
                assert_eq!(key, DependencyKey::of::<Audit>());
                assert_eq!(limit, 8);
            }
            other => panic!("Expected DepthExceeded, got: {other:?}"),
        }
    }

    #[test]
    fn failed_configure_leaves_no_cached_singleton() {
        let mut container = Container::new();
        container.register_configured::<Audit, Audit, _>(Lifetime::Singleton, |c| {
            c.resolve::<dyn Clock>()?;
            Ok(())
        });

        assert!(container.resolve::<Audit>().is_err());
        assert!(!container.is_cached::<Audit>());
    }

    #[test]
    fn reregister_replaces_lifetime() {
        let mut container = container();
        container.register::<dyn Clock, FixedClock>(Lifetime::Transient);

        let a: Arc<dyn Clock> = container.resolve().unwrap();
        let b: Arc<dyn Clock> = container.resolve().unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(container.lifetime_of::<dyn Clock>(), Some(Lifetime::Transient));
    }

    #[test]
    fn cached_singleton_survives_reregistration() {
        let mut container = container();
        let before: Arc<dyn Clock> = container.resolve().unwrap();

        container.register::<dyn Clock, FixedClock>(Lifetime::Transient);
        let after: Arc<dyn Clock> = container.resolve().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn bind_uses_default_lifetime() {
        let mut container = Container::with_settings(ContainerSettings {
            default_lifetime: Lifetime::Singleton,
            ..ContainerSettings::default()
        });
        container.bind::<dyn Clock, FixedClock>();
        assert_eq!(container.lifetime_of::<dyn Clock>(), Some(Lifetime::Singleton));
    }

    #[test]
    fn validate_reports_missing_property_dependency() {
        let mut partial = Container::new();
        partial
            .register::<dyn Clock, FixedClock>(Lifetime::Singleton)
            .register::<Scheduler, Scheduler>(Lifetime::Transient);

        match partial.validate() {
            Err(SijillError::NotRegistered(e)) => {
                assert_eq!(e.requested, DependencyKey::of::<Audit>());
                assert_eq!(e.required_by, Some(DependencyKey::of::<Scheduler>()));
            }
            other => panic!("Expected NotRegistered, got: {other:?}"),
        }
        assert!(container().validate().is_ok());
    }

    #[test]
    fn debug_display() {
        let container = container();
        let debug = format!("{container:?}");
        assert!(debug.contains("Container"));
        assert!(debug.contains("registered: 3"));
    }
}
