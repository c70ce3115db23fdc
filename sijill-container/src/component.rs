//! Compile-time descriptions of implementations.
//!
//! A [`Component`] tells the resolver how to build an implementation `I`:
//! its single [`Constructor`] (parameter keys in declaration order plus a
//! builder) and its injectable [`Property`] list. Implementations usually
//! describe themselves through [`Injectable`]; [`Provides`] turns the built
//! `Arc<I>` into the service handle `Arc<S>`.
//!
//! # Examples
//! ```
//! use std::sync::Arc;
//! use sijill_container::component::{Constructor, Injectable};
//! use sijill_container::provides;
//!
//! trait Clock: Send + Sync {}
//!
//! #[derive(Default)]
//! struct SystemClock;
//! impl Clock for SystemClock {}
//!
//! struct Scheduler {
//!     clock: Arc<dyn Clock>,
//! }
//!
//! impl Injectable for SystemClock {
//!     fn constructor() -> Option<Constructor<Self>> {
//!         Some(Constructor::from_default())
//!     }
//! }
//!
//! impl Injectable for Scheduler {
//!     fn constructor() -> Option<Constructor<Self>> {
//!         Some(Constructor::new(|(clock,): (Arc<dyn Clock>,)| Scheduler { clock }))
//!     }
//! }
//!
//! provides!(SystemClock => dyn Clock);
//! ```

use std::sync::Arc;

use tracing::trace;

use crate::error::{Result, SijillError};
use crate::inject::{Property, inject_properties};
use crate::instance::{Instance, restore};
use crate::key::DependencyKey;
use crate::resolver::Resolver;

/// Converts a built implementation into the handle of service `S`.
///
/// Every type provides itself. Trait bindings need one impl per pair,
/// usually written with [`provides!`](crate::provides).
pub trait Provides<S: ?Sized>: Send + Sync + 'static {
    fn provide(self: Arc<Self>) -> Arc<S>;
}

impl<T: Send + Sync + 'static> Provides<T> for T {
    fn provide(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// Implements [`Provides`] for trait bindings by unsized coercion.
///
/// ```
/// use sijill_container::provides;
///
/// trait Mailer: Send + Sync {}
/// struct SmtpMailer;
/// impl Mailer for SmtpMailer {}
///
/// provides!(SmtpMailer => dyn Mailer);
/// ```
#[macro_export]
macro_rules! provides {
    ($implementation:ty => $($service:ty),+ $(,)?) => {
        $(
            impl $crate::component::Provides<$service> for $implementation {
                fn provide(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$service> {
                    self
                }
            }
        )+
    };
}

/// A tuple of `Arc<_>` constructor parameters.
///
/// Implemented for `()` and tuples of up to eight `Arc<S>`; each element's
/// key is the key of `S`.
pub trait Dependencies: Sized + 'static {
    /// Parameter keys in declaration order.
    fn keys() -> Vec<DependencyKey>;

    /// Rebuilds the tuple from resolved instances, in the same order.
    fn from_instances(instances: Vec<Instance>) -> Result<Self>;
}

impl Dependencies for () {
    fn keys() -> Vec<DependencyKey> {
        Vec::new()
    }

    fn from_instances(_: Vec<Instance>) -> Result<Self> {
        Ok(())
    }
}

fn next_argument<S: ?Sized + Send + Sync + 'static>(
    arguments: &mut impl Iterator<Item = Instance>,
) -> Result<Arc<S>> {
    let key = DependencyKey::of::<S>();
    let instance = arguments.next().ok_or_else(|| SijillError::ConstructionFailed {
        key: key.clone(),
        source: "missing constructor argument".into(),
    })?;
    restore::<S>(&instance, &key)
}

macro_rules! impl_dependencies {
    ($($param:ident),+) => {
        impl<$($param: ?Sized + Send + Sync + 'static),+> Dependencies for ($(Arc<$param>,)+) {
            fn keys() -> Vec<DependencyKey> {
                vec![$(DependencyKey::of::<$param>()),+]
            }

            fn from_instances(instances: Vec<Instance>) -> Result<Self> {
                let mut arguments = instances.into_iter();
                Ok(($(next_argument::<$param>(&mut arguments)?,)+))
            }
        }
    };
}

impl_dependencies!(A);
impl_dependencies!(A, B);
impl_dependencies!(A, B, C);
impl_dependencies!(A, B, C, D);
impl_dependencies!(A, B, C, D, E);
impl_dependencies!(A, B, C, D, E, F);
impl_dependencies!(A, B, C, D, E, F, G);
impl_dependencies!(A, B, C, D, E, F, G, H);

type BuildFn<I> = Box<dyn Fn(Vec<Instance>) -> Result<Option<I>> + Send + Sync>;

/// The single constructor of an implementation.
pub struct Constructor<I> {
    params: Vec<DependencyKey>,
    build: BuildFn<I>,
}

impl<I: Send + Sync + 'static> Constructor<I> {
    /// A constructor taking the dependency tuple `D`.
    pub fn new<D, F>(build: F) -> Self
    where
        D: Dependencies,
        F: Fn(D) -> I + Send + Sync + 'static,
    {
        Self::try_new(move |dependencies: D| Some(build(dependencies)))
    }

    /// A constructor that may produce no instance.
    ///
    /// Returning `None` fails the resolution with
    /// [`SijillError::ConstructionFailed`].
    pub fn try_new<D, F>(build: F) -> Self
    where
        D: Dependencies,
        F: Fn(D) -> Option<I> + Send + Sync + 'static,
    {
        Self {
            params: D::keys(),
            build: Box::new(move |instances: Vec<Instance>| D::from_instances(instances).map(&build)),
        }
    }

    /// A parameterless constructor using `I::default()`.
    pub fn from_default() -> Self
    where
        I: Default,
    {
        Self::new(|(): ()| I::default())
    }

    /// Parameter keys in declaration order.
    pub fn params(&self) -> &[DependencyKey] {
        &self.params
    }
}

/// Declares how the resolver builds `Self`.
pub trait Injectable: Sized + Send + Sync + 'static {
    /// The sole eligible constructor. `None` means the type cannot be built
    /// by the container.
    fn constructor() -> Option<Constructor<Self>>;

    /// Properties assigned after construction, in this order.
    fn properties() -> Vec<Property<Self>> {
        Vec::new()
    }
}

/// Everything needed to activate one implementation.
pub struct Component<I> {
    constructor: Option<Constructor<I>>,
    properties: Vec<Property<I>>,
}

impl<I: Send + Sync + 'static> Component<I> {
    /// A component built by `constructor` with no properties.
    pub fn new(constructor: Constructor<I>) -> Self {
        Self {
            constructor: Some(constructor),
            properties: Vec::new(),
        }
    }

    /// A component that cannot be constructed.
    pub fn without_constructor() -> Self {
        Self {
            constructor: None,
            properties: Vec::new(),
        }
    }

    /// Describes `I` from its [`Injectable`] impl.
    pub fn of() -> Self
    where
        I: Injectable,
    {
        Self {
            constructor: I::constructor(),
            properties: I::properties(),
        }
    }

    /// Appends an injectable property.
    pub fn property(mut self, property: Property<I>) -> Self {
        self.properties.push(property);
        self
    }

    /// Keys of constructor parameters followed by property keys.
    pub fn dependencies(&self) -> Vec<DependencyKey> {
        self.constructor
            .iter()
            .flat_map(|constructor| constructor.params.iter())
            .chain(self.properties.iter().map(Property::key))
            .cloned()
            .collect()
    }

    /// Builds and injects a new `I`.
    pub(crate) fn activate(&self, resolver: &Resolver<'_>) -> Result<I> {
        let implementation = DependencyKey::of::<I>();
        let constructor = self.constructor.as_ref().ok_or_else(|| SijillError::NoConstructor {
            implementation: implementation.clone(),
        })?;

        let mut arguments = Vec::with_capacity(constructor.params.len());
        for param in &constructor.params {
            arguments.push(resolver.resolve_key(param)?);
        }

        let mut instance =
            (constructor.build)(arguments)?.ok_or_else(|| SijillError::ConstructionFailed {
                key: implementation.clone(),
                source: "constructor produced no instance".into(),
            })?;
        trace!(implementation = %implementation, "Constructed instance");

        inject_properties(&mut instance, &self.properties, resolver)?;
        Ok(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Clock: Send + Sync {}

    #[derive(Default)]
    struct SystemClock;
    impl Clock for SystemClock {}

    struct Audit;

    struct Report {
        clock: Arc<dyn Clock>,
        audit: Option<Arc<Audit>>,
    }

    impl Injectable for Report {
        fn constructor() -> Option<Constructor<Self>> {
            Some(Constructor::new(|(clock,): (Arc<dyn Clock>,)| Report {
                clock,
                audit: None,
            }))
        }

        fn properties() -> Vec<Property<Self>> {
            vec![Property::new("audit", |report: &mut Report, audit: Arc<Audit>| {
                report.audit = Some(audit)
            })]
        }
    }

    provides!(SystemClock => dyn Clock);

    #[test]
    fn constructor_params_in_declaration_order() {
        let constructor = Constructor::new(|(_, _): (Arc<dyn Clock>, Arc<Audit>)| Audit);
        assert_eq!(
            constructor.params(),
            &[DependencyKey::of::<dyn Clock>(), DependencyKey::of::<Audit>()]
        );
    }

    #[test]
    fn default_constructor_has_no_params() {
        let constructor = Constructor::<SystemClock>::from_default();
        assert!(constructor.params().is_empty());
    }

    #[test]
    fn component_lists_constructor_then_properties() {
        let component = Component::<Report>::of();
        assert_eq!(
            component.dependencies(),
            vec![DependencyKey::of::<dyn Clock>(), DependencyKey::of::<Audit>()]
        );
    }

    #[test]
    fn component_without_constructor_still_lists_properties() {
        let component = Component::<Report>::without_constructor()
            .property(Property::new("audit", |report: &mut Report, audit: Arc<Audit>| {
                report.audit = Some(audit)
            }));
        assert_eq!(component.dependencies(), vec![DependencyKey::of::<Audit>()]);
    }

    #[test]
    fn dependencies_rebuild_tuple() {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let audit = Arc::new(Audit);
        let instances = vec![
            crate::instance::erase(Arc::clone(&clock)),
            crate::instance::erase(Arc::clone(&audit)),
        ];

        let (c, a) = <(Arc<dyn Clock>, Arc<Audit>)>::from_instances(instances).unwrap();
        assert!(Arc::ptr_eq(&c, &clock));
        assert!(Arc::ptr_eq(&a, &audit));
    }

    #[test]
    fn dependencies_missing_argument_fails() {
        let result = <(Arc<Audit>,)>::from_instances(Vec::new());
        assert!(matches!(result, Err(SijillError::ConstructionFailed { .. })));
    }

    #[test]
    fn provides_upcasts_same_allocation() {
        let clock = Arc::new(SystemClock);
        let service: Arc<dyn Clock> = <SystemClock as Provides<dyn Clock>>::provide(Arc::clone(&clock));
        assert!(std::ptr::addr_eq(Arc::as_ptr(&clock), Arc::as_ptr(&service)));
    }
}
