//! Property injection.
//!
//! After construction, the resolver walks the component's [`Property`]
//! list in declaration order, resolves each property's key and hands the
//! result to the property's setter.

use std::sync::Arc;

use tracing::trace;

use crate::error::Result;
use crate::instance::{Instance, restore};
use crate::key::DependencyKey;
use crate::resolver::Resolver;

type AssignFn<I> = Box<dyn Fn(&mut I, &Instance) -> Result<()> + Send + Sync>;

/// An injectable property of implementation `I`.
///
/// ```
/// use std::sync::Arc;
/// use sijill_container::inject::Property;
///
/// struct Metrics;
/// struct Handler {
///     metrics: Option<Arc<Metrics>>,
/// }
///
/// let property = Property::new("metrics", |handler: &mut Handler, metrics: Arc<Metrics>| {
///     handler.metrics = Some(metrics)
/// });
/// assert_eq!(property.name(), "metrics");
/// ```
pub struct Property<I> {
    name: &'static str,
    key: DependencyKey,
    assign: AssignFn<I>,
}

impl<I: 'static> Property<I> {
    /// Declares property `name`, filled with the service `S`.
    pub fn new<S, F>(name: &'static str, setter: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&mut I, Arc<S>) + Send + Sync + 'static,
    {
        let key = DependencyKey::of::<S>();
        Self {
            name,
            key: key.clone(),
            assign: Box::new(move |target: &mut I, value: &Instance| {
                setter(target, restore::<S>(value, &key)?);
                Ok(())
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The service key this property is filled from.
    pub fn key(&self) -> &DependencyKey {
        &self.key
    }
}

impl<I> std::fmt::Debug for Property<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("key", &self.key)
            .finish()
    }
}

/// Resolves and assigns every property of `target`, stopping at the first
/// failed resolution.
pub(crate) fn inject_properties<I>(
    target: &mut I,
    properties: &[Property<I>],
    resolver: &Resolver<'_>,
) -> Result<()> {
    for property in properties {
        let value = resolver.resolve_key(&property.key)?;
        (property.assign)(target, &value)?;
        trace!(property = property.name, key = %property.key, "Injected property");
    }
    Ok(())
}
