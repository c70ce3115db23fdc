//! Providers: modules of related registrations.
//!
//! Grouping registrations by domain keeps the composition root short:
//!
//! ```rust,ignore
//! container
//!     .add_provider(&StorageProvider)
//!     .add_provider(&MailProvider);
//! ```

use crate::container::Container;

/// A module that registers related services into a container.
pub trait Provider {
    /// Registers this module's services.
    fn register(&self, container: &mut Container);

    /// Human-readable name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, Constructor};
    use crate::lifetime::Lifetime;

    #[derive(Default)]
    struct Clock;
    #[derive(Default)]
    struct Mailer;

    struct InfraProvider;

    impl Provider for InfraProvider {
        fn register(&self, container: &mut Container) {
            container
                .register_component::<Clock, Clock>(
                    Lifetime::Singleton,
                    Component::new(Constructor::from_default()),
                    None,
                )
                .register_component::<Mailer, Mailer>(
                    Lifetime::Transient,
                    Component::new(Constructor::from_default()),
                    None,
                );
        }
    }

    #[test]
    fn provider_registers_services() {
        let mut container = Container::new();
        container.add_provider(&InfraProvider);

        assert_eq!(container.len(), 2);
        assert_eq!(container.lifetime_of::<Clock>(), Some(Lifetime::Singleton));
        assert!(container.resolve::<Mailer>().is_ok());
    }

    #[test]
    fn provider_has_name() {
        assert!(InfraProvider.name().contains("InfraProvider"));
    }
}
