//! # Sijill — a minimal inversion-of-control container
//!
//! Map service contracts to implementations with a lifetime, then resolve
//! fully built, dependency-injected instances:
//!
//! ```rust
//! use std::sync::Arc;
//! use sijill::prelude::*;
//! use sijill::provides;
//!
//! trait Store: Send + Sync {
//!     fn name(&self) -> &str;
//! }
//!
//! #[derive(Default)]
//! struct MemoryStore;
//!
//! impl Store for MemoryStore {
//!     fn name(&self) -> &str { "memory" }
//! }
//!
//! impl Injectable for MemoryStore {
//!     fn constructor() -> Option<Constructor<Self>> {
//!         Some(Constructor::from_default())
//!     }
//! }
//!
//! provides!(MemoryStore => dyn Store);
//!
//! struct Catalog {
//!     store: Arc<dyn Store>,
//! }
//!
//! impl Injectable for Catalog {
//!     fn constructor() -> Option<Constructor<Self>> {
//!         Some(Constructor::new(|(store,): (Arc<dyn Store>,)| Catalog { store }))
//!     }
//! }
//!
//! let mut container = Container::new();
//! container
//!     .register::<dyn Store, MemoryStore>(Lifetime::Singleton)
//!     .register::<Catalog, Catalog>(Lifetime::Transient);
//!
//! let catalog: Arc<Catalog> = container.resolve().expect("Failed to resolve");
//! assert_eq!(catalog.store.name(), "memory");
//! ```

pub use sijill_container::*;
pub use sijill_support::*;
