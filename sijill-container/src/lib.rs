//! Core container implementation for Sijill.

mod cache;
pub mod component;
pub mod configure;
pub mod container;
pub mod error;
mod graph;
pub mod inject;
mod instance;
pub mod key;
pub mod lifetime;
pub mod provider;
mod registry;
pub mod resolver;
pub mod settings;

pub use container::{Container, prelude};
pub use error::{Result, SijillError};
pub use instance::Instance;
pub use key::DependencyKey;
pub use lifetime::Lifetime;
