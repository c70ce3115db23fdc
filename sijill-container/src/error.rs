//! Error types for Sijill container operations.
//!
//! Every failure of `resolve` maps to one variant here. Messages name the
//! types involved and end with a hint about the likely fix.

use std::fmt;

use sijill_support::rendering::render_chain;

use crate::key::DependencyKey;

/// Main error type for all Sijill operations.
#[derive(Debug, thiserror::Error)]
pub enum SijillError {
    /// Requested service has no registration and no cached instance.
    #[error("{}", .0)]
    NotRegistered(NotRegisteredError),

    /// The implementation was registered without a constructor.
    #[error(
        "No constructor available for {implementation}\n  Hint: implement Injectable::constructor or pass a Constructor to the Component"
    )]
    NoConstructor { implementation: DependencyKey },

    /// The constructor ran but produced no instance.
    #[error("Failed to construct {key}: {source}")]
    ConstructionFailed {
        key: DependencyKey,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A service (directly or transitively) depends on itself.
    #[error("{}", .0)]
    CircularDependency(CircularDependencyError),

    /// The resolution path grew past `ContainerSettings::max_depth`.
    #[error("Resolution depth limit of {limit} exceeded while resolving {key}")]
    DepthExceeded { key: DependencyKey, limit: usize },
}

impl SijillError {
    pub(crate) fn type_mismatch(key: &DependencyKey, expected: &'static str) -> Self {
        SijillError::ConstructionFailed {
            key: key.clone(),
            source: format!("Type mismatch: expected {expected}").into(),
        }
    }
}

/// Error when a service was never registered.
#[derive(Debug)]
pub struct NotRegisteredError {
    /// The service that was requested
    pub requested: DependencyKey,
    /// The service whose construction needed it, if any
    pub required_by: Option<DependencyKey>,
    /// Registered services with similar names
    pub suggestions: Vec<String>,
}

impl fmt::Display for NotRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Service not registered: {}", self.requested)?;

        if let Some(ref parent) = self.required_by {
            write!(f, "\n  Required by: {parent}")?;
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: Did you forget to call .register::<{}, _>()?",
            self.requested.short_name()
        )
    }
}

/// Error when a dependency cycle is hit during resolution or validation.
///
/// `chain` starts and ends with the same key.
#[derive(Debug)]
pub struct CircularDependencyError {
    pub chain: Vec<DependencyKey>,
}

impl fmt::Display for CircularDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.chain.iter().map(DependencyKey::short_name).collect();
        write!(f, "Circular dependency detected:\n  {}", render_chain(&names))?;
        write!(
            f,
            "\n  Hint: Break the cycle with a configuration callback that resolves one side after construction"
        )
    }
}

/// Convenient Result type for Sijill operations.
pub type Result<T> = std::result::Result<T, SijillError>;
