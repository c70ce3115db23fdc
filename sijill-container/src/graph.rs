//! Static dependency graph validation.
//!
//! Walks the declared dependencies of every registration (constructor
//! parameters and properties) without constructing anything:
//! - Detects circular dependencies
//! - Checks that every dependency is registered
//!
//! Resolution never requires this; it is an early check for hosts that
//! want registration mistakes reported at startup.

use std::collections::{HashMap, HashSet};

use sijill_support::rendering::suggest_similar;
use tracing::{debug, instrument};

use crate::error::{CircularDependencyError, NotRegisteredError, SijillError};
use crate::key::DependencyKey;
use crate::registry::MAX_SUGGESTIONS;

/// What the validator needs to know about one registration.
#[derive(Debug, Clone)]
pub(crate) struct DependencyInfo {
    pub key: DependencyKey,
    pub dependencies: Vec<DependencyKey>,
}

/// Depth-first validator keeping the current path for cycle reports.
pub(crate) struct GraphValidator {
    dependencies: HashMap<DependencyKey, DependencyInfo>,
    visiting: HashSet<DependencyKey>,
    validated: HashSet<DependencyKey>,
    path: Vec<DependencyKey>,
}

impl GraphValidator {
    pub fn new(dependencies: HashMap<DependencyKey, DependencyInfo>) -> Self {
        Self {
            dependencies,
            visiting: HashSet::new(),
            validated: HashSet::new(),
            path: Vec::new(),
        }
    }

    /// Validates every registered key.
    ///
    /// Keys are visited in type-name order so the reported error is stable
    /// across runs.
    ///
    /// # Errors
    /// - [`SijillError::CircularDependency`]: cycle detected
    /// - [`SijillError::NotRegistered`]: missing dependency
    #[instrument(skip(self), name = "graph_validation")]
    pub fn validate(&mut self) -> Result<(), SijillError> {
        let mut keys: Vec<DependencyKey> = self.dependencies.keys().cloned().collect();
        keys.sort_by(|a, b| a.type_name().cmp(b.type_name()));

        debug!(dependency_count = keys.len(), "Starting dependency graph validation");

        for key in keys {
            self.validate_key(&key)?;
        }

        debug!("Dependency graph validation passed");
        Ok(())
    }

    fn validate_key(&mut self, key: &DependencyKey) -> Result<(), SijillError> {
        if self.validated.contains(key) {
            return Ok(());
        }

        if self.visiting.contains(key) {
            let start = self.path.iter().position(|k| k == key).unwrap_or(0);
            let mut chain = self.path[start..].to_vec();
            chain.push(key.clone());
            return Err(SijillError::CircularDependency(CircularDependencyError { chain }));
        }

        let info = self.dependencies.get(key).cloned().ok_or_else(|| {
            SijillError::NotRegistered(NotRegisteredError {
                requested: key.clone(),
                required_by: self.path.last().cloned(),
                suggestions: self.find_similar_keys(key),
            })
        })?;

        self.visiting.insert(info.key.clone());
        self.path.push(info.key.clone());

        for dependency in &info.dependencies {
            self.validate_key(dependency)?;
        }

        self.path.pop();
        self.visiting.remove(key);
        self.validated.insert(key.clone());

        Ok(())
    }

    fn find_similar_keys(&self, key: &DependencyKey) -> Vec<String> {
        let names: Vec<&str> = self
            .dependencies
            .keys()
            .map(DependencyKey::type_name)
            .collect();
        suggest_similar(key.type_name(), &names, MAX_SUGGESTIONS)
    }
}
