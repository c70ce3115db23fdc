//! Instance cache for singleton services.
//!
//! Entries are keyed by service key, created on first singleton resolve
//! and never evicted. The lock is held only for single map operations,
//! never while user code runs.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use parking_lot::Mutex;

use crate::instance::Instance;
use crate::key::DependencyKey;

#[derive(Default)]
pub(crate) struct InstanceCache {
    entries: Mutex<HashMap<DependencyKey, Instance>>,
}

impl InstanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &DependencyKey) -> Option<Instance> {
        self.entries.lock().get(key).cloned()
    }

    /// Stores `instance` unless another one got there first.
    ///
    /// Returns `None` when `instance` was stored, or the existing entry.
    pub fn insert_if_absent(&self, key: DependencyKey, instance: Instance) -> Option<Instance> {
        match self.entries.lock().entry(key) {
            Entry::Occupied(existing) => Some(existing.get().clone()),
            Entry::Vacant(slot) => {
                slot.insert(instance);
                None
            }
        }
    }

    pub fn remove(&self, key: &DependencyKey) {
        self.entries.lock().remove(key);
    }

    pub fn contains(&self, key: &DependencyKey) -> bool {
        self.entries.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}
