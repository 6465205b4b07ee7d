//! In-memory variable store

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::SecretStore;

/// In-memory store for tests and embedding hosts
///
/// Unlike [`EnvSecretStore`](super::EnvSecretStore) this store is writable
/// and does not filter by prefix.
///
/// # Example
///
/// ```
/// use shelly_core::secrets::{SecretStore, MemorySecretStore};
///
/// let store = MemorySecretStore::new();
/// store.insert("SHELLY_SECURITY_ADMIN_API_KEY", "k");
/// assert_eq!(store.get("SHELLY_SECURITY_ADMIN_API_KEY"), Some("k".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    vars: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory store with initial values
    pub fn with_vars(initial: HashMap<String, String>) -> Self {
        Self {
            vars: RwLock::new(initial),
        }
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.vars.write().insert(key.to_string(), value.to_string());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.vars.write().remove(key)
    }

    pub fn clear(&self) {
        self.vars.write().clear();
    }

    pub fn len(&self) -> usize {
        self.vars.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SecretStore for MemorySecretStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.vars.read().get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.vars.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}
