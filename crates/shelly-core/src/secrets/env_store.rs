//! Environment variable snapshot

use std::collections::BTreeMap;
use std::env;

use super::traits::SecretStore;

/// Prefix shared by every Shelly Manager environment variable
pub const ENV_PREFIX: &str = "SHELLY_";

/// Read-only snapshot of `SHELLY_`-prefixed environment variables
///
/// The snapshot is taken once, so later changes to the process environment
/// are not observed. Resolution is therefore a pure function of the
/// snapshot and can be tested without touching the real environment.
///
/// # Example
///
/// ```
/// use shelly_core::secrets::{SecretStore, EnvSecretStore};
///
/// let store = EnvSecretStore::from_pairs([("SHELLY_SERVER_PORT", "9090")]);
/// assert_eq!(store.get("SHELLY_SERVER_PORT"), Some("9090".to_string()));
/// ```
#[derive(Debug, Default, Clone)]
pub struct EnvSecretStore {
    vars: BTreeMap<String, String>,
}

impl EnvSecretStore {
    /// Capture the current process environment
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn from_process() -> Self {
        Self::from_pairs(env::vars())
    }

    /// Build a snapshot from explicit pairs, keeping only prefixed names
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with(ENV_PREFIX))
            .collect();
        Self { vars }
    }

    /// Number of captured variables
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.vars.keys().cloned().collect()
    }
}
