//! Core traits and types for secret and environment lookup

use thiserror::Error;

/// What a store knows about one variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretInfo {
    /// Set, possibly to an empty string
    pub defined: bool,
    /// Set to a non-empty value
    pub available: bool,
    /// Name of the store that answered
    pub store: String,
}

impl SecretInfo {
    fn from_raw(raw: Option<&str>, store: &str) -> Self {
        Self {
            defined: raw.is_some(),
            available: raw.is_some_and(|v| !v.is_empty()),
            store: store.to_string(),
        }
    }
}

/// Errors that can occur while reading secrets
#[derive(Error, Debug)]
pub enum SecretStoreError {
    #[error("Secret file path is empty")]
    EmptyPath,

    #[error("Secret file not found: {0}")]
    NotFound(String),

    #[error("Failed to read secret file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Secret file {0} is not valid UTF-8")]
    InvalidUtf8(String),
}

pub type SecretStoreResult<T> = Result<T, SecretStoreError>;

/// Read-only view over a set of named variables
///
/// The resolver treats the environment as an immutable snapshot, so stores
/// only expose lookups. Implementations:
/// - `EnvSecretStore`: snapshot of the process environment
/// - `MemorySecretStore`: explicit values, for tests and embedding
pub trait SecretStore: Send + Sync {
    /// Human-readable name of this store
    fn name(&self) -> &str;

    /// Raw value by exact (case-sensitive) name, empty strings included
    fn lookup(&self, key: &str) -> Option<String>;

    /// All variable names held by this store
    fn keys(&self) -> Vec<String>;

    /// Value by name; an empty value counts as unset
    fn get(&self, key: &str) -> Option<String> {
        self.lookup(key).filter(|v| !v.is_empty())
    }

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Distinguishes "unset" from "set but empty"
    fn get_info(&self, key: &str) -> SecretInfo {
        SecretInfo::from_raw(self.lookup(key).as_deref(), self.name())
    }
}
