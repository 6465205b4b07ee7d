//! Environment overlay over the base configuration
//!
//! Layer priority (later layers override earlier):
//! 1. Built-in defaults from the key registry
//! 2. YAML base file
//! 3. Environment: `SHELLY_<KEY>` or `SHELLY_<KEY>_FILE`
//!
//! [`resolve`] is a pure function of the base layer and an environment
//! snapshot. The only I/O it performs is reading files named by `_FILE`
//! variables.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::keys::{self, ConfigKey, REGISTRY};
use crate::config::{BaseConfig, ConfigError, ConfigResult};
use crate::secrets::{read_secret_file, SecretStore, SecretStoreError, ENV_PREFIX, REDACTED};

/// Which layer provided a resolved value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Registry default
    Default,
    /// Base configuration file
    File { origin: Option<PathBuf> },
    /// Plain environment variable
    Env { var: String },
    /// File named by a `_FILE` environment variable
    EnvFile { var: String, path: PathBuf },
}

impl ValueSource {
    /// Short machine-readable tag
    pub fn kind(&self) -> &'static str {
        match self {
            ValueSource::Default => "default",
            ValueSource::File { .. } => "file",
            ValueSource::Env { .. } => "env",
            ValueSource::EnvFile { .. } => "env_file",
        }
    }
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Default => write!(f, "default"),
            ValueSource::File { origin: Some(path) } => write!(f, "file:{}", path.display()),
            ValueSource::File { origin: None } => write!(f, "file"),
            ValueSource::Env { var } => write!(f, "env:{var}"),
            ValueSource::EnvFile { var, path } => write!(f, "env_file:{var}({})", path.display()),
        }
    }
}

/// A single resolved key with provenance
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedValue {
    pub key: ConfigKey,
    pub value: String,
    pub source: ValueSource,
}

impl ResolvedValue {
    /// Value safe for logs and API responses
    pub fn display_value(&self) -> &str {
        if self.key.is_secret() && !self.value.is_empty() {
            REDACTED
        } else {
            &self.value
        }
    }
}

impl fmt::Debug for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedValue")
            .field("key", &self.key.as_str())
            .field("value", &self.display_value())
            .field("source", &self.source)
            .finish()
    }
}

/// Serializable, secret-free view of one resolved entry
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RedactedEntry {
    pub key: String,
    pub env_var: String,
    pub value: String,
    pub source: String,
    pub secret: bool,
}

/// The final flattened configuration
///
/// Immutable once built. Runtime-mutable values such as the admin key are
/// seeded from here and then owned by their own cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    entries: BTreeMap<ConfigKey, ResolvedValue>,
    ignored_env_vars: Vec<String>,
    unknown_file_keys: Vec<String>,
}

impl ResolvedConfig {
    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        self.entries.get(&key).map(|e| e.value.as_str())
    }

    pub fn entry(&self, key: ConfigKey) -> Option<&ResolvedValue> {
        self.entries.get(&key)
    }

    /// Entries in registry order
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedValue> {
        REGISTRY.iter().filter_map(|def| self.entries.get(&def.key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `SHELLY_*` variables that map to no registered key
    pub fn ignored_env_vars(&self) -> &[String] {
        &self.ignored_env_vars
    }

    /// Base file paths that map to no registered key
    pub fn unknown_file_keys(&self) -> &[String] {
        &self.unknown_file_keys
    }

    /// Secret-free view for diagnostics
    pub fn redacted(&self) -> Vec<RedactedEntry> {
        self.iter()
            .map(|e| RedactedEntry {
                key: e.key.to_string(),
                env_var: e.key.env_var(),
                value: e.display_value().to_string(),
                source: e.source.to_string(),
                secret: e.key.is_secret(),
            })
            .collect()
    }
}

/// Resolve every registered key against the base layer and environment
///
/// # Errors
///
/// - both `SHELLY_<KEY>` and `SHELLY_<KEY>_FILE` are set
/// - a `_FILE` variable is empty, or names a missing/unreadable file
pub fn resolve(base: &BaseConfig, env: &dyn SecretStore) -> ConfigResult<ResolvedConfig> {
    let mut entries = BTreeMap::new();

    for def in REGISTRY {
        let key = def.key;
        let var = key.env_var();
        let file_var = key.file_env_var();

        let (value, source) = match (env.get(&var), env.get(&file_var)) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::ConflictingSources {
                    key: key.to_string(),
                    var,
                    file_var,
                });
            }
            (Some(value), None) => (value, ValueSource::Env { var }),
            (None, Some(path)) => {
                let value = read_secret_file(&path).map_err(|source| ConfigError::SecretFile {
                    key: key.to_string(),
                    var: file_var.clone(),
                    source,
                })?;
                (
                    value,
                    ValueSource::EnvFile {
                        var: file_var,
                        path: PathBuf::from(path),
                    },
                )
            }
            (None, None) if env.get_info(&file_var).defined => {
                // Set but empty: a mount that was meant to exist and does not
                return Err(ConfigError::SecretFile {
                    key: key.to_string(),
                    var: file_var,
                    source: SecretStoreError::EmptyPath,
                });
            }
            (None, None) => match base.get(key) {
                Some(value) => (
                    value.to_string(),
                    ValueSource::File {
                        origin: base.origin().map(PathBuf::from),
                    },
                ),
                None => (def.default.to_string(), ValueSource::Default),
            },
        };

        entries.insert(key, ResolvedValue { key, value, source });
    }

    let mut ignored_env_vars: Vec<String> = env
        .keys()
        .into_iter()
        .filter(|var| var.starts_with(ENV_PREFIX) && keys::key_for_env_var(var).is_none())
        .collect();
    ignored_env_vars.sort();

    Ok(ResolvedConfig {
        entries,
        ignored_env_vars,
        unknown_file_keys: base.unknown_keys().to_vec(),
    })
}
