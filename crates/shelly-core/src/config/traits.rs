//! Configuration errors

use std::path::PathBuf;

use crate::secrets::SecretStoreError;

/// Errors that can occur while loading or resolving configuration
///
/// Every variant is fatal at startup; the process must not run with a
/// partially resolved configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Configuration root in {0} must be a mapping")]
    NotAMapping(PathBuf),

    #[error("Configuration key {key} must be a scalar value")]
    NonScalar { key: String },

    #[error("Invalid value for {key} (from {source_label}): {message}")]
    InvalidValue {
        key: String,
        source_label: String,
        message: String,
    },

    #[error("Cannot read secret file for {key} via {var}: {source}")]
    SecretFile {
        key: String,
        var: String,
        #[source]
        source: SecretStoreError,
    },

    #[error("Both {var} and {file_var} are set for {key}; set only one")]
    ConflictingSources {
        key: String,
        var: String,
        file_var: String,
    },

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
