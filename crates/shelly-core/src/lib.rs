//! Shelly Manager Core
//!
//! Runtime-agnostic configuration and access-control primitives.
//! This crate has no HTTP or async runtime dependency; the server crate (or
//! any other host) wires these pieces into its request handling.
//!
//! ## Configuration resolution
//!
//! A base YAML file is overlaid with `SHELLY_*` environment variables. Every
//! registered dotted key maps to one variable (`security.admin_api_key` →
//! `SHELLY_SECURITY_ADMIN_API_KEY`) and a `_FILE` variant that names a
//! mounted secret file.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use shelly_core::{ConfigLoader, TracingLogger, AdminKey, ExportRoot};
//!
//! let loaded = ConfigLoader::new("configs/shelly-manager.yaml")
//!     .with_logger(Arc::new(TracingLogger::new()))
//!     .load()?;
//!
//! // One key cell shared by every handler that checks it
//! let admin_key = Arc::new(AdminKey::new(loaded.settings.security.admin_api_key.as_ref()));
//! let exports = ExportRoot::open(&loaded.settings.export.output_directory, true)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod logging;
pub mod secrets;
pub mod config;
pub mod resolver;
pub mod auth;
pub mod export;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigResult, ConfigKey, BaseConfig, FileConfigProvider, Settings,
    DEFAULT_CONFIG_PATH,
};

pub use secrets::{
    SecretStore, SecretInfo, SecretStoreError, EnvSecretStore, MemorySecretStore, SecretString,
};

pub use resolver::{resolve, ConfigLoader, LoadedConfig, ResolvedConfig, ResolvedValue, ValueSource};

pub use auth::{AdminKey, AuthError, Rotation, RotationError, generate_admin_key, presented_key};

pub use export::{ExportRoot, PathError};

pub use logging::{Logger, SharedLogger, NoOpLogger, MemoryLogger, TracingLogger};
