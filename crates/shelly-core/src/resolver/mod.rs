//! Configuration resolution
//!
//! Overlays the environment on the base file and produces an immutable,
//! provenance-tracked configuration.

mod config_resolver;
mod loader;

pub use config_resolver::{resolve, ResolvedConfig, ResolvedValue, RedactedEntry, ValueSource};
pub use loader::{ConfigLoader, LoadedConfig};
