//! Configuration model
//!
//! - `keys`: registered dotted keys and their `SHELLY_*` variable names
//! - `FileConfigProvider`: YAML base layer (`configs/shelly-manager.yaml`)
//! - `Settings`: typed view built from a resolved configuration

pub mod keys;
mod traits;
mod file;
mod settings;

pub use traits::{ConfigError, ConfigResult};
pub use keys::{ConfigKey, KeyDef, ValueKind, env_var_name, key_for_env_var};
pub use file::{BaseConfig, FileConfigProvider, DEFAULT_CONFIG_PATH};
pub use settings::{
    Settings, ServerSettings, DatabaseSettings, SecuritySettings, ExportSettings,
    ImportSettings, NotificationSettings, EmailSettings, MetricsSettings, parse_bool,
};
