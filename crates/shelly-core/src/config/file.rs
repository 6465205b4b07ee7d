//! File-based configuration provider (YAML)
//!
//! The base layer of the overlay. Nested YAML mappings are flattened into
//! dotted key paths (`security: { admin_api_key: x }` → `security.admin_api_key`).

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use super::keys::{self, ConfigKey};
use super::traits::{ConfigError, ConfigResult};

/// Default location of the base configuration file
pub const DEFAULT_CONFIG_PATH: &str = "configs/shelly-manager.yaml";

/// Flattened base configuration layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseConfig {
    values: BTreeMap<ConfigKey, String>,
    unknown_keys: Vec<String>,
    origin: Option<PathBuf>,
}

impl BaseConfig {
    /// An empty layer: every key falls back to its default
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a YAML document
    ///
    /// `origin` is only used for error messages and provenance.
    pub fn from_yaml_str(content: &str, origin: impl Into<PathBuf>) -> ConfigResult<Self> {
        let origin = origin.into();
        let document: Value = serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
            path: origin.clone(),
            source,
        })?;

        let mut base = BaseConfig {
            origin: Some(origin.clone()),
            ..Default::default()
        };

        match document {
            // An empty file parses to null
            Value::Null => {}
            Value::Mapping(map) => base.flatten("", &map)?,
            _ => return Err(ConfigError::NotAMapping(origin)),
        }
        Ok(base)
    }

    /// Build a layer from already-flattened values (tests, embedding hosts)
    pub fn from_pairs<'a, I>(pairs: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut base = BaseConfig::default();
        for (path, value) in pairs {
            let key = ConfigKey::lookup(path).ok_or_else(|| ConfigError::UnknownKey(path.to_string()))?;
            base.values.insert(key, value.to_string());
        }
        Ok(base)
    }

    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// YAML paths that matched no registered key
    pub fn unknown_keys(&self) -> &[String] {
        &self.unknown_keys
    }

    /// File this layer was read from, if any
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    fn flatten(&mut self, prefix: &str, map: &serde_yaml::Mapping) -> ConfigResult<()> {
        for (k, v) in map {
            let segment = match k {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => {
                    self.unknown_keys.push(format!("{prefix}<non-scalar key>"));
                    continue;
                }
            };
            let path = if prefix.is_empty() {
                segment
            } else {
                format!("{prefix}.{segment}")
            };

            if let Some(key) = ConfigKey::lookup(&path) {
                if let Some(raw) = scalar_to_string(&path, v)? {
                    self.values.insert(key, raw);
                }
            } else if let (Value::Mapping(inner), true) = (v, keys::is_section(&path)) {
                self.flatten(&path, inner)?;
            } else {
                self.unknown_keys.push(path);
            }
        }
        Ok(())
    }
}

fn scalar_to_string(path: &str, value: &Value) -> ConfigResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => Err(ConfigError::NonScalar {
            key: path.to_string(),
        }),
    }
}

/// File-based configuration provider
///
/// # Example
///
/// ```no_run
/// use shelly_core::config::FileConfigProvider;
///
/// let provider = FileConfigProvider::new("configs/shelly-manager.yaml");
/// let base = provider.load().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileConfigProvider {
    path: PathBuf,
}

impl Default for FileConfigProvider {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the base layer
    ///
    /// A missing file yields an empty layer; the caller decides whether to
    /// warn about it. Any other read or parse failure is an error.
    pub fn load(&self) -> ConfigResult<BaseConfig> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BaseConfig::empty()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        BaseConfig::from_yaml_str(&content, &self.path)
    }
}
