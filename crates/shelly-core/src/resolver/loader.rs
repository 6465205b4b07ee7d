//! Startup loading: file + environment → resolved and typed configuration

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{ConfigResult, FileConfigProvider, Settings};
use crate::logging::{NoOpLogger, SharedLogger};
use crate::secrets::{EnvSecretStore, SecretStore};
use crate::{log_debug, log_info, log_warn};

use super::config_resolver::{resolve, ResolvedConfig, ValueSource};

/// Result of a successful load
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub resolved: ResolvedConfig,
    pub settings: Settings,
}

/// Loads the base file, overlays the environment and builds typed settings
///
/// # Example
///
/// ```no_run
/// use shelly_core::resolver::ConfigLoader;
///
/// let loaded = ConfigLoader::new("configs/shelly-manager.yaml").load()?;
/// println!("listening on {}", loaded.settings.server.port);
/// # Ok::<(), shelly_core::config::ConfigError>(())
/// ```
pub struct ConfigLoader {
    provider: FileConfigProvider,
    env: Arc<dyn SecretStore>,
    logger: SharedLogger,
}

impl ConfigLoader {
    /// Loader reading `path` and a snapshot of the process environment
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            provider: FileConfigProvider::new(path),
            env: Arc::new(EnvSecretStore::from_process()),
            logger: Arc::new(NoOpLogger::new()),
        }
    }

    /// Replace the environment snapshot
    pub fn with_env(mut self, env: Arc<dyn SecretStore>) -> Self {
        self.env = env;
        self
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn provider(&self) -> &FileConfigProvider {
        &self.provider
    }

    /// Resolve the configuration
    ///
    /// Values are never logged, only where each one came from.
    pub fn load(&self) -> ConfigResult<LoadedConfig> {
        let path = self.provider.path();
        if !self.provider.exists() {
            log_warn!(
                self.logger,
                "Config file {} not found, using defaults and environment only",
                path.display()
            );
        }

        let base = self.provider.load()?;
        let resolved = resolve(&base, self.env.as_ref())?;

        for key in resolved.unknown_file_keys() {
            log_warn!(self.logger, "Ignoring unknown key '{}' in {}", key, path.display());
        }
        for var in resolved.ignored_env_vars() {
            log_warn!(self.logger, "Ignoring environment variable {} (no matching config key)", var);
        }
        for entry in resolved.iter() {
            if entry.source != ValueSource::Default {
                log_debug!(self.logger, "{} <- {}", entry.key, entry.source);
            }
        }

        let settings = Settings::from_resolved(&resolved)?;
        if settings.security.admin_api_key.is_none() {
            log_warn!(self.logger, "No admin API key configured; admin operations are disabled");
        }
        log_info!(
            self.logger,
            "Configuration resolved ({} keys, {} from environment)",
            resolved.len(),
            resolved
                .iter()
                .filter(|e| matches!(e.source, ValueSource::Env { .. } | ValueSource::EnvFile { .. }))
                .count()
        );

        Ok(LoadedConfig { resolved, settings })
    }
}

impl std::fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("path", &self.provider.path())
            .field("env", &self.env.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::logging::{LogLevel, MemoryLogger};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_file_and_env() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shelly-manager.yaml");
        fs::write(
            &path,
            "security:\n  admin_api_key: file-admin-key-0001\nserver:\n  port: 9000\n",
        )
        .unwrap();

        let logger = Arc::new(MemoryLogger::new());
        let env = EnvSecretStore::from_pairs([
            ("SHELLY_SERVER_PORT", "9100"),
            ("SHELLY_BOGUS", "1"),
        ]);
        let loaded = ConfigLoader::new(&path)
            .with_env(Arc::new(env))
            .with_logger(logger.clone())
            .load()
            .unwrap();

        assert_eq!(loaded.settings.server.port, 9100);
        assert_eq!(
            loaded.settings.security.admin_api_key.as_ref().map(|k| k.expose()),
            Some("file-admin-key-0001")
        );
        assert!(logger.contains("SHELLY_BOGUS"));
        assert!(logger.contains("server.port <- env:SHELLY_SERVER_PORT"));
        // Secret values never reach the log
        assert!(!logger.contains("file-admin-key-0001"));
    }

    #[test]
    fn test_missing_file_warns_and_uses_defaults() {
        let dir = tempdir().unwrap();
        let logger = Arc::new(MemoryLogger::new());
        let loaded = ConfigLoader::new(dir.path().join("absent.yaml"))
            .with_env(Arc::new(EnvSecretStore::default()))
            .with_logger(logger.clone())
            .load()
            .unwrap();

        assert_eq!(loaded.settings.server.port, 8080);
        let warnings = logger.messages_at(LogLevel::Warn);
        assert!(warnings.iter().any(|w| w.contains("not found")));
        assert!(warnings.iter().any(|w| w.contains("No admin API key")));
    }

    #[test]
    fn test_invalid_env_value_is_fatal() {
        let dir = tempdir().unwrap();
        let err = ConfigLoader::new(dir.path().join("absent.yaml"))
            .with_env(Arc::new(EnvSecretStore::from_pairs([("SHELLY_SERVER_PORT", "http")])))
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_unparsable_file_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "server: [").unwrap();
        let err = ConfigLoader::new(&path)
            .with_env(Arc::new(EnvSecretStore::default()))
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }
}
