//! Typed view over a resolved configuration

use std::path::PathBuf;

use super::keys::{self, ConfigKey};
use super::traits::{ConfigError, ConfigResult};
use crate::resolver::ResolvedConfig;
use crate::auth::{validate_new_key, RotationError};
use crate::secrets::SecretString;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecuritySettings {
    /// `None` when no admin key is configured; admin operations are then refused
    pub admin_api_key: Option<SecretString>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    pub max_upload_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: Option<SecretString>,
    pub from_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub email: EmailSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSettings {
    pub enabled: bool,
}

/// Fully typed settings
///
/// Built from a [`ResolvedConfig`]; any value that fails to parse as its
/// declared kind is reported with the key and the layer it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub security: SecuritySettings,
    pub export: ExportSettings,
    pub import: ImportSettings,
    pub notifications: NotificationSettings,
    pub metrics: MetricsSettings,
}

impl Settings {
    pub fn from_resolved(resolved: &ResolvedConfig) -> ConfigResult<Self> {
        let r = Reader { resolved };
        Ok(Settings {
            server: ServerSettings {
                host: r.text(keys::SERVER_HOST)?,
                port: r.port(keys::SERVER_PORT)?,
                log_level: r.text(keys::SERVER_LOG_LEVEL)?,
            },
            database: DatabaseSettings {
                path: r.path(keys::DATABASE_PATH)?,
            },
            security: SecuritySettings {
                admin_api_key: r.admin_key(keys::SECURITY_ADMIN_API_KEY)?,
            },
            export: ExportSettings {
                output_directory: r.path(keys::EXPORT_OUTPUT_DIRECTORY)?,
            },
            import: ImportSettings {
                max_upload_bytes: r.unsigned(keys::IMPORT_MAX_UPLOAD_BYTES)?,
            },
            notifications: NotificationSettings {
                enabled: r.boolean(keys::NOTIFICATIONS_ENABLED)?,
                email: EmailSettings {
                    smtp_host: r.text(keys::NOTIFICATIONS_EMAIL_SMTP_HOST)?,
                    smtp_port: r.port(keys::NOTIFICATIONS_EMAIL_SMTP_PORT)?,
                    smtp_username: r.text(keys::NOTIFICATIONS_EMAIL_SMTP_USERNAME)?,
                    smtp_password: r.secret(keys::NOTIFICATIONS_EMAIL_SMTP_PASSWORD)?,
                    from_address: r.text(keys::NOTIFICATIONS_EMAIL_FROM_ADDRESS)?,
                },
            },
            metrics: MetricsSettings {
                enabled: r.boolean(keys::METRICS_ENABLED)?,
            },
        })
    }
}

/// Parse a boolean the way operators write them in env files
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

struct Reader<'a> {
    resolved: &'a ResolvedConfig,
}

impl Reader<'_> {
    fn raw(&self, key: ConfigKey) -> ConfigResult<&str> {
        self.resolved
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
    }

    fn invalid(&self, key: ConfigKey, message: impl Into<String>) -> ConfigError {
        let source_label = self
            .resolved
            .entry(key)
            .map(|e| e.source.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        ConfigError::InvalidValue {
            key: key.to_string(),
            source_label,
            message: message.into(),
        }
    }

    fn text(&self, key: ConfigKey) -> ConfigResult<String> {
        Ok(self.raw(key)?.to_string())
    }

    fn path(&self, key: ConfigKey) -> ConfigResult<PathBuf> {
        let raw = self.raw(key)?;
        if raw.trim().is_empty() {
            return Err(self.invalid(key, "path must not be empty"));
        }
        Ok(PathBuf::from(raw))
    }

    fn secret(&self, key: ConfigKey) -> ConfigResult<Option<SecretString>> {
        let raw = self.raw(key)?;
        Ok((!raw.is_empty()).then(|| SecretString::new(raw)))
    }

    /// Same policy as a rotated key, so the configured key can be presented
    fn admin_key(&self, key: ConfigKey) -> ConfigResult<Option<SecretString>> {
        let secret = self.secret(key)?;
        if let Some(value) = &secret {
            let message = match validate_new_key(value.expose()) {
                Ok(()) => return Ok(secret),
                Err(RotationError::TooShort) => "admin key must be at least 16 bytes",
                Err(RotationError::TooLong) => "admin key must be at most 512 bytes",
                Err(_) => "admin key must not contain whitespace or control characters",
            };
            return Err(self.invalid(key, message));
        }
        Ok(None)
    }

    fn unsigned(&self, key: ConfigKey) -> ConfigResult<u64> {
        let raw = self.raw(key)?;
        raw.trim()
            .parse::<u64>()
            .map_err(|_| self.invalid(key, format!("expected a non-negative integer, got {raw:?}")))
    }

    fn port(&self, key: ConfigKey) -> ConfigResult<u16> {
        let raw = self.raw(key)?;
        match raw.trim().parse::<u16>() {
            Ok(0) | Err(_) => Err(self.invalid(key, format!("expected a port in 1-65535, got {raw:?}"))),
            Ok(port) => Ok(port),
        }
    }

    fn boolean(&self, key: ConfigKey) -> ConfigResult<bool> {
        let raw = self.raw(key)?;
        parse_bool(raw).ok_or_else(|| self.invalid(key, format!("expected a boolean, got {raw:?}")))
    }
}
