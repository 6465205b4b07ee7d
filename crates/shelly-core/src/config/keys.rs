//! Registered configuration keys and their environment variable names
//!
//! Every logical key is declared here once. A key maps to exactly one
//! environment variable, `SHELLY_` + the key uppercased with `.` replaced by
//! `_`, plus a `_FILE` variant naming a file to read the value from.
//! Variables that match no registered key are never merged into the config.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::secrets::{ENV_PREFIX, FILE_SUFFIX};

/// How a raw string value must be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Integer,
    Boolean,
    Path,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Boolean => "boolean",
            ValueKind::Path => "path",
        }
    }
}

/// A registered dotted configuration path, e.g. `security.admin_api_key`
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigKey(&'static str);

impl ConfigKey {
    /// Find a registered key by its dotted path
    pub fn lookup(path: &str) -> Option<ConfigKey> {
        KEY_INDEX.get(path).map(|def| def.key)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Definition of this key in the registry
    pub fn def(&self) -> &'static KeyDef {
        // Keys can only be constructed in this module, all of them registered
        KEY_INDEX[self.0]
    }

    /// Environment variable overriding this key
    pub fn env_var(&self) -> String {
        env_var_name(self.0)
    }

    /// Environment variable naming a file that holds this key's value
    pub fn file_env_var(&self) -> String {
        format!("{}{}", env_var_name(self.0), FILE_SUFFIX)
    }

    pub fn kind(&self) -> ValueKind {
        self.def().kind
    }

    pub fn is_secret(&self) -> bool {
        self.def().secret
    }
}

impl fmt::Debug for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConfigKey({})", self.0)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Registry entry for a configuration key
#[derive(Debug)]
pub struct KeyDef {
    pub key: ConfigKey,
    pub kind: ValueKind,
    /// Secret values are redacted in every diagnostic output
    pub secret: bool,
    /// Built-in value used when neither the file nor the environment sets one
    pub default: &'static str,
    pub description: &'static str,
}

pub const SERVER_HOST: ConfigKey = ConfigKey("server.host");
pub const SERVER_PORT: ConfigKey = ConfigKey("server.port");
pub const SERVER_LOG_LEVEL: ConfigKey = ConfigKey("server.log_level");
pub const DATABASE_PATH: ConfigKey = ConfigKey("database.path");
pub const SECURITY_ADMIN_API_KEY: ConfigKey = ConfigKey("security.admin_api_key");
pub const EXPORT_OUTPUT_DIRECTORY: ConfigKey = ConfigKey("export.output_directory");
pub const IMPORT_MAX_UPLOAD_BYTES: ConfigKey = ConfigKey("import.max_upload_bytes");
pub const NOTIFICATIONS_ENABLED: ConfigKey = ConfigKey("notifications.enabled");
pub const NOTIFICATIONS_EMAIL_SMTP_HOST: ConfigKey = ConfigKey("notifications.email.smtp_host");
pub const NOTIFICATIONS_EMAIL_SMTP_PORT: ConfigKey = ConfigKey("notifications.email.smtp_port");
pub const NOTIFICATIONS_EMAIL_SMTP_USERNAME: ConfigKey =
    ConfigKey("notifications.email.smtp_username");
pub const NOTIFICATIONS_EMAIL_SMTP_PASSWORD: ConfigKey =
    ConfigKey("notifications.email.smtp_password");
pub const NOTIFICATIONS_EMAIL_FROM_ADDRESS: ConfigKey =
    ConfigKey("notifications.email.from_address");
pub const METRICS_ENABLED: ConfigKey = ConfigKey("metrics.enabled");

/// All registered keys, in the order they are reported
pub static REGISTRY: &[KeyDef] = &[
    KeyDef {
        key: SERVER_HOST,
        kind: ValueKind::Text,
        secret: false,
        default: "0.0.0.0",
        description: "Address the HTTP server binds to",
    },
    KeyDef {
        key: SERVER_PORT,
        kind: ValueKind::Integer,
        secret: false,
        default: "8080",
        description: "Port the HTTP server listens on",
    },
    KeyDef {
        key: SERVER_LOG_LEVEL,
        kind: ValueKind::Text,
        secret: false,
        default: "info",
        description: "Default tracing filter when RUST_LOG is unset",
    },
    KeyDef {
        key: DATABASE_PATH,
        kind: ValueKind::Path,
        secret: false,
        default: "data/shelly.db",
        description: "SQLite database file",
    },
    KeyDef {
        key: SECURITY_ADMIN_API_KEY,
        kind: ValueKind::Text,
        secret: true,
        default: "",
        description: "Admin key guarding API, WebSocket, export and import operations",
    },
    KeyDef {
        key: EXPORT_OUTPUT_DIRECTORY,
        kind: ValueKind::Path,
        secret: false,
        default: "data/exports",
        description: "Base directory that export downloads are confined to",
    },
    KeyDef {
        key: IMPORT_MAX_UPLOAD_BYTES,
        kind: ValueKind::Integer,
        secret: false,
        default: "10485760",
        description: "Largest accepted import upload",
    },
    KeyDef {
        key: NOTIFICATIONS_ENABLED,
        kind: ValueKind::Boolean,
        secret: false,
        default: "false",
        description: "Enable notification delivery",
    },
    KeyDef {
        key: NOTIFICATIONS_EMAIL_SMTP_HOST,
        kind: ValueKind::Text,
        secret: false,
        default: "",
        description: "SMTP relay host",
    },
    KeyDef {
        key: NOTIFICATIONS_EMAIL_SMTP_PORT,
        kind: ValueKind::Integer,
        secret: false,
        default: "587",
        description: "SMTP relay port",
    },
    KeyDef {
        key: NOTIFICATIONS_EMAIL_SMTP_USERNAME,
        kind: ValueKind::Text,
        secret: false,
        default: "",
        description: "SMTP login",
    },
    KeyDef {
        key: NOTIFICATIONS_EMAIL_SMTP_PASSWORD,
        kind: ValueKind::Text,
        secret: true,
        default: "",
        description: "SMTP password",
    },
    KeyDef {
        key: NOTIFICATIONS_EMAIL_FROM_ADDRESS,
        kind: ValueKind::Text,
        secret: false,
        default: "",
        description: "Sender address for notification mail",
    },
    KeyDef {
        key: METRICS_ENABLED,
        kind: ValueKind::Boolean,
        secret: false,
        default: "true",
        description: "Expose the metrics endpoint",
    },
];

/// Dotted path -> definition
static KEY_INDEX: Lazy<HashMap<&'static str, &'static KeyDef>> =
    Lazy::new(|| REGISTRY.iter().map(|def| (def.key.0, def)).collect());

/// Environment variable name -> key, covering both plain and `_FILE` names
static ENV_INDEX: Lazy<HashMap<String, ConfigKey>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for def in REGISTRY {
        m.insert(def.key.env_var(), def.key);
        m.insert(def.key.file_env_var(), def.key);
    }
    m
});

/// Map a dotted key path to its environment variable name
///
/// `security.admin_api_key` → `SHELLY_SECURITY_ADMIN_API_KEY`
pub fn env_var_name(path: &str) -> String {
    format!("{}{}", ENV_PREFIX, path.replace('.', "_").to_uppercase())
}

/// Find the registered key an environment variable belongs to, if any
pub fn key_for_env_var(var: &str) -> Option<ConfigKey> {
    ENV_INDEX.get(var).copied()
}

/// True if `path` is a strict prefix of at least one registered key
pub(crate) fn is_section(path: &str) -> bool {
    REGISTRY.iter().any(|def| {
        def.key
            .0
            .strip_prefix(path)
            .is_some_and(|rest| rest.starts_with('.'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_env_var_name_mapping() {
        assert_eq!(env_var_name("security.admin_api_key"), "SHELLY_SECURITY_ADMIN_API_KEY");
        assert_eq!(env_var_name("export.output_directory"), "SHELLY_EXPORT_OUTPUT_DIRECTORY");
        assert_eq!(
            env_var_name("notifications.email.smtp_password"),
            "SHELLY_NOTIFICATIONS_EMAIL_SMTP_PASSWORD"
        );
    }

    #[test]
    fn test_file_env_var() {
        assert_eq!(
            NOTIFICATIONS_EMAIL_SMTP_PASSWORD.file_env_var(),
            "SHELLY_NOTIFICATIONS_EMAIL_SMTP_PASSWORD_FILE"
        );
    }

    #[test]
    fn test_registry_paths_unique() {
        let paths: HashSet<_> = REGISTRY.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(paths.len(), REGISTRY.len());
    }

    #[test]
    fn test_env_names_do_not_collide() {
        // A plain name must never equal another key's _FILE name, and the
        // dot/underscore mapping must not fold two keys onto one variable.
        let mut seen = HashSet::new();
        for def in REGISTRY {
            assert!(seen.insert(def.key.env_var()), "duplicate {}", def.key);
            assert!(seen.insert(def.key.file_env_var()), "duplicate {}", def.key);
        }
        assert_eq!(ENV_INDEX.len(), REGISTRY.len() * 2);
    }

    #[test]
    fn test_lookup_and_def() {
        let key = ConfigKey::lookup("security.admin_api_key").unwrap();
        assert_eq!(key, SECURITY_ADMIN_API_KEY);
        assert!(key.is_secret());
        assert_eq!(key.kind(), ValueKind::Text);
        assert!(ConfigKey::lookup("security").is_none());
        assert!(ConfigKey::lookup("security.admin_api_key.extra").is_none());
    }

    #[test]
    fn test_key_for_env_var() {
        assert_eq!(key_for_env_var("SHELLY_SERVER_PORT"), Some(SERVER_PORT));
        assert_eq!(key_for_env_var("SHELLY_SERVER_PORT_FILE"), Some(SERVER_PORT));
        assert_eq!(key_for_env_var("SHELLY_SERVER_PROT"), None);
        assert_eq!(key_for_env_var("shelly_server_port"), None);
    }

    #[test]
    fn test_is_section() {
        assert!(is_section("notifications"));
        assert!(is_section("notifications.email"));
        assert!(!is_section("notifications.email.smtp_host"));
        assert!(!is_section("notif"));
    }

    #[test]
    fn test_defaults_match_kind() {
        for def in REGISTRY {
            match def.kind {
                ValueKind::Integer => assert!(def.default.parse::<i64>().is_ok(), "{}", def.key),
                ValueKind::Boolean => assert!(matches!(def.default, "true" | "false"), "{}", def.key),
                ValueKind::Text | ValueKind::Path => {}
            }
        }
    }
}
