//! Logger that forwards to `tracing`

use super::traits::{LogLevel, Logger};

/// Bridges the [`Logger`] trait onto the `tracing` macros.
///
/// The server installs a `tracing-subscriber` and hands this logger to the
/// config loader so resolver diagnostics land in the same output stream.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    target: &'static str,
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl TracingLogger {
    pub fn new() -> Self {
        Self { target: "shelly_core" }
    }

    /// Use a custom component label, emitted as the `component` field
    pub fn with_target(target: &'static str) -> Self {
        Self { target }
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!(component = self.target, "{}", message),
            LogLevel::Info => tracing::info!(component = self.target, "{}", message),
            LogLevel::Warn => tracing::warn!(component = self.target, "{}", message),
            LogLevel::Error => tracing::error!(component = self.target, "{}", message),
        }
    }
}
