//! Logger that discards everything

use super::traits::{LogLevel, Logger};

/// Discards every diagnostic; the default for [`ConfigLoader`](crate::resolver::ConfigLoader)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl NoOpLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for NoOpLogger {
    fn log(&self, _level: LogLevel, _message: &str) {}
}
