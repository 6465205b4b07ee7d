//! In-memory logger that records every line

use parking_lot::Mutex;

use super::traits::{LogLevel, Logger};

/// A logger that keeps every message in memory
///
/// Tests use it to assert what the loader reported; the server uses it to
/// hold startup diagnostics until its subscriber is installed.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded lines, oldest first
    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().clone()
    }

    /// Recorded messages at exactly `level`
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// True if any recorded message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|(_, m)| m.contains(needle))
    }

    /// Forward every recorded line to another logger, oldest first
    pub fn replay(&self, target: &dyn Logger) {
        for (level, message) in self.lines.lock().iter() {
            target.log(*level, message);
        }
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, message: &str) {
        self.lines.lock().push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_logger_records_levels() {
        let logger = MemoryLogger::new();
        logger.debug("one");
        logger.warn("two");
        logger.warn("three");

        assert_eq!(logger.lines().len(), 3);
        assert_eq!(logger.messages_at(LogLevel::Warn), vec!["two", "three"]);
        assert!(logger.contains("one"));
        assert!(!logger.contains("four"));
    }

    #[test]
    fn test_replay_preserves_order() {
        let buffered = MemoryLogger::new();
        buffered.warn("first");
        buffered.info("second");

        let target = MemoryLogger::new();
        buffered.replay(&target);
        assert_eq!(
            target.lines(),
            vec![(LogLevel::Warn, "first".to_string()), (LogLevel::Info, "second".to_string())]
        );
    }

    #[test]
    fn test_log_macros() {
        let logger = MemoryLogger::new();
        crate::log_info!(logger, "port {}", 8080);
        assert_eq!(logger.messages_at(LogLevel::Info), vec!["port 8080"]);
    }
}
