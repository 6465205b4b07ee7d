//! Injectable diagnostics for the config loader
//!
//! The server forwards to `tracing` via [`TracingLogger`]; tests capture
//! lines with [`MemoryLogger`].

mod traits;
mod noop;
mod memory;
mod tracing_logger;

pub use traits::{LogLevel, Logger, SharedLogger};
pub use noop::NoOpLogger;
pub use memory::MemoryLogger;
pub use tracing_logger::TracingLogger;
