//! Logging utilities.
//!
//! Centralizes logger initialization and the GPU driver diagnostic filter.
//! Everything goes through the `log` facade; `env_logger` formats and writes.

mod diagnostics;
mod init;

pub use diagnostics::{DiagnosticFilter, DiagnosticLogger, DEFAULT_SUPPRESSED_IDS};
pub use init::{init_logging, LoggingConfig};
