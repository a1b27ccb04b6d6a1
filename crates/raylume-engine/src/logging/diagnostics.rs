//! GPU driver diagnostics.
//!
//! wgpu forwards validation-layer and GL debug-output messages through `log`
//! under its own targets. Some driver IDs fire every frame and carry no
//! actionable information; `DiagnosticLogger` drops those before they reach
//! the formatter and leaves every other record untouched.

/// NVIDIA GL debug-output IDs that are informational only
/// (buffer placement hints, usage hints, shader recompiles on state change).
pub const DEFAULT_SUPPRESSED_IDS: [u32; 4] = [131169, 131185, 131218, 131204];

/// Severity cap and suppression list for driver-originated records.
#[derive(Debug, Clone)]
pub struct DiagnosticFilter {
    /// Most verbose level let through for driver targets.
    pub max_level: log::LevelFilter,

    /// Diagnostic IDs whose records are discarded regardless of level.
    pub suppressed_ids: Vec<u32>,
}

impl DiagnosticFilter {
    /// Log targets treated as "driver" output.
    pub const DRIVER_TARGETS: [&'static str; 3] = ["wgpu_hal", "wgpu_core", "naga"];

    /// Returns `true` when `target` belongs to the GPU driver stack.
    pub fn is_driver_target(target: &str) -> bool {
        Self::DRIVER_TARGETS
            .iter()
            .any(|prefix| target.starts_with(prefix))
    }

    /// Returns `true` when a driver record should be dropped.
    ///
    /// wgpu-hal formats GL debug output as `... ID <id> : <message>`; the ID is
    /// matched as a whole token so `ID 1311690` does not hide `131169`.
    pub fn suppresses(&self, target: &str, message: &str) -> bool {
        if !Self::is_driver_target(target) {
            return false;
        }

        let mut tokens = message.split_whitespace();
        while let Some(token) = tokens.next() {
            if token != "ID" {
                continue;
            }
            let Some(id) = tokens.next().and_then(|t| t.parse::<u32>().ok()) else {
                continue;
            };
            if self.suppressed_ids.contains(&id) {
                return true;
            }
        }
        false
    }
}

impl Default for DiagnosticFilter {
    fn default() -> Self {
        Self {
            max_level: log::LevelFilter::Warn,
            suppressed_ids: DEFAULT_SUPPRESSED_IDS.to_vec(),
        }
    }
}

/// `log::Log` adapter wrapping an `env_logger::Logger` with a `DiagnosticFilter`.
pub struct DiagnosticLogger {
    inner: env_logger::Logger,
    filter: DiagnosticFilter,
}

impl DiagnosticLogger {
    pub fn new(inner: env_logger::Logger, filter: DiagnosticFilter) -> Self {
        Self { inner, filter }
    }

    /// Maximum level any record can pass with.
    pub fn max_level(&self) -> log::LevelFilter {
        self.inner.filter()
    }
}

impl log::Log for DiagnosticLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.inner.matches(record) {
            return;
        }

        if DiagnosticFilter::is_driver_target(record.target()) {
            let message = record.args().to_string();
            if self.filter.suppresses(record.target(), &message) {
                return;
            }
        }

        self.inner.log(record);
    }

    fn flush(&self) {
        self.inner.flush();
    }
}
