use std::sync::OnceLock;

use super::diagnostics::{DiagnosticFilter, DiagnosticLogger};

/// `filter` takes `env_logger` directives ("info",
/// "raylume_engine::render=debug"); when unset `RUST_LOG` is consulted, then
/// `info`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter:      Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Cap and suppression list for wgpu/naga records.
    pub driver:      DiagnosticFilter,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            write_style: env_logger::WriteStyle::Auto,
            driver: DiagnosticFilter::default(),
        }
    }
}

static INSTALLED: OnceLock<log::LevelFilter> = OnceLock::new();

/// Installs the global logger. Later calls are no-ops.
pub fn init_logging(config: LoggingConfig) {
    INSTALLED.get_or_init(|| {
        let directives = config.filter.clone().or_else(|| std::env::var("RUST_LOG").ok());
        let logger = DiagnosticLogger::new(build(directives.as_deref(), &config), config.driver);
        let level = logger.max_level();

        // another logger may already own the facade (test harnesses)
        if log::set_boxed_logger(Box::new(logger)).is_ok() {
            log::set_max_level(level);
        }
        log::debug!("logger installed at {level}");
        level
    });
}

fn build(directives: Option<&str>, config: &LoggingConfig) -> env_logger::Logger {
    let mut builder = env_logger::Builder::new();

    // Driver caps go in first so explicit directives can still raise them.
    for target in DiagnosticFilter::DRIVER_TARGETS {
        builder.filter_module(target, config.driver.max_level);
    }
    match directives {
        Some(d) => builder.parse_filters(d),
        None => builder.filter_level(log::LevelFilter::Info),
    };

    builder.write_style(config.write_style).build()
}
