use crate::error::ConfigError;
use crate::settings::LoggingSettings;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global `tracing` subscriber for a run.
///
/// Human-readable output goes to stderr so stdout stays free for the summary
/// table. `RUST_LOG` takes precedence over `settings.level`. When
/// `settings.file` is set, the same events are also appended, without ANSI
/// colors, to that file inside `log_dir`. Writes are synchronous.
pub fn init_logging(settings: &LoggingSettings, log_dir: &Path) -> Result<(), ConfigError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)
            .map_err(|e| ConfigError::LoggingError(format!("invalid level '{}': {e}", settings.level)))?,
    };

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let result = match &settings.file {
        Some(file_name) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(file_name)
                .build(log_dir)
                .map_err(|e| ConfigError::LoggingError(format!("cannot open log file '{file_name}': {e}")))?;
            let file_layer = fmt::layer().with_ansi(false).with_writer(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
        }
        None => tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init(),
    };

    result.map_err(|e| ConfigError::LoggingError(e.to_string()))
}
