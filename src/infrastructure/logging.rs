use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::domain::DomainError;

/// Initialize the logging system.
///
/// Console logs go to stderr: stdout carries the interactive prompts and the
/// transcription itself. File logging (JSON, daily rotation) is optional.
///
/// Returns a guard that must be kept alive for the duration of the
/// application; dropping it flushes any remaining logs.
pub fn init_logging(
    logs_dir: &Path,
    level: &str,
    file_logging: bool,
) -> Result<Option<WorkerGuard>, DomainError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("voxnote={},warn", level)));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(env_filter);

    if file_logging {
        fs::create_dir_all(logs_dir)?;

        let file_appender = RollingFileAppender::new(Rotation::DAILY, logs_dir, "voxnote.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .json()
            .with_filter(EnvFilter::new(format!("voxnote={}", level)));

        // try_init so a second call (e.g. from tests) does not panic
        let _ = tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .try_init();

        Ok(Some(guard))
    } else {
        let _ = tracing_subscriber::registry().with(console_layer).try_init();

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_logging_initialization() {
        let dir = tempdir().unwrap();
        let logs_dir = dir.path().join("logs");

        let guard = init_logging(&logs_dir, "info", true).unwrap();
        assert!(guard.is_some());
        assert!(logs_dir.exists());
    }
}
