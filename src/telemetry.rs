//! Tracing setup.
//!
//! Events go to stdout and to a single never-rotated file,
//! `<log_dir>/group-editor.log`. The level is controlled by `RUST_LOG` and
//! defaults to INFO.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

pub const LOG_FILE: &str = "group-editor.log";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop, so it must live for
/// the whole process. Fails with [`AppError::Config`] when the log file
/// cannot be created.
pub fn init(log_dir: &Path) -> Result<WorkerGuard, AppError> {
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(log_dir)?);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    Ok(guard)
}

/// The log file writer, creating `log_dir` if needed.
fn file_appender(log_dir: &Path) -> Result<RollingFileAppender, AppError> {
    std::fs::create_dir_all(log_dir).map_err(|e| {
        AppError::Config(format!(
            "cannot create log directory {}: {e}",
            log_dir.display()
        ))
    })?;
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(log_dir)
        .map_err(|e| {
            AppError::Config(format!(
                "cannot open log file in {}: {e}",
                log_dir.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_appender_creates_directory_and_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log_dir = dir.path().join("logs").join("nested");
        file_appender(&log_dir).expect("appender");
        assert!(log_dir.join(LOG_FILE).is_file());
    }

    #[test]
    fn log_dir_that_is_a_file_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let not_a_dir = dir.path().join("occupied");
        std::fs::write(&not_a_dir, b"x").expect("seed");
        let result = file_appender(&not_a_dir);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
