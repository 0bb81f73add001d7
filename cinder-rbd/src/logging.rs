//! Tracing subscriber setup for processes hosting the driver.

use std::path::Path;

use cinder_shared::{CinderError, CinderResult};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Build the filter: `RUST_LOG` when set and valid, else `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber.
///
/// Logs go to stderr, or to `log_file` when given. For a log file the
/// returned guard must stay alive until exit so buffered lines get flushed.
/// Calling this when a subscriber is already installed is a no-op.
pub fn init_tracing(
    default_level: &str,
    log_file: Option<&Path>,
) -> CinderResult<Option<WorkerGuard>> {
    let filter = env_filter(default_level);

    let Some(log_file) = log_file else {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .try_init();
        return Ok(None);
    };

    let file_name = log_file.file_name().ok_or_else(|| {
        CinderError::Config(format!("Invalid log file path: {}", log_file.display()))
    })?;
    let dir = match log_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| {
        CinderError::Config(format!(
            "Failed to create log directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    register_to_tracing(non_blocking, filter);
    Ok(Some(guard))
}

fn register_to_tracing(non_blocking: NonBlocking, env_filter: EnvFilter) {
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(false),
        )
        .try_init();
}
