//! Diagnostics for the CLI.
//!
//! Human-readable events go to stderr, never stdout, so `--json` and
//! `--quiet` output stays machine-readable. `--log-file` adds a JSON layer
//! written through a daily-rotated appender.

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{BugsinkError, Result};

const DEFAULT_LOG_NAME: &str = "bugsink.log";

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `verbose`. Fails when the log file cannot be opened;
/// a subscriber installed earlier in the process is left in place.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let file_layer = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_writer(file_appender(path)?)
                .with_ansi(false)
                .json(),
        ),
        None => None,
    };

    let installed = tracing_subscriber::registry()
        .with(filter(verbose))
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
    if installed.is_err() {
        tracing::debug!("subscriber already installed");
    }
    Ok(())
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "warn" };
        EnvFilter::new(format!("bugsink={}", level))
    })
}

/// Daily appender for `path`; the file name becomes the rotation prefix.
fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_LOG_NAME.to_string());

    std::fs::create_dir_all(dir).map_err(|e| log_file_error(path, e))?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .build(dir)
        .map_err(|e| log_file_error(path, e))
}

fn log_file_error(path: &Path, cause: impl std::fmt::Display) -> BugsinkError {
    BugsinkError::Config(format!(
        "Cannot open log file {}: {}",
        path.display(),
        cause
    ))
}
