//! Process logging for the service itself
//!
//! Console output plus two daily-rolling files when a log directory is set:
//! `app.log` receives every enabled event, `error.log` only ERROR events.
//! Each rotates daily and only the newest [`LOG_RETENTION_FILES`] files of
//! each kind are kept.

use crate::config::{LogFormat, LoggingConfig};
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Rotated files kept per log kind (ten days at daily rotation)
pub const LOG_RETENTION_FILES: usize = 10;

/// Keeps the background file writers alive; drop it last to flush them
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _guards: Vec<WorkerGuard>,
}

/// Initialize tracing/logging
///
/// `RUST_LOG` takes precedence over `cfg.level`. Can only succeed once per
/// process.
pub fn init_tracing(cfg: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))?;

    let (console_text, console_json) = match cfg.format {
        LogFormat::Text => (Some(fmt::layer().with_target(true)), None),
        LogFormat::Json => (None, Some(fmt::layer().json().with_target(true))),
    };

    let mut guards = Vec::new();
    let (app_file, error_file) = match &cfg.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;

            let (app_writer, app_guard) =
                tracing_appender::non_blocking(rolling_file(dir, "app.log")?);
            let (error_writer, error_guard) =
                tracing_appender::non_blocking(rolling_file(dir, "error.log")?);
            guards.push(app_guard);
            guards.push(error_guard);

            (
                Some(fmt::layer().with_ansi(false).with_writer(app_writer)),
                Some(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(error_writer.with_max_level(Level::ERROR)),
                ),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_text)
        .with(console_json)
        .with(app_file)
        .with(error_file)
        .try_init()?;

    Ok(LoggingGuard { _guards: guards })
}

fn rolling_file(dir: &Path, name: &str) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(name)
        .max_log_files(LOG_RETENTION_FILES)
        .build(dir)
}

/// Console-only logging for short-lived CLI commands
pub fn init_console_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}
