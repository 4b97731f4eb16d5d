//! Structured logging setup using `tracing-subscriber` and `tracing-appender`.
//!
//! Always logs human-readable lines to stderr. When a log directory is
//! given, JSON lines are additionally written to
//! `{logs_dir}/discord-relay.log.YYYY-MM-DD` with daily rotation.
//!
//! `RUST_LOG` takes precedence; otherwise the level comes from `LOG_LEVEL`
//! (or `--log-level`), default `info`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Environment variable holding the operator's log level.
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

/// Holds the non-blocking writer guard for file logging.
///
/// The [`WorkerGuard`] must be kept alive for the duration of the process.
/// Dropping it flushes pending log entries and closes the file.
pub struct LoggingGuard {
    _guard: Option<WorkerGuard>,
}

/// Map an operator-supplied level to a tracing filter directive.
///
/// Accepts tracing names and the Python-style spellings operators tend to
/// carry over (`WARNING`, `CRITICAL`, `FATAL`). Unknown values fall back to
/// `info`.
pub fn normalize_level(raw: &str) -> &'static str {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" | "critical" | "fatal" => "error",
        "off" => "off",
        _ => "info",
    }
}

/// Initialise the global subscriber.
///
/// Returns a [`LoggingGuard`] that must be kept alive for log flushing.
///
/// # Errors
///
/// Returns an error if the logs directory cannot be created or a global
/// subscriber is already installed.
pub fn init(level: &str, logs_dir: Option<&Path>) -> anyhow::Result<LoggingGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(normalize_level(level)));

    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match logs_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                anyhow::anyhow!("failed to create logs directory {}: {e}", dir.display())
            })?;
            let file_appender = tracing_appender::rolling::daily(dir, "discord-relay.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    Ok(LoggingGuard { _guard: guard })
}
