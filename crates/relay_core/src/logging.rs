use anyhow::Result;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// File name prefix for the daily-rotated log files.
const LOG_FILE_PREFIX: &str = "relay";

/// Filter directive applying `level` to the workspace crates.
pub fn default_filter(level: &str) -> String {
    format!("{level},relay_core={level},relay_ai={level},relay_app={level}")
}

/// Installs the global subscriber: a daily-rolling file in `logs_dir`, plus
/// compact stderr output when `console` is set. `RUST_LOG` overrides
/// `level`.
///
/// Returns a guard that must be kept alive for the duration of the app.
pub fn init_logging(logs_dir: &Path, level: &str, console: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)?;

    let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    // stdout belongs to the REPL.
    let console_layer = console.then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .with(console_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    Ok(guard)
}
