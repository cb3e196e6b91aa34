//! Logging setup: console (pretty or JSON) plus a non-blocking daily log file

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::settings::Settings;

const LOG_FILE_PREFIX: &str = "launchcheck.log";

/// Install the global subscriber
///
/// The returned guard flushes the file writer when dropped; keep it alive
/// until the process is about to exit.
pub fn init(settings: &Settings, verbose: bool) -> Result<WorkerGuard> {
    let log_dir = settings.log_path();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX));

    let default_level = if verbose { "launchcheck=debug" } else { "launchcheck=info" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("Failed to create env filter")?;

    match settings.log_format.as_str() {
        "json" => {
            // Machine consumption: JSON on both sinks
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .with(fmt::layer().json().with_writer(file_writer))
                .try_init()
        }
        _ => {
            // Interactive: colored console, plain file
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .with(fmt::layer().with_ansi(false).with_writer(file_writer))
                .try_init()
        }
    }
    .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
