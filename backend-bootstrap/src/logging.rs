use std::fs;
use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "shoreline-backend.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Console logging, plus daily-rotated JSON files when `log_dir` is set.
/// The returned guard must stay alive for the file writer to flush.
pub fn init_logging(log_dir: Option<&str>) -> Result<Option<WorkerGuard>> {
    let console = fmt::layer().with_target(true).with_filter(env_filter());

    let Some(dir) = log_dir else {
        tracing_subscriber::registry().with(console).try_init()?;
        return Ok(None);
    };

    fs::create_dir_all(Path::new(dir))?;
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .json()
        .with_filter(env_filter());
    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()?;
    tracing::info!(log_dir = %dir, "file logging enabled");
    Ok(Some(guard))
}
