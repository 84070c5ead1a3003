use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use backend_infrastructure::{AppConfig, ConfigSource};

#[derive(Parser, Debug)]
#[command(name = "shoreline-backend")]
#[command(about = "Shoreline cleanup coordination backend", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// Directory for rotated log files, overrides `log_dir` from the config
    #[arg(long)]
    log_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref()).await?;
    let log_dir = args.log_dir.or_else(|| config.log_dir.clone());
    let _log_guard = backend_bootstrap::logging::init_logging(log_dir.as_deref())?;
    match &config.source {
        ConfigSource::File(path) => info!(path = %path, "config file loaded"),
        ConfigSource::Missing(path) => warn!(path = %path, "config file not found, using defaults"),
        ConfigSource::Defaults => info!("using default configuration"),
    }
    info!(
        bind_addr = %config.bind_addr,
        store_backend = %config.store_backend,
        "configuration loaded"
    );

    backend_bootstrap::run_standalone(config).await
}
