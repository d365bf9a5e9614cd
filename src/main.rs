use anyhow::{Context, Result};
use clap::Parser;
use job_prep::cli::{self, Cli};
use job_prep::core::ConfigManager;
use std::fs::OpenOptions;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "/tmp/jobprep.log";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = std::env::var("JOBPREP_LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(std::sync::Mutex::new(file))
                .with_current_span(true)
                .with_span_list(false),
        )
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("job_prep=info,jobprep=info,rocket=warn")),
        )
        .init();

    let config = ConfigManager::load()?;

    info!(
        "Environment: {}",
        std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string())
    );
    info!("Logging to {}", log_path);

    cli::run(cli, config).await
}
