use anyhow::Result;
use clap::Parser;
use github2pdf::cli::{download_status_failure, run, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the status lines, so logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("CLI application startup: tracing initialised");

    let cli = Cli::parse();
    tracing::info!("CLI arguments parsed, invoking run");
    match run(cli).await {
        Ok(report) => {
            tracing::info!(files = report.files.len(), "CLI completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "CLI exited with error");
            if download_status_failure(&e).is_some() {
                std::process::exit(1);
            }
            Err(e)
        }
    }
}
