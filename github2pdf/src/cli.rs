//! # github2pdf CLI interface
//!
//! Command parsing and user-visible output for the `github2pdf` binary.
//! All fetching, filtering and rendering lives in [`github2pdf_core`]; this
//! module only turns arguments into a [`RunConfig`], runs the pipeline and
//! prints the one status line the user sees.
//!
//! - For command-line users: run the installed `github2pdf` binary with `--help`.
//! - For programmatic/integration use: call [`run`] with a constructed [`Cli`],
//!   or [`run_with`] to supply a custom [`Downloader`] and output path.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use github2pdf_core::config::RunConfig;
use github2pdf_core::contract::{DownloadError, Downloader};
use github2pdf_core::download::{GitSource, HttpDownloader, DEFAULT_REFERENCE};
use github2pdf_core::pipeline::{build_pdf, PipelineError, PipelineReport};

/// Download and process all non-Markdown files from a GitHub repository into a PDF.
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "github2pdf",
    version,
    about = "Download and process all non-Markdown files from a GitHub repository into a PDF."
)]
pub struct Cli {
    /// The URL of the GitHub repository
    pub repo_url: String,

    /// The branch or tag of the repository to download
    #[clap(long = "branch_or_tag", default_value = DEFAULT_REFERENCE)]
    pub branch_or_tag: String,
}

/// `{last path segment of repo_url}_all_files.pdf`
pub fn output_file_name(repo_url: &str) -> String {
    let name = repo_url.rsplit('/').next().unwrap_or(repo_url);
    format!("{name}_all_files.pdf")
}

/// Status code of a non-200 archive response, if that is what `err` is.
pub fn download_status_failure(err: &anyhow::Error) -> Option<u16> {
    match err.downcast_ref::<PipelineError>()?.download_error()? {
        DownloadError::Status { status, .. } => Some(*status),
        DownloadError::Http { .. } => None,
    }
}

/// Fetch over HTTP and write the PDF into the current working directory.
pub async fn run(cli: Cli) -> Result<PipelineReport> {
    let output_path = PathBuf::from(output_file_name(&cli.repo_url));
    run_with(cli, &HttpDownloader::new(), output_path).await
}

pub async fn run_with<D>(cli: Cli, downloader: &D, output_path: PathBuf) -> Result<PipelineReport>
where
    D: Downloader + ?Sized,
{
    let config = RunConfig::new(GitSource::new(cli.repo_url, cli.branch_or_tag), output_path);
    config.trace_loaded();

    match build_pdf(&config, downloader).await {
        Ok(report) => {
            println!(
                "All non-Markdown files from the repository have been saved to {}",
                report.output_path.display()
            );
            Ok(report)
        }
        Err(e) => {
            if let Some(DownloadError::Status { status, .. }) = e.download_error() {
                println!("Failed to download the repository. Status code: {status}");
            }
            tracing::error!(command = "github2pdf", error = %e, "Run failed");
            Err(e.into())
        }
    }
}
