//! High-level pipeline: download → filter → render for one repository reference.
//!
//! # Responsibilities
//! - Fail fast: a download or archive error stops the run before anything is written
//! - Per-file problems (binary, not UTF-8, too short) are skips, never errors
//! - Returns a [`PipelineReport`] naming every file that made it into the PDF
//!
//! # Callable From
//! - The CLI crate and integration tests, with any [`Downloader`] implementation

use std::path::PathBuf;

use tracing::{error, info};

use crate::code_to_pdf::{write_pdf, CodeToPdfError};
use crate::config::RunConfig;
use crate::contract::{DownloadError, Downloader};
use crate::download::{fetch_repository, FetchError};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Render(#[from] CodeToPdfError),
}

impl PipelineError {
    /// The download error, if the run failed while fetching the archive.
    pub fn download_error(&self) -> Option<&DownloadError> {
        match self {
            PipelineError::Fetch(FetchError::Download(e)) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub output_path: PathBuf,
    /// Archive paths of the rendered files, in document order.
    pub files: Vec<String>,
}

pub async fn build_pdf<D>(config: &RunConfig, downloader: &D) -> Result<PipelineReport, PipelineError>
where
    D: Downloader + ?Sized,
{
    info!(repo_url = %config.source.repo_url, "[PIPELINE] Starting");

    let entries = match fetch_repository(downloader, &config.source, &config.filter).await {
        Ok(entries) => entries,
        Err(e) => {
            error!(error = %e, "[PIPELINE][ERROR] Fetching repository failed");
            return Err(e.into());
        }
    };

    if let Err(e) = write_pdf(&entries, &config.layout, &config.output_path) {
        error!(error = %e, path = %config.output_path.display(), "[PIPELINE][ERROR] Rendering PDF failed");
        return Err(e.into());
    }

    let report = PipelineReport {
        output_path: config.output_path.clone(),
        files: entries.into_iter().map(|entry| entry.path).collect(),
    };
    info!(files = report.files.len(), "[PIPELINE] Complete");
    Ok(report)
}
