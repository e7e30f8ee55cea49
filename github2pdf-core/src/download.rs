use reqwest::{Client, StatusCode};

use crate::archive::{extract_files, ArchiveError};
use crate::config::FilterConfig;
use crate::contract::{DownloadError, Downloader, FileEntry};

/// Reference used when the caller does not name a branch or tag.
pub const DEFAULT_REFERENCE: &str = "master";

/// Describes a GitHub repository reference to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSource {
    /// Base URL of the repository, e.g. `https://github.com/org/repo`.
    pub repo_url: String,
    /// Branch or tag name.
    pub reference: String,
}

impl GitSource {
    pub fn new(repo_url: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            reference: reference.into(),
        }
    }

    /// `{repo_url}/archive/refs/heads/{reference}.zip`
    pub fn archive_url(&self) -> String {
        format!(
            "{}/archive/refs/heads/{}.zip",
            self.repo_url, self.reference
        )
    }
}

/// Downloads archives over HTTP with a single GET and no retries.
#[derive(Debug, Clone, Default)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Downloader for HttpDownloader {
    async fn download_archive(&self, source: &GitSource) -> Result<Vec<u8>, DownloadError> {
        let url = source.archive_url();
        tracing::info!(url = %url, reference = %source.reference, "Fetching repository archive");

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!(error = ?e, url = %url, "Failed to send archive request");
            DownloadError::Http {
                url: url.clone(),
                source: e,
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!(status = %status, url = %url, "Archive request returned non-200 status");
            return Err(DownloadError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::error!(error = ?e, url = %url, "Failed to read archive response body");
            DownloadError::Http {
                url: url.clone(),
                source: e,
            }
        })?;
        tracing::info!(url = %url, size = body.len(), "Downloaded repository archive");
        Ok(body.to_vec())
    }
}

/// Errors from the combined download-and-extract step.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Download(#[from] DownloadError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// Download the archive for `source` and return the files that pass `filter`, in archive order.
pub async fn fetch_repository<D>(
    downloader: &D,
    source: &GitSource,
    filter: &FilterConfig,
) -> Result<Vec<FileEntry>, FetchError>
where
    D: Downloader + ?Sized,
{
    let bytes = downloader.download_archive(source).await?;
    let entries = extract_files(&bytes, filter)?;
    tracing::info!(
        repo_url = %source.repo_url,
        reference = %source.reference,
        files = entries.len(),
        "Extracted useful files from archive"
    );
    Ok(entries)
}
