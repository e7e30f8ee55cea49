//! # contract: shared data types and the download seam
//!
//! Everything that crosses a module boundary in the pipeline lives here:
//!
//! - [`FileEntry`]: one included source file, produced by the archive
//!   extractor and consumed by the PDF renderer.
//! - [`FileOutcome`] / [`SkipReason`]: the per-entry result of classifying an
//!   archive entry, so callers and tests can see why a file was left out.
//! - [`Downloader`]: the async trait that fetches the raw archive bytes for a
//!   [`GitSource`](crate::download::GitSource).
//!
//! ## Mocking & Testing
//! - [`Downloader`] is annotated for `mockall`; `MockDownloader` is exported
//!   under `cfg(test)` and the default `test-export-mocks` feature so
//!   downstream crates can drive the pipeline without the network.

use async_trait::async_trait;
use mockall::automock;

use crate::download::GitSource;

/// A source file that passed every filter, with its decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path inside the archive, including the `{repo}-{ref}/` prefix GitHub adds.
    pub path: String,
    pub content: String,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Why an archive entry was not included in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry is a directory record (name ends with `/`).
    Directory,
    /// Hidden, test-related, excluded directory, utility/config or doc file.
    NotUseful,
    /// `.md` file.
    Markdown,
    /// A null byte was found within the binary probe window.
    Binary,
    /// The bytes are not valid UTF-8.
    NotUtf8,
    /// Fewer substantive lines than the configured minimum.
    InsufficientContent,
}

/// Result of classifying a single archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Included(FileEntry),
    Skipped { path: String, reason: SkipReason },
}

impl FileOutcome {
    pub fn path(&self) -> &str {
        match self {
            FileOutcome::Included(entry) => &entry.path,
            FileOutcome::Skipped { path, .. } => path,
        }
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            FileOutcome::Included(_) => None,
            FileOutcome::Skipped { reason, .. } => Some(*reason),
        }
    }

    pub fn into_entry(self) -> Option<FileEntry> {
        match self {
            FileOutcome::Included(entry) => Some(entry),
            FileOutcome::Skipped { .. } => None,
        }
    }
}

/// Errors raised while fetching a repository archive.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The server answered with something other than `200 OK`.
    #[error("GET {url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl DownloadError {
    /// HTTP status code, if the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DownloadError::Status { status, .. } => Some(*status),
            DownloadError::Http { source, .. } => source.status().map(|s| s.as_u16()),
        }
    }
}

/// Fetches the zip archive of a repository reference.
/// Implemented by [`HttpDownloader`](crate::download::HttpDownloader) and by mocks in tests.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download the archive for `source` and return its raw bytes, fully in memory.
    async fn download_archive(&self, source: &GitSource) -> Result<Vec<u8>, DownloadError>;
}
