//! In-memory zip extraction: walks every entry of a downloaded archive in
//! order and decides, per entry, whether it ends up in the document.
//!
//! [`classify_archive`] reports a [`FileOutcome`] for every entry;
//! [`extract_files`] keeps only the included ones.

use std::io::{Cursor, Read};

use tracing::debug;
use zip::ZipArchive;

use crate::config::FilterConfig;
use crate::contract::{FileEntry, FileOutcome, SkipReason};
use crate::filter::{has_sufficient_content, is_binary, is_likely_useful_file, is_markdown_file};

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("malformed zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("failed to read archive entry {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Path-level checks, in order. Returns the reason for the first rule that fires.
fn path_skip_reason(path: &str, config: &FilterConfig) -> Option<SkipReason> {
    if path.ends_with('/') {
        Some(SkipReason::Directory)
    } else if !is_likely_useful_file(path, config) {
        Some(SkipReason::NotUseful)
    } else if is_markdown_file(path) {
        Some(SkipReason::Markdown)
    } else {
        None
    }
}

/// Full classification of one entry: path rules first, then content rules.
pub fn classify_entry(path: &str, bytes: Vec<u8>, config: &FilterConfig) -> FileOutcome {
    match path_skip_reason(path, config) {
        Some(reason) => FileOutcome::Skipped {
            path: path.to_string(),
            reason,
        },
        None => classify_content(path, bytes, config),
    }
}

fn classify_content(path: &str, bytes: Vec<u8>, config: &FilterConfig) -> FileOutcome {
    let skipped = |reason| FileOutcome::Skipped {
        path: path.to_string(),
        reason,
    };
    if is_binary(&bytes, config.binary_probe_len) {
        return skipped(SkipReason::Binary);
    }
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(_) => return skipped(SkipReason::NotUtf8),
    };
    if !has_sufficient_content(&text, config) {
        return skipped(SkipReason::InsufficientContent);
    }
    FileOutcome::Included(FileEntry::new(path, text))
}

/// Classify every entry of the zip held in `bytes`, preserving archive order.
///
/// Entries rejected by their path alone are never decompressed.
pub fn classify_archive(bytes: &[u8], config: &FilterConfig) -> Result<Vec<FileOutcome>, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut outcomes = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        let path = file.name().to_string();

        let outcome = match path_skip_reason(&path, config) {
            Some(reason) => FileOutcome::Skipped { path, reason },
            None => {
                let mut buf = Vec::new();
                file.read_to_end(&mut buf).map_err(|e| ArchiveError::Read {
                    path: path.clone(),
                    source: e,
                })?;
                classify_content(&path, buf, config)
            }
        };

        if let Some(reason) = outcome.skip_reason() {
            debug!(path = outcome.path(), ?reason, "Skipping archive entry");
        }
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

/// The included files of the archive, in archive order.
pub fn extract_files(bytes: &[u8], config: &FilterConfig) -> Result<Vec<FileEntry>, ArchiveError> {
    let entries: Vec<FileEntry> = classify_archive(bytes, config)?
        .into_iter()
        .filter_map(FileOutcome::into_entry)
        .collect();
    debug!(included = entries.len(), "Archive extraction finished");
    Ok(entries)
}
