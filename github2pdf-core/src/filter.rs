//! Path and content heuristics deciding which archive entries are worth printing.
//!
//! All predicates take the [`FilterConfig`] explicitly; there is no global rule table.

use crate::config::FilterConfig;

/// True if the leading `probe_len` bytes contain a null byte.
pub fn is_binary(bytes: &[u8], probe_len: usize) -> bool {
    let end = bytes.len().min(probe_len);
    bytes[..end].contains(&0)
}

/// Only the literal `.md` suffix counts; `.markdown` files are kept.
pub fn is_markdown_file(path: &str) -> bool {
    path.to_lowercase().ends_with(".md")
}

/// Excludes hidden entries, anything test related, excluded directories,
/// utility/config files and workflow/doc files.
pub fn is_likely_useful_file(path: &str, config: &FilterConfig) -> bool {
    if path.split('/').any(|part| part.starts_with('.')) {
        return false;
    }
    if path.to_lowercase().contains("test") {
        return false;
    }
    let in_excluded_dir = config.excluded_dirs.iter().any(|dir| {
        path.contains(&format!("/{dir}/")) || path.starts_with(&format!("{dir}/"))
    });
    if in_excluded_dir {
        return false;
    }
    if config.utility_files.iter().any(|name| path.contains(name.as_str())) {
        return false;
    }
    if config.doc_markers.iter().any(|marker| path.contains(marker.as_str())) {
        return false;
    }
    true
}

/// Number of lines that are non-blank and not comments once trimmed.
pub fn substantive_line_count(text: &str, config: &FilterConfig) -> usize {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            !config
                .comment_prefixes
                .iter()
                .any(|prefix| line.starts_with(prefix.as_str()))
        })
        .count()
}

pub fn has_sufficient_content(text: &str, config: &FilterConfig) -> bool {
    substantive_line_count(text, config) >= config.min_line_count
}
