use std::path::PathBuf;
use tracing::{debug, info};

use crate::code_to_pdf::PageLayout;
use crate::download::GitSource;

const EXCLUDED_DIRS: [&str; 8] = [
    "examples",
    "tests",
    "test",
    "scripts",
    "utils",
    "benchmarks",
    "__pycache__",
    "vendor",
];
const UTILITY_OR_CONFIG_FILES: [&str; 5] =
    ["hubconf.py", "setup.py", "go.mod", "go.sum", "Makefile"];
const WORKFLOW_OR_DOC_MARKERS: [&str; 4] = [".github", ".gitignore", "LICENSE", "README"];
const COMMENT_PREFIXES: [&str; 2] = ["#", "//"];

/// Inclusion heuristics applied to every archive entry.
///
/// `FilterConfig::default()` holds the built-in rules; tests build their own
/// values to exercise individual knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Directory names excluded when they appear as a whole path segment.
    pub excluded_dirs: Vec<String>,
    /// Substrings identifying utility or build config files.
    pub utility_files: Vec<String>,
    /// Substrings identifying workflow, licence and readme files.
    pub doc_markers: Vec<String>,
    /// Line prefixes that make a trimmed line a comment.
    pub comment_prefixes: Vec<String>,
    pub min_line_count: usize,
    /// Number of leading bytes searched for a null byte.
    pub binary_probe_len: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        let owned = |items: &[&str]| -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        };
        Self {
            excluded_dirs: owned(&EXCLUDED_DIRS),
            utility_files: owned(&UTILITY_OR_CONFIG_FILES),
            doc_markers: owned(&WORKFLOW_OR_DOC_MARKERS),
            comment_prefixes: owned(&COMMENT_PREFIXES),
            min_line_count: 10,
            binary_probe_len: 1024,
        }
    }
}

/// Everything a single invocation needs: what to fetch, how to filter it and where to write it.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: GitSource,
    pub output_path: PathBuf,
    pub filter: FilterConfig,
    pub layout: PageLayout,
}

impl RunConfig {
    pub fn new(source: GitSource, output_path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            output_path: output_path.into(),
            filter: FilterConfig::default(),
            layout: PageLayout::default(),
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            repo_url = %self.source.repo_url,
            reference = %self.source.reference,
            output_path = %self.output_path.display(),
            min_line_count = self.filter.min_line_count,
            "Loaded RunConfig"
        );
        debug!(?self, "RunConfig loaded (full debug)");
    }
}
