//! Recursive directory listing.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use walkdir::WalkDir;

use super::{Tool, ToolError};

/// Maximum number of entries returned by `list_files`.
pub const LIST_LIMIT: usize = 50;

/// Entries whose name contains any of these are skipped along with their contents.
const EXCLUDED_NAMES: &[&str] = &[".git", "node_modules", "__pycache__"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListFilesParams {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl ListFilesParams {
    pub fn root(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new("."))
    }
}

/// List files and directories under a path.
pub struct ListFiles;

#[async_trait]
impl Tool for ListFiles {
    type Params = ListFilesParams;

    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "Lists files in a directory."
    }

    fn parameters_doc(&self) -> &str {
        "`path` (string)"
    }

    async fn execute(&self, params: ListFilesParams) -> Result<String, ToolError> {
        let root = params.root().to_path_buf();
        let listing = root.clone();
        tokio::task::spawn_blocking(move || list_entries(&listing))
            .await
            .map_err(|e| ToolError::io("failed to list", root, std::io::Error::other(e)))
    }
}

/// Walk `root` in name order and render at most [`LIST_LIMIT`] entries.
///
/// Hidden entries (leading `.`) are skipped with their contents. Unreadable
/// entries and a missing root are skipped silently, which yields an empty
/// listing rather than an error.
fn list_entries(root: &Path) -> String {
    let mut entries: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || is_listed(&e.file_name().to_string_lossy()))
        .filter_map(Result::ok)
        .map(|e| e.path().display().to_string())
        .take(LIST_LIMIT + 1)
        .collect();

    let truncated = entries.len() > LIST_LIMIT;
    entries.truncate(LIST_LIMIT);

    let mut output = entries.join("\n");
    if truncated {
        output.push_str("\n... (truncated)");
    }
    output
}

fn is_listed(name: &str) -> bool {
    !name.starts_with('.') && !EXCLUDED_NAMES.iter().any(|excluded| name.contains(excluded))
}
