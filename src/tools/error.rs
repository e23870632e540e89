//! Tool failure taxonomy and its text rendering.

use std::path::PathBuf;

use thiserror::Error;

use crate::search::SearchError;

/// Coarse category of a tool failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    /// A referenced file does not exist
    NotFound,
    /// The tool name is not one of the known tools
    UnknownOperation,
    /// Parameters were missing, mistyped or empty
    InvalidInput,
    /// Network or HTTP failure during a search
    Transport,
    /// File-system or process failure
    Execution,
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("File {} not found.", .0.display())]
    NotFound(PathBuf),

    #[error("Unknown tool {0}")]
    UnknownTool(String),

    #[error("invalid parameters for {tool}: {source}")]
    InvalidParams {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to execute command: {0}")]
    Command(#[source] std::io::Error),

    #[error("command timed out after {0} seconds")]
    CommandTimeout(u64),

    #[error(transparent)]
    Search(#[from] SearchError),
}

impl ToolError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ToolErrorKind {
        match self {
            Self::NotFound(_) => ToolErrorKind::NotFound,
            Self::UnknownTool(_) => ToolErrorKind::UnknownOperation,
            Self::InvalidParams { .. } | Self::Search(SearchError::EmptyQuery) => {
                ToolErrorKind::InvalidInput
            }
            Self::Search(_) => ToolErrorKind::Transport,
            Self::Io { .. } | Self::Command(_) | Self::CommandTimeout(_) => ToolErrorKind::Execution,
        }
    }

    /// Text shown to the model in place of a tool result.
    ///
    /// Expected conditions (missing file, unknown tool, empty query) read as
    /// `Error: ...`; anything else is a `System Error: ...`.
    pub fn render(&self) -> String {
        match self {
            Self::NotFound(_) | Self::UnknownTool(_) | Self::Search(SearchError::EmptyQuery) => {
                format!("Error: {}", self)
            }
            _ => format!("System Error: {}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_conditions_render_as_plain_errors() {
        assert_eq!(
            ToolError::NotFound(PathBuf::from("src/missing.rs")).render(),
            "Error: File src/missing.rs not found."
        );
        assert_eq!(
            ToolError::UnknownTool("frobnicate".to_string()).render(),
            "Error: Unknown tool frobnicate"
        );
        assert_eq!(
            ToolError::Search(SearchError::EmptyQuery).render(),
            "Error: query is required."
        );
    }

    #[test]
    fn failures_render_as_system_errors() {
        let err = ToolError::io(
            "failed to write",
            "/root/locked.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
        );
        assert_eq!(err.kind(), ToolErrorKind::Execution);
        assert_eq!(
            err.render(),
            "System Error: failed to write /root/locked.txt: permission denied"
        );
        assert_eq!(
            ToolError::CommandTimeout(5).render(),
            "System Error: command timed out after 5 seconds"
        );
    }
}
