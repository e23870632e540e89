//! File read/write tools.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;

use super::{Tool, ToolError};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReadFileParams {
    pub file_path: PathBuf,
}

/// Read a UTF-8 text file.
pub struct ReadFile;

#[async_trait]
impl Tool for ReadFile {
    type Params = ReadFileParams;

    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Reads the content of a file."
    }

    fn parameters_doc(&self) -> &str {
        "`file_path` (string)"
    }

    async fn execute(&self, params: ReadFileParams) -> Result<String, ToolError> {
        let path = params.file_path;
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(ToolError::NotFound(path));
        }

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ToolError::io("failed to read", &path, e))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WriteFileParams {
    pub file_path: PathBuf,
    pub content: String,
}

/// Write (overwrite) a text file, creating parent directories.
pub struct WriteFile;

#[async_trait]
impl Tool for WriteFile {
    type Params = WriteFileParams;

    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Writes content to a file (overwrites)."
    }

    fn parameters_doc(&self) -> &str {
        "`file_path` (string), `content` (string)"
    }

    async fn execute(&self, params: WriteFileParams) -> Result<String, ToolError> {
        let path = params.file_path;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ToolError::io("failed to create directory", parent, e))?;
        }

        tokio::fs::write(&path, params.content)
            .await
            .map_err(|e| ToolError::io("failed to write", &path, e))?;

        Ok(format!("Success: Wrote to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_creates_parents_then_read_returns_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/notes.md");

        let msg = WriteFile
            .execute(WriteFileParams {
                file_path: path.clone(),
                content: "# Notes\n".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(msg, format!("Success: Wrote to {}", path.display()));

        let content = ReadFile
            .execute(ReadFileParams { file_path: path })
            .await
            .unwrap();
        assert_eq!(content, "# Notes\n");
    }

    #[tokio::test]
    async fn write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "old content that is longer").unwrap();

        WriteFile
            .execute(WriteFileParams {
                file_path: path.clone(),
                content: "new".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReadFile
            .execute(ReadFileParams {
                file_path: dir.path().join("absent.txt"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
        assert!(err.render().contains("not found"));
    }

    #[tokio::test]
    async fn reading_a_directory_is_a_system_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReadFile
            .execute(ReadFileParams {
                file_path: dir.path().to_path_buf(),
            })
            .await
            .unwrap_err();
        assert!(err.render().starts_with("System Error: failed to read"));
    }
}
