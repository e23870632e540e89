//! Tool definitions and dispatch.
//!
//! The model asks for a tool by name with a loosely typed parameter object.
//! [`ToolRequest::from_invocation`] validates that object into a typed request,
//! [`ToolRegistry::try_execute`] runs it and returns `Result<String, ToolError>`,
//! and [`ToolRegistry::execute`] renders either side into the single text
//! channel the model sees. Nothing past the dispatcher ever fails loudly.

mod directory;
mod error;
mod file_ops;
mod terminal;
mod web;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::Config;
use crate::search::{HttpFetcher, PageFetcher, SearchPipeline};

pub use directory::{ListFiles, ListFilesParams, LIST_LIMIT};
pub use error::{ToolError, ToolErrorKind};
pub use file_ops::{ReadFile, ReadFileParams, WriteFile, WriteFileParams};
pub use terminal::{RunCommand, RunCommandParams};
pub use web::{WebSearch, WebSearchParams};

/// A tool call as produced by the model or posted to the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    #[serde(rename = "tool")]
    pub name: String,

    #[serde(rename = "params", default)]
    pub parameters: Map<String, Value>,
}

impl ToolInvocation {
    pub fn new(name: impl Into<String>, parameters: Value) -> Self {
        let parameters = match parameters {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            name: name.into(),
            parameters,
        }
    }
}

/// A validated tool call, one variant per tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    ReadFile(ReadFileParams),
    WriteFile(WriteFileParams),
    RunCommand(RunCommandParams),
    ListFiles(ListFilesParams),
    WebSearch(WebSearchParams),
}

impl ToolRequest {
    /// Validate an invocation against the parameter schema of the named tool.
    pub fn from_invocation(invocation: &ToolInvocation) -> Result<Self, ToolError> {
        let name = invocation.name.as_str();
        let params = &invocation.parameters;
        match name {
            "read_file" => decode_params(name, params).map(Self::ReadFile),
            "write_file" => decode_params(name, params).map(Self::WriteFile),
            "run_command" => decode_params(name, params).map(Self::RunCommand),
            "list_files" => decode_params(name, params).map(Self::ListFiles),
            "web_search" => decode_params(name, params).map(Self::WebSearch),
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::ReadFile(_) => "read_file",
            Self::WriteFile(_) => "write_file",
            Self::RunCommand(_) => "run_command",
            Self::ListFiles(_) => "list_files",
            Self::WebSearch(_) => "web_search",
        }
    }
}

fn decode_params<T: DeserializeOwned>(tool: &str, params: &Map<String, Value>) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(params.clone())).map_err(|source| {
        ToolError::InvalidParams {
            tool: tool.to_string(),
            source,
        }
    })
}

/// Trait implemented by every tool.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Typed parameters accepted by the tool.
    type Params: DeserializeOwned + Send + 'static;

    /// Name the model uses to call the tool.
    fn name(&self) -> &str;

    /// One-line description shown in the system prompt.
    fn description(&self) -> &str;

    /// Parameter summary shown in the system prompt.
    fn parameters_doc(&self) -> &str;

    async fn execute(&self, params: Self::Params) -> Result<String, ToolError>;
}

/// Tool metadata for prompts and listings.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub parameters: String,
}

fn info<T: Tool>(tool: &T) -> ToolInfo {
    ToolInfo {
        name: tool.name().to_string(),
        description: tool.description().to_string(),
        parameters: tool.parameters_doc().to_string(),
    }
}

/// The fixed set of tools available to the agent.
pub struct ToolRegistry {
    read_file: ReadFile,
    write_file: WriteFile,
    run_command: RunCommand,
    list_files: ListFiles,
    web_search: WebSearch,
}

impl ToolRegistry {
    /// Build the registry with a real HTTP fetcher for web search.
    pub fn new(config: &Config) -> Self {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(
            config.search.timeout,
            config.search.insecure_tls_retry,
        ));
        Self::with_fetcher(config, fetcher)
    }

    /// Build the registry with a caller-supplied fetcher.
    pub fn with_fetcher(config: &Config, fetcher: Arc<dyn PageFetcher>) -> Self {
        let pipeline = SearchPipeline::duckduckgo(fetcher, &config.search.endpoints);
        Self {
            read_file: ReadFile,
            write_file: WriteFile,
            run_command: RunCommand::new(config.command_timeout),
            list_files: ListFiles,
            web_search: WebSearch::new(pipeline),
        }
    }

    /// List all tools in the order they are documented to the model.
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        vec![
            info(&self.read_file),
            info(&self.write_file),
            info(&self.run_command),
            info(&self.list_files),
            info(&self.web_search),
        ]
    }

    /// Validate and run a tool call, keeping failures typed.
    pub async fn try_execute(&self, invocation: &ToolInvocation) -> Result<String, ToolError> {
        let request = ToolRequest::from_invocation(invocation)?;
        tracing::info!(tool = request.tool_name(), "Executing tool");

        match request {
            ToolRequest::ReadFile(p) => self.read_file.execute(p).await,
            ToolRequest::WriteFile(p) => self.write_file.execute(p).await,
            ToolRequest::RunCommand(p) => self.run_command.execute(p).await,
            ToolRequest::ListFiles(p) => self.list_files.execute(p).await,
            ToolRequest::WebSearch(p) => self.web_search.execute(p).await,
        }
    }

    /// Run a tool call and render the outcome as text. Never fails.
    pub async fn execute(&self, invocation: &ToolInvocation) -> String {
        match self.try_execute(invocation).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(tool = %invocation.name, kind = ?e.kind(), "Tool failed: {}", e);
                e.render()
            }
        }
    }
}
