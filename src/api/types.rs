//! API request and response types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::llm::{ChatMessage, Role};
use crate::tools::ToolInvocation;

/// Request to relay a conversation to the LLM.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far, oldest first
    pub messages: Vec<ChatMessage>,

    /// Files whose contents are added to the context
    #[serde(default)]
    pub context_files: Vec<PathBuf>,
}

/// Assistant reply to a chat request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    /// Always `assistant`
    pub role: Role,

    /// Reply text, including any embedded tool-call block
    pub content: String,

    /// Tool call found in the reply, ready to post to `/execute_tool`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolInvocation>,
}

/// Result of a tool execution. Failures are rendered into `result` too.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteToolResponse {
    pub result: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// LLM endpoint in use
    pub llm: String,
}

/// Error body for failed chat relays.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}
