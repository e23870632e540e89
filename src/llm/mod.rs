//! LLM client abstraction.
//!
//! The chat relay only needs one operation: send a conversation, get the
//! assistant's text back. [`OpenAiCompatClient`] implements it against any
//! server that speaks the OpenAI `chat/completions` protocol (LM Studio,
//! Ollama, llama.cpp, vLLM, ...).

mod openai_compat;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use openai_compat::OpenAiCompatClient;

/// Role of a chat message.
///
/// Roles outside the known set (`developer`, `function`, ...) are carried
/// through to the LLM server unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
    Other(String),
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        match role.as_str() {
            "system" => Role::System,
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "tool" => Role::Tool,
            _ => Role::Other(role),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::System => "system".to_string(),
            Role::User => "user".to_string(),
            Role::Assistant => "assistant".to_string(),
            Role::Tool => "tool".to_string(),
            Role::Other(role) => role,
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Trait for LLM backends.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Return the assistant reply for `messages`. A reply without content is
    /// returned as an empty string.
    async fn chat_completion(&self, model: &str, messages: &[ChatMessage]) -> anyhow::Result<String>;
}
