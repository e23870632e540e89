//! Chat relay: system prompt + optional file context + conversation, sent to the LLM.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::llm::{ChatMessage, LlmClient};
use crate::tools::{ToolInvocation, ToolRegistry};

use super::prompt::build_system_prompt;
use super::tool_call::parse_tool_call;

/// Assistant reply plus the tool call it contains, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub content: String,
    pub tool_call: Option<ToolInvocation>,
}

/// Relays one conversational turn to the LLM.
pub struct ChatRelay {
    llm: Arc<dyn LlmClient>,
    model: String,
    system_prompt: String,
}

impl ChatRelay {
    pub fn new(llm: Arc<dyn LlmClient>, model: String, tools: &ToolRegistry) -> Self {
        Self {
            llm,
            model,
            system_prompt: build_system_prompt(tools),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Send the conversation and return the assistant reply.
    pub async fn reply(
        &self,
        conversation: &[ChatMessage],
        context_files: &[PathBuf],
    ) -> anyhow::Result<ChatReply> {
        let messages = self.build_messages(conversation, context_files).await;
        tracing::debug!(model = %self.model, messages = messages.len(), "Calling LLM");

        let content = self.llm.chat_completion(&self.model, &messages).await?;
        let tool_call = parse_tool_call(&content);
        if let Some(call) = &tool_call {
            tracing::debug!(tool = %call.name, "Reply contains a tool call");
        }

        Ok(ChatReply { content, tool_call })
    }

    /// System prompt, then the file context message (when any file was
    /// readable), then the conversation as given.
    pub async fn build_messages(
        &self,
        conversation: &[ChatMessage],
        context_files: &[PathBuf],
    ) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(self.system_prompt.clone())];

        if !context_files.is_empty() {
            messages.push(ChatMessage::system(context_message(context_files).await));
        }

        messages.extend(conversation.iter().cloned());
        messages
    }
}

/// Concatenate readable context files; unreadable ones are skipped.
async fn context_message(paths: &[PathBuf]) -> String {
    let mut context = String::from("Context Files:\n");
    for path in paths {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => push_file(&mut context, path, &contents),
            Err(e) => {
                tracing::warn!("Skipping context file {}: {}", path.display(), e);
            }
        }
    }
    context
}

fn push_file(context: &mut String, path: &Path, contents: &str) {
    context.push_str(&format!("---\n{}\n---\n{}\n\n", path.display(), contents));
}
