//! Agent module - prompt construction, chat relay and tool-call extraction.
//!
//! The agent follows a client-driven "tools in a loop" pattern:
//! 1. The client posts the conversation to `/chat`
//! 2. The relay prepends the system prompt (and any file context) and calls the LLM
//! 3. If the reply embeds a tool call, the client posts it to `/execute_tool`
//! 4. The tool result goes back into the conversation and the loop repeats

mod prompt;
mod relay;
mod tool_call;

pub use prompt::build_system_prompt;
pub use relay::{ChatRelay, ChatReply};
pub use tool_call::parse_tool_call;
