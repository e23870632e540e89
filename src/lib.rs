//! # Local Code Agent
//!
//! A small agent backend that relays conversations to a local LLM and runs
//! tools on its behalf.
//!
//! This library provides:
//! - An HTTP API for chat relay and tool execution
//! - A fixed tool set: `read_file`, `write_file`, `run_command`, `list_files`, `web_search`
//! - A web search pipeline over DuckDuckGo with a scraping fallback
//!
//! ## Architecture
//!
//! The model asks for tools by emitting a JSON block in its reply:
//! 1. `/chat` relays the conversation and returns the reply plus any tool call
//! 2. `/execute_tool` validates the call and runs it
//! 3. The result, success or failure, comes back as plain text for the model
//!
//! Tools run with the privileges of the server process. There is no
//! sandboxing; only run this against a trusted local user.
//!
//! ## Example
//!
//! ```rust,ignore
//! use local_code_agent::{config::Config, tools::{ToolInvocation, ToolRegistry}};
//! use serde_json::json;
//!
//! let tools = ToolRegistry::new(&Config::from_env()?);
//! let text = tools
//!     .execute(&ToolInvocation::new("web_search", json!({"query": "tokio select"})))
//!     .await;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod llm;
pub mod search;
pub mod tools;

pub use config::Config;
