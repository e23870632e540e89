//! Extraction of tool calls embedded in assistant text.

use serde_json::Deserializer;

use crate::tools::ToolInvocation;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Find the tool call in an assistant reply, if there is one.
///
/// A fenced ```` ```json ```` block is preferred. Without one, the first `{`
/// that starts a valid `{"tool": ..., "params": ...}` object is used, which
/// covers models that drop the fence.
pub fn parse_tool_call(reply: &str) -> Option<ToolInvocation> {
    fenced_blocks(reply)
        .find_map(|block| serde_json::from_str::<ToolInvocation>(block.trim()).ok())
        .or_else(|| bare_object(reply))
}

fn fenced_blocks(text: &str) -> impl Iterator<Item = &str> {
    text.split(JSON_FENCE)
        .skip(1)
        .filter_map(|rest| rest.split(FENCE).next())
}

fn bare_object(text: &str) -> Option<ToolInvocation> {
    text.match_indices('{').find_map(|(idx, _)| {
        Deserializer::from_str(&text[idx..])
            .into_iter::<ToolInvocation>()
            .next()
            .and_then(Result::ok)
    })
}
