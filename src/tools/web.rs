//! Web search tool.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::{Tool, ToolError};
use crate::search::{SearchPipeline, DEFAULT_MAX_RESULTS};

/// Parameters as the model sends them, normalized on the way in.
///
/// `query` is trimmed. `max_results` is coerced best-effort and falls back to
/// [`DEFAULT_MAX_RESULTS`] when absent or unusable; it is clamped later by the
/// search pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebSearchParams {
    #[serde(default, deserialize_with = "trimmed")]
    pub query: String,

    #[serde(default = "default_max_results", deserialize_with = "lenient_count")]
    pub max_results: i64,
}

fn default_max_results() -> i64 {
    DEFAULT_MAX_RESULTS
}

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(String::deserialize(deserializer)?.trim().to_string())
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(coerce_count(&Value::deserialize(deserializer)?).unwrap_or(DEFAULT_MAX_RESULTS))
}

/// Integer view of a loosely typed count: integers, floats truncated toward
/// zero, numeric strings and booleans.
fn coerce_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Search the web through the resolver pipeline.
pub struct WebSearch {
    pipeline: SearchPipeline,
}

impl WebSearch {
    pub fn new(pipeline: SearchPipeline) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl Tool for WebSearch {
    type Params = WebSearchParams;

    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Searches the web via DuckDuckGo Instant Answer."
    }

    fn parameters_doc(&self) -> &str {
        "`query` (string), `max_results` (int, optional)"
    }

    async fn execute(&self, params: WebSearchParams) -> Result<String, ToolError> {
        Ok(self
            .pipeline
            .search_text(&params.query, params.max_results)
            .await?)
    }
}
