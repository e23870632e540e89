//! DuckDuckGo instant-answer API client.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{PageFetcher, ResultSet, SearchError, SearchResolver, SearchResult};

/// Value of the `t` parameter identifying this client to the API.
const CLIENT_ID: &str = "local-code-agent";

/// Resolver backed by the structured JSON API.
pub struct InstantAnswerResolver {
    fetcher: Arc<dyn PageFetcher>,
    endpoint: String,
}

impl InstantAnswerResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>, endpoint: String) -> Self {
        Self { fetcher, endpoint }
    }

    fn request_url(&self, query: &str) -> String {
        let params = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("no_html", "1")
            .append_pair("skip_disambig", "1")
            .append_pair("t", CLIENT_ID)
            .finish();
        format!("{}?{}", self.endpoint, params)
    }
}

#[async_trait]
impl SearchResolver for InstantAnswerResolver {
    fn name(&self) -> &str {
        "instant_answer"
    }

    async fn resolve(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        let body = self.fetcher.fetch_text(&self.request_url(query)).await?;
        let data: Value = serde_json::from_str(&body)?;
        Ok(extract_instant_answer(&data, query, limit))
    }
}

/// Pull results out of an instant-answer response.
///
/// Order: the abstract (if it has a URL), then `Results`, then `RelatedTopics`
/// walked depth-first with topic groups expanded in place.
pub fn extract_instant_answer(data: &Value, query: &str, limit: usize) -> Vec<SearchResult> {
    let mut results = ResultSet::with_limit(limit);

    if let Some(abstract_url) = str_field(data, "AbstractURL") {
        let title = str_field(data, "Heading").unwrap_or(query);
        let snippet = str_field(data, "AbstractText").or_else(|| str_field(data, "Abstract"));
        results.push(Some(title), Some(abstract_url), snippet);
    }

    for item in array_field(data, "Results") {
        let text = str_field(item, "Text");
        results.push(text, str_field(item, "FirstURL"), text);
    }

    walk_topics(array_field(data, "RelatedTopics"), &mut results);

    results.into_results()
}

fn walk_topics(topics: &[Value], results: &mut ResultSet) {
    for topic in topics {
        if results.is_full() {
            return;
        }
        if topic.get("Topics").is_some() {
            walk_topics(array_field(topic, "Topics"), results);
        } else {
            let text = str_field(topic, "Text");
            results.push(text, str_field(topic, "FirstURL"), text);
        }
    }
}

/// Non-empty string field, or `None`.
fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
