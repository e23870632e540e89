//! Web search resolution.
//!
//! A query runs through an ordered chain of [`SearchResolver`]s and the first
//! one that produces results wins:
//! 1. [`InstantAnswerResolver`] - DuckDuckGo's JSON instant-answer API
//! 2. [`MarkdownScrapeResolver`] - the HTML results page rendered to markdown
//!    by a proxy, parsed line by line
//!
//! Every result passes through a [`ResultSet`], which cleans markup, drops
//! repeated URLs and enforces the result limit.

mod fetch;
mod instant_answer;
mod markdown;
mod redirect;
mod text;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use fetch::{HttpFetcher, PageFetcher};
pub use instant_answer::{extract_instant_answer, InstantAnswerResolver};
pub use markdown::{parse_markdown_results, MarkdownScrapeResolver, CONTENT_SENTINEL};
pub use redirect::decode_redirect;
pub use text::clean_text;

/// Smallest number of results a caller can ask for.
pub const MIN_RESULTS: i64 = 1;
/// Largest number of results a caller can ask for.
pub const MAX_RESULTS: i64 = 10;
/// Result count used when the caller gives none (or gives garbage).
pub const DEFAULT_MAX_RESULTS: i64 = 5;

/// Clamp a requested result count into `[MIN_RESULTS, MAX_RESULTS]`.
pub fn clamp_limit(requested: i64) -> usize {
    requested.clamp(MIN_RESULTS, MAX_RESULTS) as usize
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Ordered, URL-unique, capped collection of search results.
#[derive(Debug)]
pub struct ResultSet {
    results: Vec<SearchResult>,
    seen: HashSet<String>,
    limit: usize,
}

impl ResultSet {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            results: Vec::new(),
            seen: HashSet::new(),
            limit,
        }
    }

    /// Add a candidate. Returns `false` if it was skipped: no URL, a URL
    /// already present, or the set is full.
    ///
    /// Title and snippet are cleaned; an empty title becomes the URL.
    pub fn push(&mut self, title: Option<&str>, url: Option<&str>, snippet: Option<&str>) -> bool {
        let Some(url) = url.filter(|u| !u.is_empty()) else {
            return false;
        };
        if self.is_full() || self.seen.contains(url) {
            return false;
        }
        self.seen.insert(url.to_string());

        let title = clean_text(title);
        self.results.push(SearchResult {
            title: if title.is_empty() { url.to_string() } else { title },
            url: url.to_string(),
            snippet: clean_text(snippet),
        });
        true
    }

    pub fn is_full(&self) -> bool {
        self.results.len() >= self.limit
    }

    pub fn into_results(self) -> Vec<SearchResult> {
        self.results
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("query is required.")]
    EmptyQuery,

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid search response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// One step of the search fallback chain.
#[async_trait]
pub trait SearchResolver: Send + Sync {
    fn name(&self) -> &str;

    /// Produce at most `limit` results. An empty vector hands over to the
    /// next resolver; an error aborts the whole search.
    async fn resolve(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError>;
}

/// Endpoints used by the default DuckDuckGo resolver chain.
#[derive(Debug, Clone)]
pub struct SearchEndpoints {
    /// Instant-answer JSON API.
    pub instant_answer_url: String,
    /// Prefix to which the `quote_plus`-encoded query is appended to reach
    /// the markdown rendering of the HTML results page.
    pub scrape_url_prefix: String,
}

impl Default for SearchEndpoints {
    fn default() -> Self {
        Self {
            instant_answer_url: "https://api.duckduckgo.com/".to_string(),
            scrape_url_prefix: "https://r.jina.ai/http://duckduckgo.com/html/?q=".to_string(),
        }
    }
}

/// Ordered resolver chain, first non-empty result set wins.
pub struct SearchPipeline {
    resolvers: Vec<Box<dyn SearchResolver>>,
}

impl SearchPipeline {
    pub fn new(resolvers: Vec<Box<dyn SearchResolver>>) -> Self {
        Self { resolvers }
    }

    /// Instant answers first, markdown scrape second, both over `fetcher`.
    pub fn duckduckgo(fetcher: Arc<dyn PageFetcher>, endpoints: &SearchEndpoints) -> Self {
        Self::new(vec![
            Box::new(InstantAnswerResolver::new(
                fetcher.clone(),
                endpoints.instant_answer_url.clone(),
            )),
            Box::new(MarkdownScrapeResolver::new(
                fetcher,
                endpoints.scrape_url_prefix.clone(),
            )),
        ])
    }

    /// Names of the resolvers, in the order they are tried.
    pub fn resolver_names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    /// Run the chain and return at most `clamp_limit(max_results)` unique results.
    pub async fn search(
        &self,
        query: &str,
        max_results: i64,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let limit = clamp_limit(max_results);

        for resolver in &self.resolvers {
            let found = resolver.resolve(query, limit).await?;
            if found.is_empty() {
                tracing::debug!(resolver = resolver.name(), "No results, trying next resolver");
                continue;
            }

            tracing::debug!(resolver = resolver.name(), count = found.len(), "Search resolved");
            let mut seen = HashSet::new();
            return Ok(found
                .into_iter()
                .filter(|item| seen.insert(item.url.clone()))
                .take(limit)
                .collect());
        }

        Ok(Vec::new())
    }

    /// Run the chain and render the outcome as the text handed back to the model.
    pub async fn search_text(&self, query: &str, max_results: i64) -> Result<String, SearchError> {
        let results = self.search(query, max_results).await?;
        Ok(format_results(query, &results))
    }
}

/// Render results as a markdown list under a header naming the query.
pub fn format_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for \"{}\".", query);
    }

    let lines = results
        .iter()
        .map(|item| {
            if item.snippet.is_empty() {
                format!("- [{}]({})", item.title, item.url)
            } else {
                format!("- [{}]({}) — {}", item.title, item.url, item.snippet)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("Search results for \"{}\":\n{}", query, lines)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{PageFetcher, SearchError};

    /// Serves canned bodies keyed by URL prefix and records every request.
    #[derive(Default)]
    pub struct StubFetcher {
        pages: HashMap<String, String>,
        calls: AtomicUsize,
        requested: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(mut self, url_prefix: &str, body: &str) -> Self {
            self.pages.insert(url_prefix.to_string(), body.to_string());
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch_text(&self, url: &str) -> Result<String, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.lock().unwrap().push(url.to_string());
            let body = self
                .pages
                .iter()
                .find(|(prefix, _)| url.starts_with(prefix.as_str()))
                .map(|(_, body)| body.clone())
                .unwrap_or_default();
            Ok(body)
        }
    }
}
