//! Result extraction from the markdown rendering of the DuckDuckGo HTML page.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;

use super::redirect::decode_redirect;
use super::{PageFetcher, ResultSet, SearchError, SearchResolver, SearchResult};

/// Line that precedes the page body in the markdown proxy output.
pub const CONTENT_SENTINEL: &str = "Markdown Content:";

/// Outbound result links go through this redirect; navigation links do not.
const REDIRECT_MARKER: &str = "duckduckgo.com/l/?";

// A bracketed title that does not open with `!`, then a parenthesised http(s) URL.
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([^!].*?)\]\((http[^)]+)\)").expect("link pattern is valid")
});

/// Collect up to `limit` search results from a scraped markdown payload.
///
/// Scanning starts after the [`CONTENT_SENTINEL`] line, or at the top of the
/// payload when the sentinel is missing. Snippets are always empty because the
/// rendering does not carry result descriptions.
pub fn parse_markdown_results(payload: &str, limit: usize) -> Vec<SearchResult> {
    let lines: Vec<&str> = payload.lines().collect();
    let start = lines
        .iter()
        .position(|line| line.trim() == CONTENT_SENTINEL)
        .map(|idx| idx + 1)
        .unwrap_or(0);

    let mut results = ResultSet::with_limit(limit);
    for line in &lines[start..] {
        if results.is_full() {
            break;
        }
        let Some(captures) = LINK_PATTERN.captures(line.trim()) else {
            continue;
        };
        let link = &captures[2];
        if !link.contains(REDIRECT_MARKER) {
            continue;
        }
        let target = decode_redirect(link);
        results.push(Some(&captures[1]), Some(target.as_str()), None);
    }

    results.into_results()
}

/// Fallback resolver: fetch the markdown rendering of the HTML results page.
pub struct MarkdownScrapeResolver {
    fetcher: Arc<dyn PageFetcher>,
    url_prefix: String,
}

impl MarkdownScrapeResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>, url_prefix: String) -> Self {
        Self {
            fetcher,
            url_prefix,
        }
    }
}

#[async_trait]
impl SearchResolver for MarkdownScrapeResolver {
    fn name(&self) -> &str {
        "markdown_scrape"
    }

    async fn resolve(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        let payload = self
            .fetcher
            .fetch_text(&format!("{}{}", self.url_prefix, encoded))
            .await?;
        Ok(parse_markdown_results(&payload, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_LINK: &str = "[Example](https://duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com)";

    #[test]
    fn parses_link_after_sentinel() {
        let payload = format!("Title: DuckDuckGo\n\nMarkdown Content:\n{EXAMPLE_LINK}\n");
        let results = parse_markdown_results(&payload, 5);
        assert_eq!(
            results,
            vec![SearchResult {
                title: "Example".to_string(),
                url: "https://example.com".to_string(),
                snippet: String::new(),
            }]
        );
    }

    #[test]
    fn lines_before_sentinel_are_ignored() {
        let payload = format!(
            "[Header](https://duckduckgo.com/l/?uddg=https%3A%2F%2Fheader.example)\nMarkdown Content:\n{EXAMPLE_LINK}"
        );
        let results = parse_markdown_results(&payload, 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://example.com");
    }

    #[test]
    fn missing_sentinel_scans_from_first_line() {
        let results = parse_markdown_results(EXAMPLE_LINK, 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Example");
    }

    #[test]
    fn navigation_and_image_links_are_skipped() {
        let payload = "Markdown Content:\n\
            [Settings](https://duckduckgo.com/settings)\n\
            ![logo](https://duckduckgo.com/l/?uddg=https%3A%2F%2Flogo.example)\n\
            [!bang](https://duckduckgo.com/l/?uddg=https%3A%2F%2Fbang.example)\n\
            some prose [inline](https://duckduckgo.com/l/?uddg=https%3A%2F%2Finline.example)\n";
        assert!(parse_markdown_results(payload, 5).is_empty());
    }

    #[test]
    fn duplicates_are_dropped_and_empty_title_falls_back_to_url() {
        let payload = "Markdown Content:\n\
            [<b></b>](https://duckduckgo.com/l/?uddg=https%3A%2F%2Fa.example&rut=1)\n\
            [Again](https://duckduckgo.com/l/?uddg=https%3A%2F%2Fa.example&rut=2)\n\
            [  B &amp; C ](https://duckduckgo.com/l/?uddg=https%3A%2F%2Fb.example)\n";
        let results = parse_markdown_results(payload, 5);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "https://a.example");
        assert_eq!(results[1].title, "B & C");
    }

    #[test]
    fn stops_at_limit() {
        let payload: String = (0..20)
            .map(|i| format!("[R{i}](https://duckduckgo.com/l/?uddg=https%3A%2F%2Fr{i}.example)\n"))
            .collect();
        let results = parse_markdown_results(&payload, 3);
        assert_eq!(results.len(), 3);
        assert_eq!(results[2].url, "https://r2.example");
    }

    #[test]
    fn blank_redirect_target_keeps_the_raw_link() {
        let payload = "Markdown Content:\n[Hit](https://duckduckgo.com/l/?uddg=&rut=abc)\n";
        let results = parse_markdown_results(payload, 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Hit");
        assert_eq!(results[0].url, "https://duckduckgo.com/l/?uddg=&rut=abc");
    }
}
