//! Markup cleanup for titles and snippets pulled out of search responses.

use std::sync::LazyLock;

use regex::Regex;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

/// Decode HTML entities, drop anything shaped like a tag and trim.
///
/// The pass is repeated until the text stops changing, so entity-escaped
/// markup (`&lt;b&gt;`) is removed as well and `clean_text(clean_text(x))`
/// always equals `clean_text(x)`.
pub fn clean_text(value: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };

    let mut current = value.to_string();
    loop {
        let next = clean_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn clean_once(value: &str) -> String {
    let decoded = html_escape::decode_html_entities(value);
    TAG_PATTERN.replace_all(&decoded, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn absent_and_empty_input_yield_empty_string() {
        assert_eq!(clean_text(None), "");
        assert_eq!(clean_text(Some("")), "");
        assert_eq!(clean_text(Some("   ")), "");
    }

    #[test]
    fn strips_tags_and_decodes_entities() {
        assert_eq!(
            clean_text(Some("  <b>Rust</b> &amp; <i>Cargo</i> ")),
            "Rust & Cargo"
        );
        assert_eq!(clean_text(Some("&lt;em&gt;hi&lt;/em&gt;")), "hi");
    }

    #[test]
    fn malformed_markup_is_stripped_without_panicking() {
        assert_eq!(clean_text(Some("a <<b>> c")), "a > c");
        assert_eq!(clean_text(Some("unterminated <tag")), "unterminated <tag");
    }

    #[test]
    fn cleaning_is_idempotent() {
        let samples = [
            "plain text",
            "<p>para</p>",
            "&amp;lt;b&amp;gt;double&amp;lt;/b&amp;gt;",
            "&am<x>p;",
            "unterminated <tag",
            " 5 &lt; 6 ",
            "a <<b>> c",
        ];
        for sample in samples {
            let once = clean_text(Some(sample));
            assert_eq!(clean_text(Some(&once)), once, "input: {sample:?}");
        }
    }

    proptest! {
        #[test]
        fn clean_text_is_idempotent_and_trimmed(raw in any::<String>()) {
            let once = clean_text(Some(&raw));
            prop_assert_eq!(once.trim(), once.as_str());
            prop_assert_eq!(clean_text(Some(&once)), once);
        }

        #[test]
        fn clean_text_is_idempotent_on_markup_heavy_input(
            raw in r"([<>&;/ a-z]|&amp;|&lt;|&gt;|&nGt;|<b>|</b>){0,40}",
        ) {
            let once = clean_text(Some(&raw));
            prop_assert_eq!(clean_text(Some(&once)), once);
        }
    }
}
