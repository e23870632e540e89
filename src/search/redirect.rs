//! DuckDuckGo click-tracking redirect decoding.

/// Query parameter that carries the real destination in `duckduckgo.com/l/?` links.
const TARGET_PARAM: &str = "uddg";

/// Return the destination encoded in a tracking redirect.
///
/// Falls back to the input when there is no non-blank `uddg` parameter. The
/// chosen value is percent-decoded once more after query parsing, which unwraps
/// links that were escaped twice by the proxy; bytes that are not valid UTF-8
/// after decoding become U+FFFD.
pub fn decode_redirect(raw: &str) -> String {
    let without_fragment = raw.split('#').next().unwrap_or(raw);
    let query = without_fragment
        .split_once('?')
        .map(|(_, query)| query)
        .unwrap_or("");

    let target = url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, value)| key == TARGET_PARAM && !value.is_empty())
        .map(|(_, value)| value.into_owned())
        .unwrap_or_else(|| raw.to_string());

    String::from_utf8_lossy(&urlencoding::decode_binary(target.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_uddg_target() {
        assert_eq!(
            decode_redirect("https://duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fpage&rut=x"),
            "https://example.com/page"
        );
    }

    #[test]
    fn first_value_wins() {
        assert_eq!(
            decode_redirect("//duckduckgo.com/l/?uddg=https%3A%2F%2Fa.example&uddg=https%3A%2F%2Fb.example"),
            "https://a.example"
        );
    }

    #[test]
    fn url_without_query_is_returned_as_is() {
        assert_eq!(
            decode_redirect("https://example.com/docs"),
            "https://example.com/docs"
        );
    }

    #[test]
    fn missing_param_falls_back_to_input() {
        assert_eq!(
            decode_redirect("https://duckduckgo.com/l/?rut=abc"),
            "https://duckduckgo.com/l/?rut=abc"
        );
    }

    #[test]
    fn double_encoded_target_is_unwrapped() {
        assert_eq!(
            decode_redirect("https://duckduckgo.com/l/?uddg=https%253A%252F%252Fexample.com"),
            "https://example.com"
        );
    }

    #[test]
    fn blank_param_counts_as_missing() {
        assert_eq!(
            decode_redirect("https://duckduckgo.com/l/?uddg=&rut=abc"),
            "https://duckduckgo.com/l/?uddg=&rut=abc"
        );
        assert_eq!(
            decode_redirect("https://duckduckgo.com/l/?uddg=&uddg=https%3A%2F%2Fb.example"),
            "https://b.example"
        );
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(
            decode_redirect("https://duckduckgo.com/l/?uddg=https%3A%2F%2Fa.example%2F%25FF"),
            "https://a.example/\u{FFFD}"
        );
    }
}
