//! `Link` response header parsing

use regex::Regex;
use std::sync::OnceLock;

fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<([^>]*)>([^<]*)").unwrap_or_else(|e| panic!("invalid link pattern: {e}"))
    })
}

/// Extract the `rel=next` target from a `Link` header
///
/// Handles multiple comma-separated links and both quoted and unquoted
/// relation values, e.g. `<https://h/list?cursor=2>;rel=next`.
pub fn next_page_url(header: &str) -> Option<String> {
    link_pattern().captures_iter(header).find_map(|caps| {
        let target = caps.get(1)?.as_str().trim();
        let params = caps.get(2)?.as_str();
        let is_next = params.split(';').any(|param| {
            param
                .split_once('=')
                .map(|(key, value)| {
                    key.trim().eq_ignore_ascii_case("rel")
                        && value
                            .trim()
                            .trim_matches(|c| c == '"' || c == ',')
                            .split_whitespace()
                            .any(|rel| rel.eq_ignore_ascii_case("next"))
                })
                .unwrap_or(false)
        });
        (is_next && !target.is_empty()).then(|| target.to_string())
    })
}
