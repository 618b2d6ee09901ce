// src/extract/html.rs
// =============================================================================
// This module extracts internal links from HTML pages.
//
// We do NOT build a DOM here. The extractor is a regex scan for href="..."
// values made of a fixed set of characters:
//     a-z A-Z 0-9 $ - _ . + ! * ' ( ) , / :
// Anything else (spaces, '?', '&', '#', '=' ...) stops the value from
// matching at all, so such links are simply never seen.
//
// Every matched value is then sorted into one of four buckets:
//   1. starts with the base URL  -> keep, with the base URL stripped off
//   2. starts with "//"          -> protocol-relative external, drop
//   3. starts with "/"           -> site-relative, keep as-is
//   4. anything else             -> relative path / mailto: / etc, drop
//
// The result is not deduplicated; the visit queue takes care of that.
// =============================================================================

use regex::Regex;
use std::sync::LazyLock;

// The value between href=" and the closing quote
static HREF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href="([a-zA-Z0-9$\-_.+!*'(),/:]+)""#).expect("href pattern is valid")
});

// Robots meta directive that keeps a page out of the sitemap
const NOINDEX_DIRECTIVE: &str = r#"content="noindex,nofollow""#;

// Extracts the internal links referenced by an HTML document
//
// Parameters:
//   html: the page body
//   base_url: the site origin, without trailing slash (e.g. "https://example.com")
//
// Returns: links relative to the base URL, in document order
//
// Example:
//   html = r#"<a href="https://example.com/docs">"#, base_url = "https://example.com"
//   result = ["/docs"]
pub fn extract_links(html: &str, base_url: &str) -> Vec<String> {
    HREF_PATTERN
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| classify_link(m.as_str(), base_url))
        .collect()
}

// Turns one href value into a crawlable link, or None if we never follow it
fn classify_link(href: &str, base_url: &str) -> Option<String> {
    if let Some(rest) = href.strip_prefix(base_url) {
        return Some(rest.to_string());
    }

    if href.starts_with("//") {
        return None;
    }

    if href.starts_with('/') {
        return Some(href.to_string());
    }

    None
}

/// True when the page asks not to be indexed
pub fn is_noindex(html: &str) -> bool {
    html.contains(NOINDEX_DIRECTIVE)
}
