//! HTML parser for extracting outbound links
//!
//! # Link Extraction Rules
//!
//! **Include:**
//! - `<a href="...">` tags anywhere in the document, in document order
//!
//! **Exclude:**
//! - `<a href="..." download>`
//! - `javascript:`, `mailto:`, `tel:` links
//! - Data URIs
//! - Fragment-only links (same page anchors)
//! - `<link>` elements, including `rel="canonical"`
//!
//! Hrefs are returned as written; resolution against the page URL and
//! normalization happen in the classifier.

use scraper::{Html, Selector};

const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Extracts all followable hrefs from the HTML document
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }
            if let Some(href) = element.value().attr("href").and_then(followable) {
                links.push(href.to_string());
            }
        }
    }

    links
}

/// Returns the trimmed href, or None if it should not be followed
fn followable(href: &str) -> Option<&str> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return None;
    }

    Some(href)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_absolute_and_relative() {
        let html = r#"<html><body>
            <a href="https://other.com/page">Abs</a>
            <a href="/other">Root-relative</a>
            <a href="sibling">Relative</a>
        </body></html>"#;
        assert_eq!(
            extract_links(html),
            vec!["https://other.com/page", "/other", "sibling"]
        );
    }

    #[test]
    fn test_skip_special_schemes() {
        let html = r#"<html><body>
            <a href="javascript:void(0)">JS</a>
            <a href="JavaScript:alert(1)">JS</a>
            <a href="mailto:test@example.com">Email</a>
            <a href="tel:+1234567890">Call</a>
            <a href="data:text/html,<h1>Test</h1>">Data</a>
        </body></html>"#;
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_skip_download_link() {
        let html = r#"<html><body><a href="/file.pdf" download>Download</a></body></html>"#;
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_skip_fragment_only_and_empty() {
        let html = r##"<html><body><a href="#section">Jump</a><a href="  ">Blank</a></body></html>"##;
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_keeps_fragment_on_path() {
        let html = r##"<html><body><a href="/post#comments">Post</a></body></html>"##;
        assert_eq!(extract_links(html), vec!["/post#comments"]);
    }

    #[test]
    fn test_follow_nofollow_links() {
        let html = r#"<html><body><a href="/page" rel="nofollow">Link</a></body></html>"#;
        assert_eq!(extract_links(html), vec!["/page"]);
    }

    #[test]
    fn test_ignores_canonical_link() {
        let html = r#"<html><head><link rel="canonical" href="https://example.com/post?ref=feed" /></head>
            <body><a href="/a">A</a></body></html>"#;
        assert_eq!(extract_links(html), vec!["/a"]);
    }

    #[test]
    fn test_keeps_duplicates_in_order() {
        let html = r#"<html><body>
            <a href="/a">A</a><a href="/b">B</a><a href="/a">A again</a>
        </body></html>"#;
        assert_eq!(extract_links(html), vec!["/a", "/b", "/a"]);
    }
}
