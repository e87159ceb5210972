//! Page and link classification
//!
//! The classifier decides whether a fetched page is an index to expand or a
//! content item to extract, and which of its outbound links are plausible
//! content items. Link heuristics live in [`policy`].

pub mod policy;

pub use policy::{LinkFilter, LinkPolicy};

use crate::config::ClassifierConfig;
use crate::crawler::{extract_links, Frontier};
use crate::url::{normalize_url, CanonicalUrl};
use std::collections::HashSet;
use tracing::debug;

/// Outcome of inspecting one fetched (or unfetchable) page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageClassification {
    /// A listing page; holds its not-yet-queued candidate links in page order
    IndexPage(Vec<CanonicalUrl>),

    /// A single article, post, transcript or document
    ContentItem,

    /// The page could not be retrieved; holds the reason
    Unreachable(String),
}

/// Decides page types and filters discovered links
#[derive(Debug, Default)]
pub struct LinkClassifier {
    policy: LinkPolicy,
}

impl LinkClassifier {
    pub fn new(policy: LinkPolicy) -> Self {
        Self { policy }
    }

    /// Default policy extended with the configured denylists
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(LinkPolicy::from_config(config))
    }

    pub fn policy(&self) -> &LinkPolicy {
        &self.policy
    }

    /// Classifies a page the driver wants to expand
    ///
    /// The page is an index if at least one link survives normalization and
    /// the policy, otherwise it is treated as a content item. The index
    /// carries only links not yet in `frontier`, so it may be empty.
    pub fn classify(
        &self,
        page_url: &CanonicalUrl,
        html: &str,
        frontier: &Frontier,
    ) -> PageClassification {
        let links = extract_links(html);
        let accepted = self.accepted_links(page_url, &links);

        if accepted.is_empty() {
            debug!(url = %page_url, links = links.len(), "no candidate links, content item");
            return PageClassification::ContentItem;
        }

        let accepted_count = accepted.len();
        let candidates: Vec<_> = accepted
            .into_iter()
            .filter(|url| !frontier.contains(url))
            .collect();

        debug!(
            url = %page_url,
            links = links.len(),
            accepted = accepted_count,
            candidates = candidates.len(),
            "classified index page"
        );

        PageClassification::IndexPage(candidates)
    }

    /// Normalizes and filters raw hrefs found on `page_url`
    ///
    /// Returns survivors in page order, without duplicates and without
    /// anything already pending or visited in `frontier`.
    pub fn filter_candidates<S: AsRef<str>>(
        &self,
        page_url: &CanonicalUrl,
        links: &[S],
        frontier: &Frontier,
    ) -> Vec<CanonicalUrl> {
        self.accepted_links(page_url, links)
            .into_iter()
            .filter(|url| !frontier.contains(url))
            .collect()
    }

    /// Links that normalize, are not the page itself and pass the policy
    fn accepted_links<S: AsRef<str>>(
        &self,
        page_url: &CanonicalUrl,
        links: &[S],
    ) -> Vec<CanonicalUrl> {
        let mut seen = HashSet::new();
        let mut accepted = Vec::new();

        for raw in links {
            let raw = raw.as_ref();

            let url = match normalize_url(raw, Some(page_url.as_url())) {
                Ok(url) => url,
                Err(e) => {
                    debug!(href = raw, error = %e, "dropping unparseable link");
                    continue;
                }
            };

            if url == *page_url {
                continue;
            }

            if let Some(filter) = self.policy.rejection(page_url, &url) {
                debug!(url = %url, filter, "link rejected");
                continue;
            }

            if seen.insert(url.clone()) {
                accepted.push(url);
            }
        }

        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::FrontierEntry;

    fn url(s: &str) -> CanonicalUrl {
        normalize_url(s, None).unwrap()
    }

    fn page() -> CanonicalUrl {
        url("https://example.com/blog")
    }

    fn strings(urls: &[CanonicalUrl]) -> Vec<&str> {
        urls.iter().map(|u| u.as_str()).collect()
    }

    #[test]
    fn test_filter_mixed_links() {
        let classifier = LinkClassifier::default();
        let links = [
            "/blog/a",
            "/blog/b",
            "/blog/a",
            "/tag/c",
            "https://other.com/d",
        ];

        let candidates = classifier.filter_candidates(&page(), &links, &Frontier::new());

        assert_eq!(
            strings(&candidates),
            vec!["https://example.com/blog/a", "https://example.com/blog/b"]
        );
    }

    #[test]
    fn test_filter_skips_frontier_members() {
        let classifier = LinkClassifier::default();
        let mut frontier = Frontier::new();
        frontier.push(FrontierEntry::seed(url("https://example.com/blog/a")));
        frontier.push(FrontierEntry::seed(url("https://example.com/blog/b")));
        frontier.pop();

        let links = ["/blog/a", "/blog/b", "/blog/c"];
        let candidates = classifier.filter_candidates(&page(), &links, &frontier);

        assert_eq!(strings(&candidates), vec!["https://example.com/blog/c"]);
    }

    #[test]
    fn test_filter_drops_self_links_and_variants() {
        let classifier = LinkClassifier::default();
        let links = [
            "https://example.com/blog",
            "/blog/",
            "/blog#top",
            "/blog/post#comments",
            "/blog/post/",
            "http://[invalid",
            "ftp://example.com/blog/file",
            "/",
        ];

        let candidates = classifier.filter_candidates(&page(), &links, &Frontier::new());

        assert_eq!(strings(&candidates), vec!["https://example.com/blog/post"]);
    }

    #[test]
    fn test_classify_index_page() {
        let html = r#"<html><body>
            <nav><a href="/">Home</a><a href="/about">About</a></nav>
            <ul>
                <li><a href="/blog/two-pointers">Two pointers</a></li>
                <li><a href="/blog/binary-search">Binary search</a></li>
                <li><a href="/blog/two-pointers">Two pointers again</a></li>
            </ul>
            <a href="/tag/algorithms">Algorithms</a>
            <img src="/img/logo.png">
        </body></html>"#;

        let classification = LinkClassifier::default().classify(&page(), html, &Frontier::new());

        match classification {
            PageClassification::IndexPage(candidates) => assert_eq!(
                strings(&candidates),
                vec![
                    "https://example.com/blog/two-pointers",
                    "https://example.com/blog/binary-search"
                ]
            ),
            other => panic!("expected index page, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_without_candidates_is_content() {
        let html = r#"<html><body>
            <a href="/">Home</a>
            <a href="https://twitter.com/share">Share</a>
            <article><p>Just an article.</p></article>
        </body></html>"#;

        let classification = LinkClassifier::default().classify(&page(), html, &Frontier::new());
        assert_eq!(classification, PageClassification::ContentItem);
    }

    #[test]
    fn test_index_with_queued_links_stays_index() {
        let mut frontier = Frontier::new();
        frontier.push(FrontierEntry::seed(url("https://example.com/blog/a")));
        let html = r#"<html><body><a href="/">Home</a><a href="/blog/a">A</a></body></html>"#;

        let classification = LinkClassifier::default().classify(&page(), html, &frontier);
        assert_eq!(classification, PageClassification::IndexPage(Vec::new()));
    }

    #[test]
    fn test_from_config_denies_extra_paths() {
        let config = ClassifierConfig {
            extra_denied_paths: vec!["/events/".to_string()],
            extra_denied_extensions: Vec::new(),
        };
        let classifier = LinkClassifier::from_config(&config);
        let links = ["/events/meetup", "/blog/post"];

        let candidates = classifier.filter_candidates(&page(), &links, &Frontier::new());
        assert_eq!(strings(&candidates), vec!["https://example.com/blog/post"]);
    }
}
