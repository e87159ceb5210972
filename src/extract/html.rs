//! Generic HTML article extraction
//!
//! No per-site selectors: the extractor tries a ranked list of common
//! semantic containers for the body, heading/meta sources for the title, and
//! byline conventions for the author.

use super::{ContentExtractor, ExtractedContent, ExtractionError};
use crate::url::CanonicalUrl;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Containers tried in order for the article body
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    ".post-content",
    ".entry-content",
    ".html-content",
    ".markdown-content",
    "#content",
    "body",
];

/// Sources tried in order for the author
const AUTHOR_SELECTORS: &[&str] = &[
    "[rel='author']",
    ".author-name",
    ".author",
    ".byline",
];

/// Tags dropped before conversion
const SKIP_TAGS: &[&str] = &[
    "script", "style", "nav", "iframe", "noscript", "svg", "header", "footer", "form",
];

/// Default [`ContentExtractor`] built on scraper and htmd
pub struct HtmlExtractor {
    content: Vec<Selector>,
    authors: Vec<Selector>,
    h1: Option<Selector>,
    og_title: Option<Selector>,
    title: Option<Selector>,
    meta_author: Option<Selector>,
}

impl HtmlExtractor {
    pub fn new() -> Self {
        Self {
            content: parse_all(CONTENT_SELECTORS),
            authors: parse_all(AUTHOR_SELECTORS),
            h1: Selector::parse("h1").ok(),
            og_title: Selector::parse("meta[property='og:title']").ok(),
            title: Selector::parse("title").ok(),
            meta_author: Selector::parse("meta[name='author']").ok(),
        }
    }

    fn extract_title(&self, document: &Html) -> Option<String> {
        first_text(document, self.h1.as_ref())
            .or_else(|| first_attr(document, self.og_title.as_ref(), "content"))
            .or_else(|| first_text(document, self.title.as_ref()))
    }

    fn extract_author(&self, document: &Html) -> Option<String> {
        first_attr(document, self.meta_author.as_ref(), "content").or_else(|| {
            self.authors
                .iter()
                .find_map(|selector| first_text(document, Some(selector)))
        })
    }

    /// Returns the HTML of the first container with visible text
    fn extract_content_html(&self, document: &Html) -> Option<String> {
        self.content.iter().find_map(|selector| {
            document
                .select(selector)
                .find(|element| has_text(element))
                .map(|element| element.html())
        })
    }
}

impl Default for HtmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractor for HtmlExtractor {
    fn extract(&self, url: &CanonicalUrl, html: &str) -> Result<ExtractedContent, ExtractionError> {
        let document = Html::parse_document(html);

        let content_html = self
            .extract_content_html(&document)
            .ok_or(ExtractionError::NoContent)?;

        let body = html_to_markdown(&content_html)?;
        if body.is_empty() {
            return Err(ExtractionError::NoContent);
        }

        let title = self.extract_title(&document).unwrap_or_default();
        let author = self.extract_author(&document);

        debug!(
            url = %url,
            title = %title,
            body_len = body.len(),
            "extracted content"
        );

        Ok(ExtractedContent {
            title,
            body,
            author,
        })
    }
}

/// Converts an HTML fragment to Markdown and collapses runs of blank lines
pub fn html_to_markdown(html: &str) -> Result<String, ExtractionError> {
    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(SKIP_TAGS.to_vec())
        .build();

    let raw = converter
        .convert(html)
        .map_err(|e| ExtractionError::Conversion(e.to_string()))?;

    Ok(collapse_blank_lines(&raw))
}

fn collapse_blank_lines(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut blank_run = false;

    for line in markdown.lines() {
        if line.trim().is_empty() {
            blank_run = true;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank_run {
                out.push('\n');
            }
        }
        out.push_str(line.trim_end());
        blank_run = false;
    }

    out
}

fn parse_all(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect()
}

fn has_text(element: &ElementRef<'_>) -> bool {
    element.text().any(|t| !t.trim().is_empty())
}

fn first_text(document: &Html, selector: Option<&Selector>) -> Option<String> {
    document
        .select(selector?)
        .map(|element| {
            element
                .text()
                .collect::<Vec<_>>()
                .join(" ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .find(|text| !text.is_empty())
}

fn first_attr(document: &Html, selector: Option<&Selector>, attr: &str) -> Option<String> {
    document
        .select(selector?)
        .filter_map(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
