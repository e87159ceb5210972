//! Content extraction capabilities
//!
//! The crawl core only talks to the [`ContentExtractor`] and [`PdfExtractor`]
//! traits. Default implementations are provided:
//! - [`HtmlExtractor`]: scraper for selection, htmd for HTML → Markdown
//! - [`PdfTextExtractor`]: pdf-extract for document text

mod html;
mod pdf;

pub use html::HtmlExtractor;
pub use pdf::{title_from_file_name, PdfDocument, PdfTextExtractor};

use crate::url::CanonicalUrl;
use thiserror::Error;

/// The useful parts of one content item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub title: String,
    /// Markdown body
    pub body: String,
    pub author: Option<String>,
}

/// Reasons an extractor can fail on an item
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("No usable content found")]
    NoContent,

    #[error("Markdown conversion failed: {0}")]
    Conversion(String),

    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),
}

/// Turns a fetched HTML page into [`ExtractedContent`]
pub trait ContentExtractor: Send + Sync {
    fn extract(&self, url: &CanonicalUrl, html: &str) -> Result<ExtractedContent, ExtractionError>;
}

/// Pulls plain text out of a PDF document
pub trait PdfExtractor: Send + Sync {
    fn extract_pdf_text(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}
