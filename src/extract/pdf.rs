//! PDF document support

use super::{ExtractionError, PdfExtractor};
use std::path::Path;

/// Default [`PdfExtractor`] backed by pdf-extract
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl PdfExtractor for PdfTextExtractor {
    fn extract_pdf_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(ExtractionError::NoContent);
        }
        Ok(text.to_string())
    }
}

/// An uploaded PDF: its file name and raw bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl PdfDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Reads a PDF from disk, naming it after the file
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    /// Record title derived from the file name
    pub fn title(&self) -> String {
        title_from_file_name(&self.name)
    }
}

/// Turns `binary_search-notes.pdf` into `Binary Search Notes`
///
/// The `.pdf` extension is stripped case-insensitively; `_` and `-` become
/// spaces and each word is capitalized.
pub fn title_from_file_name(name: &str) -> String {
    let stem = match name.len().checked_sub(4) {
        Some(cut) if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".pdf") => {
            &name[..cut]
        }
        _ => name,
    };

    stem.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
