use serde::Serialize;
use std::fmt;

/// Category of a per-item failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A seed or link could not be parsed as an http(s) URL
    InvalidUrl,
    /// Network or HTTP error while fetching
    FetchFailure,
    /// The extractor found no usable content
    ExtractionFailure,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid_url",
            Self::FetchFailure => "fetch_failure",
            Self::ExtractionFailure => "extraction_failure",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A skipped item, with the URL it belongs to and why it was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub url: String,
    pub kind: FailureKind,
    pub reason: String,
}

impl Diagnostic {
    pub fn new(url: impl Into<String>, kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.url, self.reason)
    }
}
