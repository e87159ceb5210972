//! URL handling module for kb-harvest
//!
//! This module provides URL canonicalization, the [`CanonicalUrl`] key type
//! used for deduplication, and host comparison.

mod domain;
mod normalize;

use ::url::Url;
use serde::{Serialize, Serializer};
use std::fmt;

// Re-export main functions
pub use domain::same_host;
pub use normalize::normalize_url;

/// A URL in canonical form
///
/// Values of this type are only produced by [`normalize_url`], so two
/// `CanonicalUrl`s compare equal exactly when they name the same page for
/// deduplication purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    /// Returns the canonical string form
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the underlying parsed URL
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the lowercase host, if any
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// Returns the path component
    pub fn path(&self) -> &str {
        self.0.path()
    }

    /// Returns the last non-empty path segment
    ///
    /// Used as a fallback title for pages that have none.
    pub fn last_segment(&self) -> Option<&str> {
        self.0
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for CanonicalUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
