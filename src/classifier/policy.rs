//! Link filtering policy
//!
//! A [`LinkPolicy`] is an ordered list of [`LinkFilter`]s. A candidate link is
//! kept only if no filter rejects it; the first rejecting filter's name is
//! reported for logging.

use crate::config::ClassifierConfig;
use crate::url::{same_host, CanonicalUrl};

/// Path segment sequences that mark navigation, taxonomy or account pages
pub const DEFAULT_DENIED_PATHS: &[&str] = &[
    "about",
    "contact",
    "tag",
    "tags",
    "category",
    "categories",
    "page",
    "author",
    "login",
    "signin",
    "signup",
    "register",
    "privacy",
    "terms",
    "search",
    "feed",
    "rss",
    "subscribe",
    "account",
    "cart",
];

/// File extensions that never point at a readable document
pub const DEFAULT_DENIED_EXTENSIONS: &[&str] = &[
    // images
    "png", "jpg", "jpeg", "gif", "webp", "svg", "ico", "bmp", "tiff", "avif",
    // styles and scripts
    "css", "js", "mjs", "map", "json", "xml",
    // archives
    "zip", "tar", "gz", "tgz", "bz2", "xz", "7z", "rar",
    // media
    "mp3", "mp4", "m4a", "wav", "ogg", "webm", "avi", "mov", "mkv", "flac",
    // fonts
    "woff", "woff2", "ttf", "otf", "eot",
];

/// A single heuristic deciding whether a discovered link is noise
pub trait LinkFilter: Send + Sync {
    /// Short name used in debug logs
    fn name(&self) -> &'static str;

    /// Returns true if `candidate`, found on `page`, should be discarded
    fn rejects(&self, page: &CanonicalUrl, candidate: &CanonicalUrl) -> bool;
}

/// Rejects links to a different host than the page they were found on
#[derive(Debug, Clone, Copy, Default)]
pub struct SameOrigin;

impl LinkFilter for SameOrigin {
    fn name(&self) -> &'static str {
        "same-origin"
    }

    fn rejects(&self, page: &CanonicalUrl, candidate: &CanonicalUrl) -> bool {
        !same_host(page, candidate)
    }
}

/// Rejects links back to the site root (home-page navigation)
#[derive(Debug, Clone, Copy, Default)]
pub struct RootPath;

impl LinkFilter for RootPath {
    fn name(&self) -> &'static str {
        "root-path"
    }

    fn rejects(&self, _page: &CanonicalUrl, candidate: &CanonicalUrl) -> bool {
        candidate.path() == "/" || candidate.path().is_empty()
    }
}

/// Rejects links whose path contains a denied segment sequence
///
/// `"/tag/"` matches `/tag/rust` but not `/tagging-guide`; `"/events/past"`
/// matches `/blog/events/past/2023`.
#[derive(Debug, Clone, Default)]
pub struct PathDenylist {
    patterns: Vec<Vec<String>>,
}

impl PathDenylist {
    /// Creates a denylist from path fragments such as `"about"` or `"/events/"`
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = fragments
            .into_iter()
            .map(|fragment| segments(fragment.as_ref()))
            .filter(|pattern| !pattern.is_empty())
            .collect();
        Self { patterns }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    fn matches(&self, path: &str) -> bool {
        let path = segments(path);
        self.patterns.iter().any(|pattern| {
            path.windows(pattern.len())
                .any(|window| window == pattern.as_slice())
        })
    }
}

impl LinkFilter for PathDenylist {
    fn name(&self) -> &'static str {
        "path-denylist"
    }

    fn rejects(&self, _page: &CanonicalUrl, candidate: &CanonicalUrl) -> bool {
        self.matches(candidate.path())
    }
}

/// Rejects links whose last path segment ends in a denied extension
#[derive(Debug, Clone, Default)]
pub struct FileExtension {
    extensions: Vec<String>,
}

impl FileExtension {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }
}

impl LinkFilter for FileExtension {
    fn name(&self) -> &'static str {
        "file-extension"
    }

    fn rejects(&self, _page: &CanonicalUrl, candidate: &CanonicalUrl) -> bool {
        let Some(segment) = candidate.last_segment() else {
            return false;
        };
        match segment.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|denied| *denied == ext)
            }
            _ => false,
        }
    }
}

/// Ordered set of link filters
pub struct LinkPolicy {
    filters: Vec<Box<dyn LinkFilter>>,
}

impl LinkPolicy {
    /// Creates a policy with no filters
    pub fn empty() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The stock policy: same-origin, root path, path denylist, extension
    pub fn with_defaults() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }

    /// The stock policy extended with configured paths and extensions
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let paths = DEFAULT_DENIED_PATHS
            .iter()
            .map(|s| s.to_string())
            .chain(config.extra_denied_paths.iter().cloned());
        let extensions = DEFAULT_DENIED_EXTENSIONS
            .iter()
            .map(|s| s.to_string())
            .chain(config.extra_denied_extensions.iter().cloned());

        Self::empty()
            .with_filter(SameOrigin)
            .with_filter(RootPath)
            .with_filter(PathDenylist::new(paths))
            .with_filter(FileExtension::new(extensions))
    }

    /// Appends a filter after the existing ones
    pub fn with_filter(mut self, filter: impl LinkFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the filters in evaluation order
    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Returns the name of the first filter rejecting `candidate`, if any
    pub fn rejection(&self, page: &CanonicalUrl, candidate: &CanonicalUrl) -> Option<&'static str> {
        self.filters
            .iter()
            .find(|filter| filter.rejects(page, candidate))
            .map(|filter| filter.name())
    }

    pub fn accepts(&self, page: &CanonicalUrl, candidate: &CanonicalUrl) -> bool {
        self.rejection(page, candidate).is_none()
    }
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for LinkPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkPolicy")
            .field("filters", &self.filter_names())
            .finish()
    }
}

fn segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_ascii_lowercase())
        .collect()
}
