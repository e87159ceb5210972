//! kb-harvest: a knowledgebase content harvester
//!
//! This crate turns seed URLs and PDF documents into uniform records for
//! knowledgebase ingestion. Index pages are expanded into their article links
//! using generic heuristics, every discovered item is fetched politely and
//! run through a content extractor, and the results are emitted as JSON.

pub mod classifier;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for kb-harvest operations
///
/// Only setup failures surface through this type. Per-item failures during a
/// run are converted into [`output::Diagnostic`] entries instead.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No seeds provided")]
    NoSeeds,

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RunState,
        to: state::RunState,
    },

    #[error("Crawl task failed: {0}")]
    Task(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for kb-harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use classifier::{LinkClassifier, PageClassification};
pub use config::Config;
pub use crawler::{CrawlDriver, Frontier, FrontierEntry};
pub use output::{Attribution, ContentType, Diagnostic, OutputRecord, RunReport};
pub use state::RunState;
pub use self::url::{normalize_url, CanonicalUrl};
