//! Configuration module for kb-harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so running without a file is supported.
//!
//! # Example
//!
//! ```no_run
//! use kb_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawler will expand to depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AttributionConfig, ClassifierConfig, Config, CrawlerConfig, OutputConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
