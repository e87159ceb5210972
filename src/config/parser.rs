use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use kb_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Max depth: {}", config.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a run's output can be matched to the configuration
/// that produced it.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ContentType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
max-depth = 2
politeness-interval = 250
item-budget = 20
request-timeout = 10

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[classifier]
extra-denied-paths = ["/events/"]
extra-denied-extensions = ["epub"]

[attribution]
team-id = "aline123"
user-id = "aline"

[output]
default-content-type = "blog"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_depth, 2);
        assert_eq!(config.crawler.politeness_interval, 250);
        assert_eq!(config.crawler.item_budget, Some(20));
        assert_eq!(config.crawler.request_timeout, 10);
        assert_eq!(config.user_agent.crawler_name, "TestCrawler");
        assert_eq!(config.classifier.extra_denied_paths, vec!["/events/"]);
        assert_eq!(config.attribution.team_id, "aline123");
        assert_eq!(config.output.default_content_type, ContentType::Blog);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.crawler.max_depth, 1);
        assert_eq!(config.crawler.politeness_interval, 500);
        assert_eq!(config.crawler.item_budget, None);
        assert_eq!(config.attribution.team_id, "default_team_id");
        assert_eq!(config.attribution.user_id, "default_user");
        assert_eq!(config.output.default_content_type, ContentType::Other);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_config("[crawler]\nitem-budget = 3\n").unwrap();
        assert_eq!(config.crawler.item_budget, Some(3));
        assert_eq!(config.crawler.max_depth, 1);
        assert_eq!(config.crawler.request_timeout, 30);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvest.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::Io(_)));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_content_type_rejected() {
        let result = parse_config("[output]\ndefault-content-type = \"novel\"\n");
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nitem-budget = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_load_config_with_hash() {
        let file = create_temp_config("[crawler]\nmax-depth = 1\n");
        let (config, hash) = load_config_with_hash(file.path()).unwrap();
        assert_eq!(config.crawler.max_depth, 1);
        assert_eq!(hash.len(), 64);
    }
}
