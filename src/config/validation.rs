use crate::config::types::{ClassifierConfig, Config, CrawlerConfig, UserAgentConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Deepest expansion a configuration may ask for
const MAX_DEPTH_LIMIT: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_classifier_config(&config.classifier)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_depth must be <= {}, got {}",
            MAX_DEPTH_LIMIT, config.max_depth
        )));
    }

    if config.item_budget == Some(0) {
        return Err(ConfigError::Validation(
            "item_budget must be >= 1 when set".to_string(),
        ));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    if config.channel_capacity < 1 {
        return Err(ConfigError::Validation(format!(
            "channel_capacity must be >= 1, got {}",
            config.channel_capacity
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates classifier vocabulary extensions
fn validate_classifier_config(config: &ClassifierConfig) -> Result<(), ConfigError> {
    for fragment in &config.extra_denied_paths {
        if !fragment.starts_with('/') || fragment.trim_matches('/').is_empty() {
            return Err(ConfigError::Validation(format!(
                "Denied path fragment '{}' must start with '/' and name at least one segment",
                fragment
            )));
        }
    }

    for extension in &config.extra_denied_extensions {
        let bare = extension.trim_start_matches('.');
        if bare.is_empty() || !bare.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::Validation(format!(
                "Denied extension '{}' must be alphanumeric",
                extension
            )));
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
