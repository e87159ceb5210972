use crate::output::ContentType;
use serde::Deserialize;

/// Main configuration structure for kb-harvest
///
/// Every section is optional; a missing file or section yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub classifier: ClassifierConfig,
    pub attribution: AttributionConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum depth to expand from seed URLs
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Minimum time between the end of one fetch and the start of the next (milliseconds)
    #[serde(rename = "politeness-interval")]
    pub politeness_interval: u64,

    /// Maximum number of records a run may produce
    #[serde(rename = "item-budget")]
    pub item_budget: Option<usize>,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Capacity of the record channel in parallel mode
    #[serde(rename = "channel-capacity")]
    pub channel_capacity: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            politeness_interval: 500,
            item_budget: None,
            request_timeout: 30,
            channel_capacity: 32,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "kb-harvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/kb-harvest".to_string(),
            contact_email: "kb-harvest@example.com".to_string(),
        }
    }
}

/// Extra vocabulary for the link classifier
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Additional path fragments (e.g. "/events/") that mark non-article links
    #[serde(rename = "extra-denied-paths")]
    pub extra_denied_paths: Vec<String>,

    /// Additional file extensions (without the dot) that mark non-document links
    #[serde(rename = "extra-denied-extensions")]
    pub extra_denied_extensions: Vec<String>,
}

/// Identifiers attached to every record
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AttributionConfig {
    #[serde(rename = "team-id")]
    pub team_id: String,

    #[serde(rename = "user-id")]
    pub user_id: String,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            team_id: "default_team_id".to_string(),
            user_id: "default_user".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Content type assigned to web items when nothing finer is known
    #[serde(rename = "default-content-type")]
    pub default_content_type: ContentType,
}
