//! Output records and the assembler that builds them
//!
//! An [`OutputRecord`] is the uniform shape every harvested item takes,
//! whether it came from a web page or an uploaded PDF.

use crate::config::AttributionConfig;
use crate::extract::ExtractedContent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a record's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Blog,
    PodcastTranscript,
    Book,
    #[default]
    Other,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::PodcastTranscript => "podcast_transcript",
            Self::Book => "book",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Team and user identifiers attached to every record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    pub team_id: String,
    pub user_id: String,
}

impl Attribution {
    pub fn new(team_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            team_id: team_id.into(),
            user_id: user_id.into(),
        }
    }
}

impl From<&AttributionConfig> for Attribution {
    fn from(config: &AttributionConfig) -> Self {
        Self::new(&config.team_id, &config.user_id)
    }
}

/// One harvested item in the canonical output schema
///
/// All keys are always serialized; `author` is `null` when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub title: String,
    pub content: String,
    pub content_type: ContentType,
    pub source_url: String,
    pub author: Option<String>,
    pub user_id: String,
    pub team_id: String,
}

/// Maps extraction output plus traversal metadata into [`OutputRecord`]s
#[derive(Debug, Clone)]
pub struct RecordAssembler {
    attribution: Attribution,
    default_content_type: ContentType,
}

impl RecordAssembler {
    /// Creates an assembler stamping records with `attribution`
    ///
    /// `default_content_type` is used whenever `assemble` gets no hint.
    pub fn new(attribution: Attribution, default_content_type: ContentType) -> Self {
        Self {
            attribution,
            default_content_type,
        }
    }

    pub fn attribution(&self) -> &Attribution {
        &self.attribution
    }

    /// Builds a record for one extracted item
    ///
    /// An empty title falls back to the last path segment of `source_url`,
    /// then to `source_url` itself. Blank authors become `None`.
    pub fn assemble(
        &self,
        extracted: ExtractedContent,
        source_url: &str,
        content_type_hint: Option<ContentType>,
    ) -> OutputRecord {
        let ExtractedContent {
            title,
            body,
            author,
        } = extracted;

        let title = match title.trim() {
            "" => fallback_title(source_url),
            trimmed => trimmed.to_string(),
        };

        let author = author
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());

        OutputRecord {
            title,
            content: body,
            content_type: content_type_hint.unwrap_or(self.default_content_type),
            source_url: source_url.to_string(),
            author,
            user_id: self.attribution.user_id.clone(),
            team_id: self.attribution.team_id.clone(),
        }
    }
}

fn fallback_title(source_url: &str) -> String {
    url::Url::parse(source_url)
        .ok()
        .and_then(|url| {
            url.path_segments()?
                .filter(|segment| !segment.is_empty())
                .last()
                .map(str::to_string)
        })
        .unwrap_or_else(|| source_url.to_string())
}
