//! Runtime settings.
//!
//! Settings come from an optional YAML file where every field has a default,
//! then the command line overrides a few of them. Secrets never live in the
//! file; they are read from the environment (see [`Secrets`]).
//!
//! ```yaml
//! source: scrape
//! batch_size: 3
//! log_file: logs/news_log.csv
//! summarizer:
//!   max_input_chars: 2000
//!   fallback_chars: 300
//! llm:
//!   model: gemini-2.0-flash
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::{NewsError, Result};

/// Which acquisition strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Call the news aggregation API.
    #[default]
    Api,
    /// Scrape the configured news website.
    Scrape,
}

/// News aggregation API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsApiSettings {
    pub base_url: String,
    pub country: String,
    pub language: String,
}

impl Default for NewsApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org".to_string(),
            country: "in".to_string(),
            language: "en".to_string(),
        }
    }
}

/// Website scraping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeSettings {
    /// Front page that lists the headlines.
    pub page_url: String,
    /// CSS selector for headline links on the front page.
    pub link_selector: String,
    pub user_agent: String,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            page_url: "https://www.livemint.com/".to_string(),
            link_selector: "li.newsBlock h3 a, h2.imgStory a".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

/// Summarization endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerSettings {
    /// Full inference URL of the summarization model.
    pub url: String,
    /// Body text is cut to this many characters before it is sent.
    pub max_input_chars: usize,
    /// Requested summary length bounds, in model tokens.
    pub min_length: u32,
    pub max_length: u32,
    /// Length of the raw-text prefix used when the model call fails.
    pub fallback_chars: usize,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            url: "https://api-inference.huggingface.co/models/facebook/bart-large-cnn".to_string(),
            max_input_chars: 2000,
            min_length: 30,
            max_length: 150,
            fallback_chars: 300,
        }
    }
}

/// Generative-language endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.0-flash".to_string(),
        }
    }
}

/// All non-secret settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub source: SourceKind,
    /// Maximum number of headlines per batch. Defaults to 5 for the API and 3 for scraping.
    pub batch_size: Option<usize>,
    pub log_file: PathBuf,
    /// Request timeout for every outbound call. Unset means the client default.
    pub http_timeout_secs: Option<u64>,
    pub news_api: NewsApiSettings,
    pub scrape: ScrapeSettings,
    pub summarizer: SummarizerSettings,
    pub llm: LlmSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            batch_size: None,
            log_file: PathBuf::from("news_log.csv"),
            http_timeout_secs: None,
            news_api: NewsApiSettings::default(),
            scrape: ScrapeSettings::default(),
            summarizer: SummarizerSettings::default(),
            llm: LlmSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file, or defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    NewsError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
                })?;
                let settings: Settings = serde_yaml::from_str(&raw).map_err(|e| {
                    NewsError::InvalidConfig(format!("cannot parse {}: {e}", path.display()))
                })?;
                info!(path = %path.display(), "Loaded settings file");
                settings
            }
            None => {
                debug!("No settings file given; using defaults");
                Settings::default()
            }
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Effective batch size for the selected source.
    pub fn batch_size(&self) -> usize {
        self.batch_size.unwrap_or(match self.source {
            SourceKind::Api => 5,
            SourceKind::Scrape => 3,
        })
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }

    /// Reject settings that can only fail later.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == Some(0) {
            return Err(NewsError::InvalidConfig("batch_size must be at least 1".into()));
        }
        if self.summarizer.min_length > self.summarizer.max_length {
            return Err(NewsError::InvalidConfig(format!(
                "summarizer.min_length ({}) exceeds summarizer.max_length ({})",
                self.summarizer.min_length, self.summarizer.max_length
            )));
        }
        for (name, value) in [
            ("news_api.base_url", &self.news_api.base_url),
            ("scrape.page_url", &self.scrape.page_url),
            ("summarizer.url", &self.summarizer.url),
            ("llm.base_url", &self.llm.base_url),
        ] {
            Url::parse(value)
                .map_err(|e| NewsError::InvalidConfig(format!("{name} '{value}': {e}")))?;
        }
        Ok(())
    }
}

/// Credentials read from the environment or the command line.
#[derive(Clone, Default)]
pub struct Secrets {
    pub gemini_api_key: Option<String>,
    pub news_api_key: Option<String>,
    pub hf_api_token: Option<String>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<set>"))
            .field("news_api_key", &self.news_api_key.as_ref().map(|_| "<set>"))
            .field("hf_api_token", &self.hf_api_token.as_ref().map(|_| "<set>"))
            .finish()
    }
}

/// Secrets confirmed present for the selected source.
#[derive(Clone)]
pub struct RequiredSecrets {
    pub gemini_api_key: String,
    /// Only present when the API source is selected.
    pub news_api_key: Option<String>,
    pub hf_api_token: Option<String>,
}

impl Secrets {
    /// Check that every secret the selected source needs is present and non-blank.
    pub fn require(self, source: SourceKind) -> Result<RequiredSecrets> {
        let gemini_api_key =
            non_blank(self.gemini_api_key).ok_or(NewsError::MissingSecret("GEMINI_API_KEY"))?;
        let news_api_key = match source {
            SourceKind::Api => Some(
                non_blank(self.news_api_key).ok_or(NewsError::MissingSecret("NEWS_API_KEY"))?,
            ),
            SourceKind::Scrape => None,
        };
        Ok(RequiredSecrets {
            gemini_api_key,
            news_api_key,
            hf_api_token: non_blank(self.hf_api_token),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
