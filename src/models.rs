//! Data models passed between the pipeline steps.
//!
//! - [`Article`]: raw title and body text pulled from a source
//! - [`Headline`]: title plus summary, the unit shown to the user and fed to the LLM
//! - [`HeadlineBatch`]: one acquisition's headlines, cached for the session
//! - [`Exchange`]: one question and its answer

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A raw article as extracted from a source, before summarization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// The article headline.
    pub title: String,
    /// Body text, unbounded at this point.
    pub body: String,
}

impl Article {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// A headline with its summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub summary: String,
}

/// The result of one acquisition.
///
/// A source-level failure still produces a batch: it is empty and carries the
/// warning that should be shown in place of the headlines.
#[derive(Debug, Clone, Serialize)]
pub struct HeadlineBatch {
    /// Headlines in source order.
    pub headlines: Vec<Headline>,
    /// User-visible message when the source could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// When the acquisition finished.
    pub fetched_at: DateTime<Local>,
}

impl HeadlineBatch {
    pub fn new(headlines: Vec<Headline>) -> Self {
        Self {
            headlines,
            warning: None,
            fetched_at: Local::now(),
        }
    }

    /// An empty batch carrying a warning.
    pub fn failed(warning: impl Into<String>) -> Self {
        Self {
            headlines: Vec::new(),
            warning: Some(warning.into()),
            fetched_at: Local::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headlines.is_empty()
    }

    /// Render the batch as LLM context: `title\nsummary` blocks separated by a blank line.
    pub fn context(&self) -> String {
        self.headlines
            .iter()
            .map(|h| format!("{}\n{}", h.title, h.summary))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// One answered question. Not persisted.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub context: String,
    pub question: String,
    pub answer: String,
}
