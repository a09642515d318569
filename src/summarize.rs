//! Article summarization.
//!
//! - [`Summarize`]: a single call to a summarization backend
//! - [`HuggingFaceSummarizer`]: hosted inference endpoint (`facebook/bart-large-cnn` by default)
//! - [`SummarizerAdapter`]: input truncation plus the truncation fallback
//!
//! The adapter never fails. When the backend errors, the summary is the first
//! `fallback_chars` characters of the input followed by `...`.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::config::SummarizerSettings;
use crate::error::{NewsError, Result};
use crate::utils::{truncate_chars, truncate_for_log};

/// A summarization backend.
///
/// Implementors take already-bounded text and return the model's summary.
/// Errors are returned as-is; retry and fallback policy live in the caller.
pub trait Summarize {
    async fn summarize(&self, text: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    min_length: u32,
    max_length: u32,
    do_sample: bool,
}

#[derive(Debug, Deserialize)]
struct InferenceOutput {
    summary_text: String,
}

/// Client for a hosted summarization model.
#[derive(Debug, Clone)]
pub struct HuggingFaceSummarizer {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
    min_length: u32,
    max_length: u32,
}

impl HuggingFaceSummarizer {
    pub fn new(client: reqwest::Client, settings: &SummarizerSettings, token: Option<String>) -> Self {
        Self {
            client,
            url: settings.url.clone(),
            token,
            min_length: settings.min_length,
            max_length: settings.max_length,
        }
    }
}

impl Summarize for HuggingFaceSummarizer {
    #[instrument(level = "debug", skip_all, fields(chars = text.chars().count()))]
    async fn summarize(&self, text: &str) -> Result<String> {
        let t0 = Instant::now();
        let mut request = self.client.post(&self.url).json(&InferenceRequest {
            inputs: text,
            parameters: InferenceParameters {
                min_length: self.min_length,
                max_length: self.max_length,
                do_sample: false,
            },
        });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(NewsError::Status {
                service: "summarizer",
                status,
                body: truncate_for_log(&body, 200),
            });
        }

        let outputs: Vec<InferenceOutput> = serde_json::from_str(&body)
            .map_err(|e| NewsError::parse("summarizer response", e))?;
        let summary = outputs
            .into_iter()
            .next()
            .map(|o| o.summary_text.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| NewsError::NoContent("summarizer returned no summary".into()))?;

        debug!(elapsed_ms = t0.elapsed().as_millis() as u64, "Summarizer call succeeded");
        Ok(summary)
    }
}

/// Where a summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryOrigin {
    Model,
    Fallback,
}

/// A summary and its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub origin: SummaryOrigin,
}

/// Bounds the input and applies the truncation fallback around a [`Summarize`] backend.
#[derive(Debug, Clone)]
pub struct SummarizerAdapter<S> {
    inner: S,
    max_input_chars: usize,
    fallback_chars: usize,
}

impl<S: Summarize> SummarizerAdapter<S> {
    pub fn new(inner: S, max_input_chars: usize, fallback_chars: usize) -> Self {
        Self {
            inner,
            max_input_chars,
            fallback_chars,
        }
    }

    pub fn from_settings(inner: S, settings: &SummarizerSettings) -> Self {
        Self::new(inner, settings.max_input_chars, settings.fallback_chars)
    }

    /// Summarize `text`, falling back to a truncated prefix on any backend error.
    #[instrument(level = "info", skip_all, fields(chars = text.chars().count()))]
    pub async fn summarize(&self, text: &str) -> Summary {
        let bounded = truncate_chars(text, self.max_input_chars);
        if bounded.trim().is_empty() {
            debug!("Empty input; using fallback summary");
            return self.fallback(text);
        }

        match self.inner.summarize(bounded).await {
            Ok(summary) => {
                info!(summary_chars = summary.chars().count(), "Summarized article");
                Summary {
                    text: summary,
                    origin: SummaryOrigin::Model,
                }
            }
            Err(e) => {
                warn!(error = %e, kind = ?e.kind(), "Summarizer failed; using truncated text");
                self.fallback(text)
            }
        }
    }

    fn fallback(&self, text: &str) -> Summary {
        Summary {
            text: fallback_summary(text, self.fallback_chars),
            origin: SummaryOrigin::Fallback,
        }
    }
}

/// The first `chars` characters of `text` followed by `...`.
pub fn fallback_summary(text: &str, chars: usize) -> String {
    format!("{}...", truncate_chars(text, chars))
}
