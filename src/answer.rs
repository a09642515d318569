//! Question answering over the current headlines.
//!
//! # Architecture
//!
//! - [`AskAsync`]: core trait, one prompt in and one text answer out
//! - [`GeminiClient`]: `generateContent` endpoint implementation
//! - [`QuestionAnswerer`]: builds the prompt and turns any failure into a
//!   readable fallback answer
//!
//! There is exactly one call per question: no retry, no streaming, and no
//! memory of earlier questions.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, instrument, warn};
use url::Url;

use crate::config::LlmSettings;
use crate::error::{NewsError, Result};
use crate::utils::truncate_for_log;

/// Trait for async LLM interaction.
pub trait AskAsync {
    /// Send `prompt` to the model and return its text response.
    async fn ask(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Client for a Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl GeminiClient {
    /// Creates a client for `{base_url}/v1beta/models/{model}:generateContent`.
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client
    /// * `settings` - Base URL and model id; a leading `models/` on the id is accepted
    /// * `api_key` - Sent as the `x-goog-api-key` header
    ///
    /// # Returns
    ///
    /// The client, or [`NewsError::InvalidConfig`] if the base URL does not parse.
    pub fn new(
        client: reqwest::Client,
        settings: &LlmSettings,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let model = settings.model.trim();
        let model = model.strip_prefix("models/").unwrap_or(model);
        let path = format!(
            "/v1beta/models/{}:generateContent",
            urlencoding::encode(model)
        );
        let endpoint = Url::parse(&settings.base_url)
            .and_then(|base| base.join(&path))
            .map_err(|e| {
                NewsError::InvalidConfig(format!("llm.base_url '{}': {e}", settings.base_url))
            })?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }
}

impl AskAsync for GeminiClient {
    #[instrument(level = "info", skip_all, fields(endpoint = %self.endpoint))]
    async fn ask(&self, prompt: &str) -> Result<String> {
        let t0 = Instant::now();
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateRequest {
                contents: vec![Content {
                    parts: vec![Part { text: prompt }],
                }],
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(NewsError::Status {
                service: "llm",
                status,
                body: truncate_for_log(&body, 300),
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| NewsError::parse("llm response", e))?;
        let text = parsed
            .into_text()
            .ok_or_else(|| NewsError::NoContent("llm returned no candidates".into()))?;

        info!(elapsed_ms = t0.elapsed().as_millis() as u64, "LLM call succeeded");
        Ok(text)
    }
}

/// Build the prompt sent for one question.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!("{context}\n\nQuestion: {question}")
}

/// Answers questions with a fallback string in place of any error.
#[derive(Debug, Clone)]
pub struct QuestionAnswerer<A> {
    inner: A,
}

impl<A: AskAsync> QuestionAnswerer<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    /// Ask once and return the model's answer or the error.
    pub async fn try_answer(&self, context: &str, question: &str) -> Result<String> {
        self.inner.ask(&build_prompt(context, question)).await
    }

    /// Ask once; a failure becomes `"Could not answer the question: {error}"`.
    #[instrument(level = "info", skip_all, fields(context_chars = context.len(), question = %question))]
    pub async fn answer(&self, context: &str, question: &str) -> String {
        match self.try_answer(context, question).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, kind = ?e.kind(), "Question answering failed");
                format!("Could not answer the question: {e}")
            }
        }
    }
}
