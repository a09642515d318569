//! # NewsBot
//!
//! Fetches a handful of current headlines, summarizes each article with a
//! hosted summarization model, and answers free-form questions about them
//! with a generative-language model.
//!
//! ## Architecture
//!
//! 1. **Acquisition**: pull articles from the configured [`sources`] (news API
//!    or website scrape), summarize each through [`summarize`], append each to
//!    the CSV log, and cache the batch for the session ([`cache`])
//! 2. **Answering**: join the cached batch into one context and send it with
//!    the question to the LLM ([`answer`])
//!
//! Failures stay local: a bad article is skipped, a failed summary falls back
//! to truncated text, a failed answer becomes a readable message, and a failed
//! source becomes an empty batch with a warning.

pub mod answer;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod session;
pub mod sources;
pub mod summarize;
pub mod utils;

pub use error::{FailureKind, NewsError, Result};
pub use models::{Article, Exchange, Headline, HeadlineBatch};
pub use session::{DefaultSession, Session};
