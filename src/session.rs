//! One user session: the cached headline batch plus question answering.
//!
//! Every answer is built from a single batch snapshot, the one most recently
//! fetched and shown, so a refresh can never mix old and new headlines into
//! one context.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::answer::{AskAsync, GeminiClient, QuestionAnswerer};
use crate::cache::BatchCache;
use crate::config::{RequiredSecrets, Settings};
use crate::error::Result;
use crate::models::{Exchange, HeadlineBatch};
use crate::outputs::csv_log::HeadlineLog;
use crate::pipeline::Acquirer;
use crate::sources::HeadlineSource;
use crate::summarize::{HuggingFaceSummarizer, Summarize, SummarizerAdapter};
use crate::utils::http_client;

/// Session wired to the hosted summarizer and Gemini.
pub type DefaultSession = Session<HuggingFaceSummarizer, GeminiClient>;

#[derive(Debug)]
pub struct Session<S, A> {
    acquirer: Acquirer<S>,
    answerer: QuestionAnswerer<A>,
    cache: BatchCache,
}

impl DefaultSession {
    /// Build every component from settings and checked secrets.
    pub fn from_settings(settings: &Settings, secrets: &RequiredSecrets) -> Result<Self> {
        let client = http_client(settings, &settings.scrape.user_agent)?;
        let source = HeadlineSource::from_settings(settings, secrets, client.clone())?;
        let summarizer = SummarizerAdapter::from_settings(
            HuggingFaceSummarizer::new(
                client.clone(),
                &settings.summarizer,
                secrets.hf_api_token.clone(),
            ),
            &settings.summarizer,
        );
        let log = HeadlineLog::new(&settings.log_file);
        let llm = GeminiClient::new(client, &settings.llm, secrets.gemini_api_key.clone())?;

        info!(
            source = source.name(),
            batch_size = settings.batch_size(),
            log_file = %settings.log_file.display(),
            "Session ready"
        );
        Ok(Session::new(
            Acquirer::new(source, summarizer, log),
            QuestionAnswerer::new(llm),
        ))
    }
}

impl<S: Summarize, A: AskAsync> Session<S, A> {
    /// Creates a session with an empty cache; nothing is fetched until
    /// [`Session::headlines`] or [`Session::ask`] is first called.
    ///
    /// # Arguments
    ///
    /// * `acquirer` - Source, summarizer and log used for each acquisition
    /// * `answerer` - Question answerer wrapping the LLM client
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn demo(
    /// #     acquirer: newsbot::pipeline::Acquirer<newsbot::summarize::HuggingFaceSummarizer>,
    /// #     llm: newsbot::answer::GeminiClient,
    /// # ) {
    /// use newsbot::answer::QuestionAnswerer;
    /// use newsbot::session::Session;
    ///
    /// let session = Session::new(acquirer, QuestionAnswerer::new(llm));
    /// let exchange = session.ask("What moved the markets?").await;
    /// println!("{}", exchange.answer);
    /// # }
    /// ```
    pub fn new(acquirer: Acquirer<S>, answerer: QuestionAnswerer<A>) -> Self {
        Self {
            acquirer,
            answerer,
            cache: BatchCache::new(),
        }
    }

    /// The current batch, acquiring it on first use.
    pub async fn headlines(&self) -> Arc<HeadlineBatch> {
        self.cache.get_or_fetch(|| self.acquirer.acquire()).await
    }

    /// Drop the cached batch and acquire a fresh one.
    #[instrument(level = "info", skip_all)]
    pub async fn refresh(&self) -> Arc<HeadlineBatch> {
        self.cache.invalidate().await;
        self.headlines().await
    }

    /// Answer `question` from the current batch.
    ///
    /// Never fails: an LLM error is returned as the answer text.
    #[instrument(level = "info", skip_all, fields(%question))]
    pub async fn ask(&self, question: &str) -> Exchange {
        let batch = self.headlines().await;
        let context = batch.context();
        let answer = self.answerer.answer(&context, question).await;
        Exchange {
            context,
            question: question.to_string(),
            answer,
        }
    }
}
