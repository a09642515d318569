//! Headline acquisition: fetch, summarize, log.
//!
//! Articles are processed one at a time in source order. Every headline that
//! gets a summary (from the model or the fallback) is appended to the CSV log
//! before it is returned. A source-level failure yields an empty batch with a
//! warning instead of an error.

use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::error::NewsError;
use crate::models::{Headline, HeadlineBatch};
use crate::outputs::csv_log::{HEADLINE_CATEGORY, HeadlineLog};
use crate::sources::HeadlineSource;
use crate::summarize::{Summarize, SummarizerAdapter, SummaryOrigin};

/// Runs one acquisition against the configured source.
#[derive(Debug)]
pub struct Acquirer<S> {
    source: HeadlineSource,
    summarizer: SummarizerAdapter<S>,
    log: HeadlineLog,
}

impl<S: Summarize> Acquirer<S> {
    pub fn new(source: HeadlineSource, summarizer: SummarizerAdapter<S>, log: HeadlineLog) -> Self {
        Self {
            source,
            summarizer,
            log,
        }
    }

    /// Fetch articles, summarize each, log each, and return the batch.
    #[instrument(level = "info", skip_all, fields(source = self.source.name()))]
    pub async fn acquire(&self) -> HeadlineBatch {
        let t0 = Instant::now();
        let articles = match self.source.fetch_articles().await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(error = %e, kind = ?e.kind(), "Source failed; returning empty batch");
                return HeadlineBatch::failed(source_warning(&e));
            }
        };

        let total = articles.len();
        let mut headlines = Vec::with_capacity(total);
        let mut fallbacks = 0usize;
        for article in articles {
            let summary = self.summarizer.summarize(&article.body).await;
            if summary.origin == SummaryOrigin::Fallback {
                fallbacks += 1;
            }
            if let Err(e) = self
                .log
                .append(HEADLINE_CATEGORY, &article.title, &summary.text)
                .await
            {
                warn!(path = %self.log.path().display(), error = %e, "Failed to append headline to log");
            }
            headlines.push(Headline {
                title: article.title,
                summary: summary.text,
            });
        }

        info!(
            total,
            fallbacks,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Acquired headlines"
        );
        HeadlineBatch::new(headlines)
    }
}

/// User-facing text for a source-level failure.
pub fn source_warning(error: &NewsError) -> String {
    match error {
        NewsError::Status { status, .. } => {
            format!("Failed to fetch news: {}", status.as_u16())
        }
        other => format!("Failed to fetch news: {other}"),
    }
}
