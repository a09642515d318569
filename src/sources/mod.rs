//! Headline sources.
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | News API | [`newsapi`] | `GET /v2/top-headlines` | Requires `NEWS_API_KEY` |
//! | News website | [`scrape`] | HTML scraping | Ordered [`extract`] strategies per article page |
//!
//! Exactly one source is active per run; they are alternatives, never merged.

pub mod extract;
pub mod newsapi;
pub mod scrape;

use crate::config::{RequiredSecrets, Settings, SourceKind};
use crate::error::{NewsError, Result};
use crate::models::Article;

use newsapi::NewsApiSource;
use scrape::ScrapeSource;

/// The configured acquisition strategy.
#[derive(Debug)]
pub enum HeadlineSource {
    Api(NewsApiSource),
    Scrape(ScrapeSource),
}

impl HeadlineSource {
    /// Build the source selected in `settings` on top of a shared `client`.
    pub fn from_settings(
        settings: &Settings,
        secrets: &RequiredSecrets,
        client: reqwest::Client,
    ) -> Result<Self> {
        let limit = settings.batch_size();
        match settings.source {
            SourceKind::Api => {
                let key = secrets
                    .news_api_key
                    .clone()
                    .ok_or(NewsError::MissingSecret("NEWS_API_KEY"))?;
                Ok(HeadlineSource::Api(NewsApiSource::new(
                    client,
                    &settings.news_api,
                    key,
                    limit,
                )?))
            }
            SourceKind::Scrape => Ok(HeadlineSource::Scrape(ScrapeSource::new(
                client,
                &settings.scrape,
                limit,
            )?)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HeadlineSource::Api(_) => "news-api",
            HeadlineSource::Scrape(_) => "scrape",
        }
    }

    /// Fetch raw articles. An `Err` means the source as a whole failed.
    pub async fn fetch_articles(&self) -> Result<Vec<Article>> {
        match self {
            HeadlineSource::Api(source) => source.fetch().await,
            HeadlineSource::Scrape(source) => source.fetch().await,
        }
    }
}
