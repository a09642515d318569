//! Website scraping source.
//!
//! Two phases, like every scraper in this crate:
//!
//! 1. **Indexing**: fetch the front page and collect headline links matching
//!    the configured selector, resolved against the page URL
//! 2. **Fetching**: download each of the first N article pages and run the
//!    [extraction strategies](super::extract) over it
//!
//! An article that fails to download or yields no heading/content is logged
//! and skipped. Only a failure to read the front page fails the whole source.

use futures::stream::{self, StreamExt};
use itertools::Itertools;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::extract::{ExtractStrategy, default_strategies, extract_first};
use crate::config::ScrapeSettings;
use crate::error::{NewsError, Result};
use crate::models::Article;
use crate::utils::truncate_for_log;

/// Scraper for a single news website.
pub struct ScrapeSource {
    client: reqwest::Client,
    page_url: Url,
    link_selector: Selector,
    strategies: Vec<Box<dyn ExtractStrategy>>,
    limit: usize,
}

impl std::fmt::Debug for ScrapeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrapeSource")
            .field("page_url", &self.page_url.as_str())
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("limit", &self.limit)
            .finish()
    }
}

impl ScrapeSource {
    /// Build a scraper with the default extraction strategies.
    pub fn new(client: reqwest::Client, settings: &ScrapeSettings, limit: usize) -> Result<Self> {
        Self::with_strategies(client, settings, limit, default_strategies()?)
    }

    /// Build a scraper with a custom, ordered list of extraction strategies.
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client used for the front page and every article
    /// * `settings` - Front page URL and the CSS selector for headline links
    /// * `limit` - Maximum number of article links followed per fetch
    /// * `strategies` - Tried in order on each article page; the first hit wins
    ///
    /// # Returns
    ///
    /// The scraper, or [`NewsError::InvalidConfig`] if the page URL or the link
    /// selector does not parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use newsbot::config::ScrapeSettings;
    /// use newsbot::sources::extract::JsonLdArticle;
    /// use newsbot::sources::scrape::ScrapeSource;
    ///
    /// let scraper = ScrapeSource::with_strategies(
    ///     reqwest::Client::new(),
    ///     &ScrapeSettings::default(),
    ///     3,
    ///     vec![Box::new(JsonLdArticle::new()?)],
    /// )?;
    /// # Ok::<(), newsbot::error::NewsError>(())
    /// ```
    pub fn with_strategies(
        client: reqwest::Client,
        settings: &ScrapeSettings,
        limit: usize,
        strategies: Vec<Box<dyn ExtractStrategy>>,
    ) -> Result<Self> {
        let page_url = Url::parse(&settings.page_url).map_err(|e| {
            NewsError::InvalidConfig(format!("scrape.page_url '{}': {e}", settings.page_url))
        })?;
        let link_selector = Selector::parse(&settings.link_selector).map_err(|e| {
            NewsError::InvalidConfig(format!(
                "scrape.link_selector '{}': {e}",
                settings.link_selector
            ))
        })?;
        Ok(Self {
            client,
            page_url,
            link_selector,
            strategies,
            limit,
        })
    }

    /// Fetch up to `limit` articles, skipping any that cannot be extracted.
    #[instrument(level = "info", skip_all, fields(page = %self.page_url, limit = self.limit))]
    pub async fn fetch(&self) -> Result<Vec<Article>> {
        let links = self.index_articles().await?;

        let articles: Vec<Article> = stream::iter(links)
            .then(|url| async move {
                match self.fetch_article(&url).await {
                    Ok(article) => {
                        debug!(%url, title = %article.title, "Fetched article");
                        Some(article)
                    }
                    Err(e) => {
                        warn!(%url, error = %e, kind = ?e.kind(), "Skipping article");
                        None
                    }
                }
            })
            .filter_map(std::future::ready)
            .collect()
            .await;

        info!(count = articles.len(), "Fetched scraped article contents");
        Ok(articles)
    }

    /// Collect the first `limit` distinct headline links from the front page.
    #[instrument(level = "info", skip_all)]
    pub async fn index_articles(&self) -> Result<Vec<Url>> {
        let html = self.get_page(&self.page_url).await?;
        let links = headline_links(&html, &self.page_url, &self.link_selector, self.limit);
        info!(count = links.len(), source = %self.page_url, "Indexed article URLs");
        debug!(urls = ?links.iter().map(Url::as_str).collect::<Vec<_>>(), "Article URLs");
        Ok(links)
    }

    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch_article(&self, url: &Url) -> Result<Article> {
        let html = self.get_page(url).await?;
        let document = Html::parse_document(&html);
        let (strategy, extracted) = extract_first(&self.strategies, &document)
            .ok_or_else(|| NewsError::NoContent(format!("no heading and content at {url}")))?;
        debug!(strategy, bytes = extracted.content.len(), "Extracted article");
        Ok(Article::new(extracted.heading, extracted.content))
    }

    async fn get_page(&self, url: &Url) -> Result<String> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(NewsError::Status {
                service: "news site",
                status,
                body: truncate_for_log(&body, 200),
            });
        }
        Ok(body)
    }
}

/// Resolve the `href` of every element matching `selector` against `base`,
/// dropping duplicates and non-http links, and keep the first `limit`.
pub fn headline_links(html: &str, base: &Url, selector: &Selector, limit: usize) -> Vec<Url> {
    let document = Html::parse_document(html);
    document
        .select(selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .unique()
        .take(limit)
        .collect()
}
