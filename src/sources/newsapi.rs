//! News aggregation API source.
//!
//! Issues a single `GET /v2/top-headlines` request and turns the returned
//! articles into [`Article`]s. A non-success status is a source-level
//! failure; nothing is retried. The key travels in the `X-Api-Key` header,
//! never in the URL.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::NewsApiSettings;
use crate::error::{NewsError, Result};
use crate::models::Article;
use crate::utils::truncate_for_log;

/// The API cuts `content` short and appends e.g. `… [+2817 chars]`.
static RE_TRUNCATION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(?:…|\.\.\.)?\s*\[\+\d+ chars\]\s*$").unwrap());

#[derive(Debug, Deserialize)]
struct TopHeadlinesResponse {
    #[serde(default)]
    articles: Vec<ApiArticle>,
}

#[derive(Debug, Deserialize)]
struct ApiArticle {
    title: Option<String>,
    content: Option<String>,
    description: Option<String>,
}

impl ApiArticle {
    /// Content with the truncation marker removed, else the description.
    fn body(&self) -> Option<String> {
        let content = self
            .content
            .as_deref()
            .map(|c| RE_TRUNCATION_MARKER.replace(c, "").trim().to_string())
            .filter(|c| !c.is_empty());
        content.or_else(|| {
            self.description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
        })
    }

    fn into_article(self) -> Option<Article> {
        let body = self.body()?;
        let title = self.title?.trim().to_string();
        (!title.is_empty()).then(|| Article::new(title, body))
    }
}

/// Client for the top-headlines endpoint.
pub struct NewsApiSource {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
    country: String,
    language: String,
    page_size: usize,
}

impl std::fmt::Debug for NewsApiSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsApiSource")
            .field("endpoint", &self.endpoint.as_str())
            .field("country", &self.country)
            .field("language", &self.language)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl NewsApiSource {
    /// Creates a source for the top-headlines endpoint under `settings.base_url`.
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client (timeout and user agent already applied)
    /// * `settings` - Base URL, country and language
    /// * `api_key` - News API key, sent as the `X-Api-Key` header
    /// * `page_size` - Requested and maximum number of articles
    ///
    /// # Returns
    ///
    /// The source, or [`NewsError::InvalidConfig`] if the base URL does not parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use newsbot::config::NewsApiSettings;
    /// use newsbot::sources::newsapi::NewsApiSource;
    ///
    /// let source = NewsApiSource::new(
    ///     reqwest::Client::new(),
    ///     &NewsApiSettings::default(),
    ///     "my-key",
    ///     5,
    /// )?;
    /// # Ok::<(), newsbot::error::NewsError>(())
    /// ```
    pub fn new(
        client: reqwest::Client,
        settings: &NewsApiSettings,
        api_key: impl Into<String>,
        page_size: usize,
    ) -> Result<Self> {
        let endpoint = Url::parse(&settings.base_url)
            .and_then(|base| base.join("/v2/top-headlines"))
            .map_err(|e| {
                NewsError::InvalidConfig(format!("news_api.base_url '{}': {e}", settings.base_url))
            })?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
            country: settings.country.clone(),
            language: settings.language.clone(),
            page_size,
        })
    }

    /// Fetch up to `page_size` articles.
    ///
    /// Articles without a title, or with neither content nor description, are
    /// dropped, so the result may be shorter than `page_size` or empty.
    #[instrument(level = "info", skip_all, fields(endpoint = %self.endpoint, page_size = self.page_size))]
    pub async fn fetch(&self) -> Result<Vec<Article>> {
        let page_size = self.page_size.to_string();
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("country", self.country.as_str()),
                ("language", self.language.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(%status, "News API returned an error status");
            return Err(NewsError::Status {
                service: "news api",
                status,
                body: truncate_for_log(&body, 200),
            });
        }

        let parsed: TopHeadlinesResponse = serde_json::from_str(&body)
            .map_err(|e| NewsError::parse("news api response", e))?;
        let returned = parsed.articles.len();

        let articles: Vec<Article> = parsed
            .articles
            .into_iter()
            .take(self.page_size)
            .filter_map(|a| {
                let article = a.into_article();
                if article.is_none() {
                    debug!("Skipping API article without title or body");
                }
                article
            })
            .collect();

        info!(returned, kept = articles.len(), "Fetched articles from news API");
        Ok(articles)
    }
}
