//! Heading and body extraction from article pages.
//!
//! News site markup changes often, so an article page is run through an
//! ordered list of [`ExtractStrategy`] implementations and the first one that
//! yields both a non-empty heading and non-empty content wins. Each strategy
//! only looks at the parsed document; none of them touch the network.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tracing::trace;

use crate::error::{NewsError, Result};
use crate::utils::normalize_whitespace;

/// Heading and body text pulled out of one article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub heading: String,
    pub content: String,
}

/// One way of finding the heading and body of an article page.
pub trait ExtractStrategy {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Return the heading and content, or `None` if either is missing or blank.
    fn extract(&self, document: &Html) -> Option<Extracted>;
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| NewsError::InvalidConfig(format!("bad CSS selector '{css}': {e}")))
}

fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Text of the first element matching `selector` that has any text.
fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(element_text)
        .find(|text| !text.is_empty())
}

/// A heading selector paired with a content selector.
#[derive(Debug)]
pub struct SelectorPair {
    name: String,
    heading: Selector,
    content: Selector,
}

impl SelectorPair {
    pub fn new(name: impl Into<String>, heading: &str, content: &str) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            heading: parse_selector(heading)?,
            content: parse_selector(content)?,
        })
    }
}

impl ExtractStrategy for SelectorPair {
    fn name(&self) -> &str {
        &self.name
    }

    fn extract(&self, document: &Html) -> Option<Extracted> {
        let heading = first_text(document, &self.heading)?;
        let content = first_text(document, &self.content)?;
        Some(Extracted { heading, content })
    }
}

/// Reads `headline` and `articleBody` from JSON-LD `<script>` blocks.
///
/// Handles a bare object, a top-level array and an `@graph` array.
#[derive(Debug)]
pub struct JsonLdArticle {
    script: Selector,
}

impl JsonLdArticle {
    pub fn new() -> Result<Self> {
        Ok(Self {
            script: parse_selector("script[type='application/ld+json']")?,
        })
    }

    fn from_node(node: &Value) -> Option<Extracted> {
        match node {
            Value::Array(items) => items.iter().find_map(Self::from_node),
            Value::Object(obj) => {
                if let Some(graph) = obj.get("@graph") {
                    if let Some(found) = Self::from_node(graph) {
                        return Some(found);
                    }
                }
                let heading = normalize_whitespace(obj.get("headline")?.as_str()?);
                let content = normalize_whitespace(obj.get("articleBody")?.as_str()?);
                (!heading.is_empty() && !content.is_empty())
                    .then_some(Extracted { heading, content })
            }
            _ => None,
        }
    }
}

impl ExtractStrategy for JsonLdArticle {
    fn name(&self) -> &str {
        "json-ld"
    }

    fn extract(&self, document: &Html) -> Option<Extracted> {
        document.select(&self.script).find_map(|script| {
            let raw = script.text().collect::<String>();
            serde_json::from_str::<Value>(raw.trim())
                .ok()
                .and_then(|json| Self::from_node(&json))
        })
    }
}

/// First `<h1>` plus every paragraph inside the article body, joined.
#[derive(Debug)]
pub struct HeadingParagraphs {
    heading: Selector,
    paragraphs: Selector,
}

impl HeadingParagraphs {
    pub fn new() -> Result<Self> {
        Ok(Self {
            heading: parse_selector("h1")?,
            paragraphs: parse_selector("article p")?,
        })
    }
}

impl ExtractStrategy for HeadingParagraphs {
    fn name(&self) -> &str {
        "h1+article-paragraphs"
    }

    fn extract(&self, document: &Html) -> Option<Extracted> {
        let heading = first_text(document, &self.heading)?;
        let content = document
            .select(&self.paragraphs)
            .map(element_text)
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        (!content.is_empty()).then_some(Extracted { heading, content })
    }
}

/// The built-in strategies, most specific first.
pub fn default_strategies() -> Result<Vec<Box<dyn ExtractStrategy>>> {
    Ok(vec![
        Box::new(SelectorPair::new(
            "story-page",
            "h1.heading",
            "div.storyPage_storyContent__3xuFc",
        )?),
        Box::new(SelectorPair::new(
            "story-content",
            "h1",
            "div[class*='storyContent'], div.contentSec, div.mainArea",
        )?),
        Box::new(JsonLdArticle::new()?),
        Box::new(HeadingParagraphs::new()?),
    ])
}

/// Run `strategies` in order and return the first hit with the strategy name.
pub fn extract_first<'a>(
    strategies: &'a [Box<dyn ExtractStrategy>],
    document: &Html,
) -> Option<(&'a str, Extracted)> {
    strategies.iter().find_map(|strategy| {
        let hit = strategy.extract(document);
        trace!(strategy = strategy.name(), matched = hit.is_some(), "Tried extraction strategy");
        hit.map(|extracted| (strategy.name(), extracted))
    })
}
