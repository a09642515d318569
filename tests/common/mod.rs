#![allow(dead_code)]

use std::cell::Cell;
use std::path::Path;

use newsbot::answer::{AskAsync, QuestionAnswerer};
use newsbot::config::{NewsApiSettings, ScrapeSettings};
use newsbot::error::{NewsError, Result};
use newsbot::outputs::csv_log::HeadlineLog;
use newsbot::pipeline::Acquirer;
use newsbot::session::Session;
use newsbot::sources::HeadlineSource;
use newsbot::sources::newsapi::NewsApiSource;
use newsbot::sources::scrape::ScrapeSource;
use newsbot::summarize::{Summarize, SummarizerAdapter};

/// Summarizer that fails for one exact input and otherwise returns a fixed prefix.
pub struct FakeSummarizer {
    pub fail_on: Option<String>,
    pub calls: Cell<usize>,
}

impl FakeSummarizer {
    pub fn ok() -> Self {
        Self {
            fail_on: None,
            calls: Cell::new(0),
        }
    }

    pub fn failing_on(text: &str) -> Self {
        Self {
            fail_on: Some(text.to_string()),
            calls: Cell::new(0),
        }
    }
}

impl Summarize for FakeSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        if self.fail_on.as_deref() == Some(text) {
            return Err(NewsError::NoContent("model crashed".into()));
        }
        Ok(format!("Summary of: {}", text.chars().take(20).collect::<String>()))
    }
}

/// LLM that answers with the prompt it received.
pub struct EchoLlm;

impl AskAsync for EchoLlm {
    async fn ask(&self, prompt: &str) -> Result<String> {
        Ok(format!("ANSWER[{prompt}]"))
    }
}

pub fn api_source(server_url: &str, page_size: usize) -> HeadlineSource {
    let settings = NewsApiSettings {
        base_url: server_url.to_string(),
        ..NewsApiSettings::default()
    };
    HeadlineSource::Api(
        NewsApiSource::new(reqwest::Client::new(), &settings, "test-key", page_size).unwrap(),
    )
}

pub fn scrape_source(server_url: &str, limit: usize) -> HeadlineSource {
    let settings = ScrapeSettings {
        page_url: format!("{server_url}/"),
        ..ScrapeSettings::default()
    };
    HeadlineSource::Scrape(ScrapeSource::new(reqwest::Client::new(), &settings, limit).unwrap())
}

pub fn session<S: Summarize, A: AskAsync>(
    source: HeadlineSource,
    summarizer: S,
    llm: A,
    log_path: &Path,
) -> Session<S, A> {
    Session::new(
        Acquirer::new(
            source,
            SummarizerAdapter::new(summarizer, 2000, 300),
            HeadlineLog::new(log_path),
        ),
        QuestionAnswerer::new(llm),
    )
}

/// Number of rows in the CSV log, zero if the file does not exist.
pub fn log_rows(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .map(|s| s.lines().count())
        .unwrap_or(0)
}
