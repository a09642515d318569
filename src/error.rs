//! Error types shared by the acquisition, summarization and answering steps.
//!
//! Every external call site returns a [`NewsError`]. Callers that need to tell
//! "nothing there" apart from "try again later" or "fix your setup" use
//! [`NewsError::kind`] instead of matching on individual variants.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced while talking to news sources and model endpoints.
#[derive(Debug, Error)]
pub enum NewsError {
    /// The HTTP request could not be sent or the body could not be read.
    ///
    /// The request URL is stripped on conversion so query parameters never
    /// reach warnings, answers or logs.
    #[error("request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// The remote service answered with a non-success status.
    #[error("{service} returned status {status}: {body}")]
    Status {
        /// Which service answered (e.g. `"news api"`).
        service: &'static str,
        /// The HTTP status code.
        status: StatusCode,
        /// Response body, truncated for logging.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("could not parse {what}: {reason}")]
    Parse {
        /// What was being parsed.
        what: &'static str,
        /// Parser message.
        reason: String,
    },

    /// The page or response was well formed but held nothing usable.
    #[error("no usable content: {0}")]
    NoContent(String),

    /// A required secret is absent from the environment and the command line.
    #[error("missing secret {0}; set it in the environment or pass it on the command line")]
    MissingSecret(&'static str),

    /// Settings are present but invalid (bad URL, bad selector, bad bounds).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The log store could not be written.
    #[error("log write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`NewsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The source answered but had nothing usable.
    NoData,
    /// Network trouble, rate limiting or a server-side error.
    Transient,
    /// Credentials, URLs or settings need fixing; retrying will not help.
    Misconfigured,
}

impl NewsError {
    /// Classify the error for callers that only care about the broad category.
    pub fn kind(&self) -> FailureKind {
        match self {
            NewsError::Http(e) if e.is_builder() => FailureKind::Misconfigured,
            NewsError::Http(_) | NewsError::Io(_) => FailureKind::Transient,
            NewsError::Status { status, .. } => match *status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FailureKind::Misconfigured,
                s if s == StatusCode::TOO_MANY_REQUESTS || s.is_server_error() => {
                    FailureKind::Transient
                }
                _ => FailureKind::Misconfigured,
            },
            NewsError::Parse { .. } | NewsError::NoContent(_) => FailureKind::NoData,
            NewsError::MissingSecret(_) | NewsError::InvalidConfig(_) => {
                FailureKind::Misconfigured
            }
        }
    }

    pub(crate) fn parse(what: &'static str, reason: impl ToString) -> Self {
        NewsError::Parse {
            what,
            reason: reason.to_string(),
        }
    }
}

impl From<reqwest::Error> for NewsError {
    fn from(e: reqwest::Error) -> Self {
        NewsError::Http(e.without_url())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, NewsError>;
