//! Command-line interface definitions for NewsBot.
//!
//! Secrets can be passed as flags but are normally read from the environment.

use clap::{Parser, Subcommand};
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, Lines};
use tracing::warn;

use crate::config::{Secrets, Settings, SourceKind};

/// Command-line arguments for the NewsBot application.
///
/// # Examples
///
/// ```sh
/// # Print today's headlines from the news API
/// newsbot headlines
///
/// # Scrape the news site instead and print JSON
/// newsbot --source scrape headlines --json
///
/// # Ask a single question
/// newsbot ask "What happened in the markets today?"
///
/// # Interactive session
/// newsbot chat
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Headline source, overrides the settings file
    #[arg(short, long, value_enum, global = true)]
    pub source: Option<SourceKind>,

    /// CSV log file, overrides the settings file
    #[arg(short, long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Generative-language API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// News aggregation API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// Summarization endpoint token
    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    pub hf_api_token: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch and print the current headlines
    Headlines {
        /// Print the batch as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch the headlines and answer one question about them
    Ask {
        /// The question to ask
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Interactive session: type questions, `/refresh` to refetch, `/quit` to leave
    Chat,
}

impl Cli {
    /// The subcommand to run; `headlines` when none was given.
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Headlines { json: false })
    }

    /// Apply command-line overrides on top of loaded settings.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(source) = self.source {
            settings.source = source;
        }
        if let Some(log_file) = &self.log_file {
            settings.log_file = log_file.clone();
        }
    }

    pub fn secrets(&self) -> Secrets {
        Secrets {
            gemini_api_key: self.gemini_api_key.clone(),
            news_api_key: self.news_api_key.clone(),
            hf_api_token: self.hf_api_token.clone(),
        }
    }
}

/// One line typed during `chat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatInput<'a> {
    /// Blank line.
    Skip,
    /// `/quit` or `/exit`.
    Quit,
    /// `/refresh`: drop the cached batch and fetch again.
    Refresh,
    /// Anything else, trimmed.
    Question(&'a str),
}

pub fn parse_chat_line(line: &str) -> ChatInput<'_> {
    match line.trim() {
        "" => ChatInput::Skip,
        "/quit" | "/exit" => ChatInput::Quit,
        "/refresh" => ChatInput::Refresh,
        question => ChatInput::Question(question),
    }
}

/// Next line of chat input, `None` at end of input.
///
/// A line that is not valid UTF-8 is logged and skipped; other read errors
/// are returned.
pub async fn next_chat_line<R>(lines: &mut Lines<R>) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        match lines.next_line().await {
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(error = %e, "Ignoring input line that is not valid UTF-8");
            }
            other => return other,
        }
    }
}
