//! Append-only CSV log of fetched headlines.
//!
//! Each row is `timestamp,category,title,summary` with the timestamp in local
//! time as `YYYY-MM-DD HH:MM:SS`. The file is opened in append mode for every
//! write and closed again; it is never read back, rotated or truncated.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::utils::ensure_parent_dir;

/// Category written for every fetched headline.
pub const HEADLINE_CATEGORY: &str = "Headline";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Handle to the CSV log file. Holds only the path.
#[derive(Debug, Clone)]
pub struct HeadlineLog {
    path: PathBuf,
}

impl HeadlineLog {
    /// The file is not touched until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row stamped with the current local time.
    pub async fn append(&self, category: &str, title: &str, summary: &str) -> Result<()> {
        self.append_at(Local::now(), category, title, summary).await
    }

    /// Append one row with an explicit timestamp.
    ///
    /// Creates the parent directory and the file when missing, then opens the
    /// file in append mode, writes a single `\r\n`-terminated record and closes
    /// it again. Earlier rows are never rewritten.
    ///
    /// # Arguments
    ///
    /// * `at` - Local time written as `YYYY-MM-DD HH:MM:SS`
    /// * `category` - Record category, [`HEADLINE_CATEGORY`] for fetched headlines
    /// * `title` - Headline title
    /// * `summary` - Summary text, model output or fallback
    ///
    /// # Returns
    ///
    /// `Ok(())` once the row is flushed, or [`NewsError::Io`](crate::error::NewsError::Io)
    /// if the directory or file cannot be written.
    #[instrument(level = "debug", skip_all, fields(path = %self.path.display(), %title))]
    pub async fn append_at(
        &self,
        at: DateTime<Local>,
        category: &str,
        title: &str,
        summary: &str,
    ) -> Result<()> {
        ensure_parent_dir(&self.path).await?;
        let timestamp = at.format(TIMESTAMP_FORMAT).to_string();
        let row = csv_row(&[&timestamp, category, title, summary]);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(row.as_bytes()).await?;
        file.flush().await?;
        debug!("Appended log row");
        Ok(())
    }
}

/// Quote a field only when it holds a delimiter, a quote or a line break.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// One CSV record terminated by `\r\n`.
fn csv_row(fields: &[&str]) -> String {
    let mut row = fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",");
    row.push_str("\r\n");
    row
}
