//! Terminal rendering for headline batches and answers.

use crate::models::{Exchange, HeadlineBatch};

/// Shown when a batch has no headlines.
pub const EMPTY_BATCH_MESSAGE: &str = "No news fetched. Please refresh.";

/// Render a batch as plain text: numbered titles, each followed by its summary.
pub fn render_batch(batch: &HeadlineBatch) -> String {
    let mut out = String::new();
    if let Some(warning) = &batch.warning {
        out.push_str(&format!("warning: {warning}\n"));
    }
    if batch.is_empty() {
        out.push_str(EMPTY_BATCH_MESSAGE);
        out.push('\n');
        return out;
    }

    out.push_str(&format!(
        "Today's Headlines ({})\n\n",
        batch.fetched_at.format("%Y-%m-%d %H:%M")
    ));
    for (i, headline) in batch.headlines.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, headline.title));
        for line in headline.summary.lines() {
            out.push_str(&format!("   {line}\n"));
        }
        out.push('\n');
    }
    out
}

/// Render a batch as pretty JSON.
pub fn render_batch_json(batch: &HeadlineBatch) -> serde_json::Result<String> {
    serde_json::to_string_pretty(batch)
}

pub fn render_answer(exchange: &Exchange) -> String {
    format!("Q: {}\nA: {}\n", exchange.question, exchange.answer.trim_end())
}
