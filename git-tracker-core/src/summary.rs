//! Summary content: asking the user for it, and naming/encoding it for upload.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{error, info};

use crate::contract::{Notifier, PromptRequest, SummaryPrompt};
use crate::error::TrackerError;

pub const SUMMARY_PROMPT: &str = "Enter your summary";
pub const SUMMARY_PLACEHOLDER: &str = "What did you work on?";
pub const DEFAULT_LOGS_DIR: &str = "logs";

pub fn summary_request() -> PromptRequest {
    PromptRequest {
        prompt: SUMMARY_PROMPT.to_string(),
        placeholder: SUMMARY_PLACEHOLDER.to_string(),
        multiline: true,
    }
}

/// Ask the user what they worked on.
///
/// A dismissed prompt and a blank answer are both treated as "no summary":
/// the user is told so and [`TrackerError::EmptySummary`] is returned.
pub async fn generate_summary_content<P, N>(prompt: &P, notifier: &N) -> Result<String, TrackerError>
where
    P: SummaryPrompt + ?Sized,
    N: Notifier + ?Sized,
{
    let answer = match prompt.ask(&summary_request()).await {
        Ok(answer) => answer,
        Err(e) => {
            error!(error = ?e, "Summary prompt failed");
            return Err(TrackerError::Prompt(e.to_string()));
        }
    };

    match answer {
        Some(text) if !text.trim().is_empty() => {
            info!(chars = text.chars().count(), "Summary content received");
            Ok(text)
        }
        _ => {
            notifier.error(&TrackerError::EmptySummary.to_string());
            info!("No summary content provided");
            Err(TrackerError::EmptySummary)
        }
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T09:30:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn summary_path(logs_dir: &str, timestamp: &str) -> String {
    let dir = logs_dir.trim_matches('/');
    if dir.is_empty() {
        format!("summary-{timestamp}.md")
    } else {
        format!("{dir}/summary-{timestamp}.md")
    }
}

pub fn commit_message(timestamp: &str) -> String {
    format!("Summary-time: {timestamp}")
}

pub fn encode_content(content: &str) -> String {
    STANDARD.encode(content.as_bytes())
}
