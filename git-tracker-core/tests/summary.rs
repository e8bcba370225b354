mod common;

use chrono::{TimeZone, Utc};
use common::RecordingNotifier;
use git_tracker_core::contract::MockSummaryPrompt;
use git_tracker_core::summary::{
    commit_message, encode_content, format_timestamp, generate_summary_content, summary_path,
};

#[test]
fn timestamp_is_iso8601_utc_with_millis() {
    let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
        + chrono::Duration::milliseconds(67);
    assert_eq!(format_timestamp(at), "2024-01-02T03:04:05.067Z");
}

#[test]
fn path_and_message_follow_the_timestamp() {
    let ts = "2024-01-02T03:04:05.067Z";
    assert_eq!(summary_path("logs", ts), "logs/summary-2024-01-02T03:04:05.067Z.md");
    assert_eq!(summary_path("", ts), "summary-2024-01-02T03:04:05.067Z.md");
    assert_eq!(commit_message(ts), "Summary-time: 2024-01-02T03:04:05.067Z");
}

#[test]
fn content_is_standard_base64_of_utf8() {
    assert_eq!(encode_content("héllo\nwörld"), "aMOpbGxvCnfDtnJsZA==");
}

#[tokio::test]
async fn prompt_asks_multiline_with_placeholder() {
    let mut prompt = MockSummaryPrompt::new();
    prompt
        .expect_ask()
        .withf(|req| {
            req.prompt == "Enter your summary"
                && req.placeholder == "What did you work on?"
                && req.multiline
        })
        .times(1)
        .returning(|_| Ok(Some("line one\nline two".to_string())));
    let notifier = RecordingNotifier::default();

    let text = generate_summary_content(&prompt, &notifier)
        .await
        .expect("summary should be accepted");

    assert_eq!(text, "line one\nline two");
    assert!(notifier.notes().is_empty());
}
