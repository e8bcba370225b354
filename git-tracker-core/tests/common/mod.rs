#![allow(dead_code)]

use git_tracker_core::contract::{
    CommitInfo, MockSummaryPrompt, Notifier, PromptRequest, Repository,
};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Note {
    Info(String),
    Error(String),
}

/// Notifier that keeps every message for later assertions.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notes: Arc<Mutex<Vec<Note>>>,
}

impl RecordingNotifier {
    pub fn notes(&self) -> Vec<Note> {
        self.notes.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notes()
            .into_iter()
            .filter_map(|n| match n {
                Note::Error(m) => Some(m),
                Note::Info(_) => None,
            })
            .collect()
    }

    pub fn infos(&self) -> Vec<String> {
        self.notes()
            .into_iter()
            .filter_map(|n| match n {
                Note::Info(m) => Some(m),
                Note::Error(_) => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.notes.lock().unwrap().push(Note::Info(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notes.lock().unwrap().push(Note::Error(message.to_string()));
    }
}

pub fn prompt_answering(answer: Option<&'static str>) -> MockSummaryPrompt {
    let mut prompt = MockSummaryPrompt::new();
    prompt
        .expect_ask()
        .returning(move |_req: &PromptRequest| Ok(answer.map(str::to_string)));
    prompt
}

pub fn repository(owner: &str, name: &str) -> Repository {
    Repository {
        name: name.to_string(),
        full_name: format!("{owner}/{name}"),
        private: true,
        default_branch: Some("main".to_string()),
        html_url: Some(format!("https://github.com/{owner}/{name}")),
    }
}

pub fn commit_info(path: &str) -> CommitInfo {
    CommitInfo {
        path: path.to_string(),
        sha: "blob123".to_string(),
        commit_sha: "commit456".to_string(),
    }
}
