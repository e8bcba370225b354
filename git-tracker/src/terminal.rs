//! Terminal backends for the core's user-facing traits: a stdin prompt and a
//! console notifier.

use async_trait::async_trait;
use git_tracker_core::contract::{Notifier, PromptError, PromptRequest, SummaryPrompt};
use std::io::{self, BufRead, Write};

/// Read one answer from `reader`.
///
/// Single-line mode takes the first line. Multiline mode collects lines until
/// an empty line or EOF. EOF before any input means the prompt was dismissed.
pub fn read_answer<R: BufRead>(reader: &mut R, multiline: bool) -> io::Result<Option<String>> {
    let mut lines: Vec<String> = Vec::new();
    let mut saw_input = false;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        saw_input = true;
        let line = line.trim_end_matches(['\n', '\r']).to_string();
        if !multiline {
            lines.push(line);
            break;
        }
        if line.is_empty() {
            break;
        }
        lines.push(line);
    }

    if !saw_input {
        return Ok(None);
    }
    Ok(Some(lines.join("\n")))
}

/// Prompts on the controlling terminal and reads the answer from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

#[async_trait]
impl SummaryPrompt for TerminalPrompt {
    async fn ask(&self, request: &PromptRequest) -> Result<Option<String>, PromptError> {
        let request = request.clone();
        tracing::debug!(prompt = %request.prompt, "Prompting on terminal");

        tokio::task::spawn_blocking(move || -> Result<Option<String>, PromptError> {
            let mut out = io::stdout().lock();
            writeln!(out, "{}", request.prompt)?;
            if request.multiline {
                writeln!(out, "({}; finish with an empty line)", request.placeholder)?;
            } else {
                writeln!(out, "({})", request.placeholder)?;
            }
            write!(out, "> ")?;
            out.flush()?;
            drop(out);

            Ok(read_answer(&mut io::stdin().lock(), request.multiline)?)
        })
        .await
        .map_err(|e| PromptError::Other(format!("prompt task failed: {e}")))?
    }
}

/// Info to stdout, errors to stderr, both mirrored into the trace log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        tracing::info!(notification = %message, "info notification");
        println!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(notification = %message, "error notification");
        eprintln!("[ERROR] {message}");
    }
}
