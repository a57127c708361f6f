use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Seam between the interceptor and the human. The real terminal
/// implementation passes prompts through unchanged; the scripted one feeds
/// canned answers for tests and non-interactive harnesses.
#[async_trait]
pub trait PromptIo: Send + Sync {
    /// Presents the prompt and returns the human's trimmed answer.
    async fn ask(&self, prompt: &str) -> io::Result<String>;
}

/// Pass-through to the process's own terminal.
pub struct TerminalPromptIo;

#[async_trait]
impl PromptIo for TerminalPromptIo {
    async fn ask(&self, prompt: &str) -> io::Result<String> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(prompt.as_bytes()).await?;
        if !prompt.ends_with(' ') && !prompt.ends_with('\n') {
            stdout.write_all(b" ").await?;
        }
        stdout.flush().await?;

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        reader.read_line(&mut line).await?;
        Ok(line.trim().to_string())
    }
}

/// Programmable stub: answers come from a fixed script, every prompt that
/// reached the human path is recorded.
pub struct ScriptedPromptIo {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPromptIo {
    pub fn new(answers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Prompts that fell through to the (scripted) human.
    pub fn prompts_seen(&self) -> Vec<String> {
        self.asked.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl PromptIo for ScriptedPromptIo {
    async fn ask(&self, prompt: &str) -> io::Result<String> {
        self.asked
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());
        self.answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "prompt script exhausted"))
    }
}
