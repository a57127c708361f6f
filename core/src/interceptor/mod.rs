pub mod detect;
pub mod io;

pub use io::{PromptIo, ScriptedPromptIo, TerminalPromptIo};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::agent::{AutoAcceptAgent, SessionStatus};
use crate::config::HookMode;
use crate::errors::InterceptError;
use crate::types::ConfirmationRequest;

/// Answer synthesized for auto-accepted prompts.
const AFFIRMATIVE: &str = "y";

#[derive(Debug, Clone)]
pub struct InterceptorStatus {
    pub active: bool,
    pub agent: SessionStatus,
}

/// Sits between the host tool's interactive prompts and the human. Detected
/// confirmation prompts are routed to the agent; everything else, and every
/// failure, goes straight to the human path.
pub struct Interceptor {
    agent: Arc<AutoAcceptAgent>,
    io: Arc<dyn PromptIo>,
    active: AtomicBool,
}

impl Interceptor {
    pub fn new(agent: Arc<AutoAcceptAgent>, io: Arc<dyn PromptIo>) -> Self {
        Self {
            agent,
            io,
            active: AtomicBool::new(false),
        }
    }

    pub fn activate(&self) {
        if self.active.swap(true, Ordering::SeqCst) {
            tracing::warn!(
                target: "autoaccept.interceptor",
                "confirmation interceptor already active"
            );
            return;
        }
        tracing::info!(target: "autoaccept.interceptor", "confirmation interceptor activated");
    }

    pub fn deactivate(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            tracing::warn!(
                target: "autoaccept.interceptor",
                "confirmation interceptor not active"
            );
            return;
        }
        tracing::info!(target: "autoaccept.interceptor", "confirmation interceptor deactivated");
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// The single entry point for host prompts. Auto-answers accepted
    /// confirmations; anything else falls open to the human path. A broken
    /// detector degrades to "ask the human", never to a silent answer.
    pub async fn confirm(&self, prompt: &str) -> Result<String, InterceptError> {
        if !self.is_active() || !detect::is_confirmation_prompt(prompt) {
            return Ok(self.io.ask(prompt).await?);
        }

        match self.try_auto_answer(prompt).await {
            Ok(Some(answer)) => Ok(answer),
            Ok(None) => Ok(self.io.ask(prompt).await?),
            Err(e) => {
                tracing::warn!(
                    target: "autoaccept.interceptor",
                    error = %e,
                    "auto-answer failed, falling back to human input"
                );
                Ok(self.io.ask(prompt).await?)
            }
        }
    }

    /// `Some(answer)` short-circuits the human; `None` means defer.
    async fn try_auto_answer(&self, prompt: &str) -> Result<Option<String>, InterceptError> {
        let operation = detect::extract_operation(prompt);

        if self.agent.hook_mode() == HookMode::Passive {
            // Passive mode only reports; evaluation goes through the
            // side-effect-free path so no quota or audit state moves.
            let outcome = self.agent.test_operation(&operation, prompt.trim());
            tracing::info!(
                target: "autoaccept.interceptor",
                operation = %operation,
                would_accept = outcome.would_accept,
                reason = %outcome.reason,
                "passive mode: prompt left to human"
            );
            return Ok(None);
        }

        let request = ConfirmationRequest::new(operation, prompt.trim());
        let request_id = request.id;
        let response = self.agent.process_confirmation_request(request).await;

        if response.accepted {
            tracing::info!(
                target: "autoaccept.interceptor",
                request_id = %request_id,
                reason = %response.reason,
                "auto-accepted confirmation"
            );
            Ok(Some(AFFIRMATIVE.to_string()))
        } else {
            tracing::info!(
                target: "autoaccept.interceptor",
                request_id = %request_id,
                reason = %response.reason,
                "confirmation requires manual input"
            );
            Ok(None)
        }
    }

    /// Drives a synthetic prompt through the real processing path.
    pub async fn simulate_confirmation(&self, message: &str, operation: &str) -> bool {
        let request = ConfirmationRequest::new(operation, message);
        self.agent.process_confirmation_request(request).await.accepted
    }

    pub fn status(&self) -> InterceptorStatus {
        InterceptorStatus {
            active: self.is_active(),
            agent: self.agent.get_session_status(),
        }
    }
}
