//! Stable re-exports for consumers (`cli` and external crates).
//!
//! Prefer importing from `auto_accept_core::api` instead of reaching into
//! internal modules.

pub use crate::agent::{AutoAcceptAgent, Session, SessionStatus, TestOutcome};
pub use crate::audit::{preview, AuditLogger};
pub use crate::config::{default_config_path, load, reset, save, AutoAcceptConfig, HookMode};
pub use crate::errors::{AuditError, ConfigError, DecisionError, InterceptError};
pub use crate::interceptor::{
    Interceptor, InterceptorStatus, PromptIo, ScriptedPromptIo, TerminalPromptIo,
};
pub use crate::security::{test_pattern, SecurityChecker};
pub use crate::types::{
    AuditDecision, AuditLogEntry, ConfirmationRequest, ConfirmationResponse, Decision,
    DecisionAction, RiskLevel,
};
