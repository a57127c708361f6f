use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Risk classification attached to every decision and audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// What the security checker wants done with a confirmation prompt.
///
/// `Ask` means "no rule claimed this, hand it to a human".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    Allow,
    Deny,
    Ask,
}

/// One detected confirmation prompt. Immutable once built, consumed once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    pub id: Uuid,
    /// Raw prompt text as emitted by the host tool.
    pub message: String,
    /// Best-effort operation classification, e.g. `git_commit`, `unknown_operation`.
    pub operation: String,
    pub timestamp: DateTime<Utc>,
    /// Initial guess; the checker's verdict overrides it.
    pub risk_level: RiskLevel,
}

impl ConfirmationRequest {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            operation: operation.into(),
            timestamp: Utc::now(),
            risk_level: RiskLevel::Medium,
        }
    }
}

/// Output of `SecurityChecker::assess_risk`.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub action: DecisionAction,
    pub risk_level: RiskLevel,
    /// Names the rule/category that matched, or states that none did.
    pub reason: String,
    /// `<rule kind>:<pattern>` when a pattern rule matched.
    pub matched_rule: Option<String>,
}

/// Agent verdict handed back to the interceptor.
#[derive(Debug, Clone)]
pub struct ConfirmationResponse {
    pub accepted: bool,
    pub reason: String,
}

/// Audit classification. Deny and ask both land as `Reject`; the
/// distinction lives in the reason text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditDecision {
    Accept,
    Reject,
}

impl fmt::Display for AuditDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditDecision::Accept => write!(f, "accept"),
            AuditDecision::Reject => write!(f, "reject"),
        }
    }
}

/// One line of the append-only audit log. Never mutated after append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    /// Stored in full; truncate for display only.
    pub message: String,
    pub decision: AuditDecision,
    pub risk_level: RiskLevel,
    pub reason: String,
}
