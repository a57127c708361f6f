pub mod session;

pub use session::Session;

use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::audit::AuditLogger;
use crate::config::{AutoAcceptConfig, HookMode};
use crate::errors::ConfigError;
use crate::security::SecurityChecker;
use crate::types::{
    AuditDecision, AuditLogEntry, ConfirmationRequest, ConfirmationResponse, Decision,
    DecisionAction, RiskLevel,
};

#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub active: bool,
    pub session_id: Uuid,
    pub accept_count: u32,
    pub remaining_accepts: u32,
    pub time_remaining_secs: u64,
    /// True when audit persistence has failed at least once.
    pub audit_degraded: bool,
}

/// Dry-run result from `test_operation`. Mirrors what a real request would
/// get, without any of its side effects.
#[derive(Debug, Clone)]
pub struct TestOutcome {
    pub would_accept: bool,
    pub reason: String,
    pub risk_level: RiskLevel,
}

struct AgentState {
    config: AutoAcceptConfig,
    checker: SecurityChecker,
    session: Session,
}

/// Stateful wrapper around the security checker: enforces the per-session
/// accept quota and timeout, and records every outcome in the audit log.
pub struct AutoAcceptAgent {
    state: Mutex<AgentState>,
    audit: AuditLogger,
}

impl AutoAcceptAgent {
    /// Rejects invalid configuration up front; the engine never runs on an
    /// unvalidated config.
    pub fn new(config: AutoAcceptConfig, audit: AuditLogger) -> Result<Self, ConfigError> {
        config.validate()?;
        let session = Session::new(config.enabled);
        let checker = SecurityChecker::new(config.clone());
        Ok(Self {
            state: Mutex::new(AgentState {
                config,
                checker,
                session,
            }),
            audit,
        })
    }

    /// Quota and timeout are checked, and the counter incremented, under a
    /// single lock so concurrent prompts cannot exceed `max_auto_accepts`.
    pub async fn process_confirmation_request(
        &self,
        request: ConfirmationRequest,
    ) -> ConfirmationResponse {
        let now = Utc::now();

        let (response, entry) = {
            let mut st = self.lock_state();

            let refusal = if !st.config.enabled || !st.session.active {
                Some("auto-accept is disabled".to_string())
            } else if st.session.is_expired(st.config.session_timeout_secs, now) {
                Some("session timeout exceeded".to_string())
            } else if st.session.accept_count >= st.config.max_auto_accepts {
                Some(format!(
                    "session auto-accept limit reached ({})",
                    st.config.max_auto_accepts
                ))
            } else {
                None
            };

            if let Some(reason) = refusal {
                let entry = make_entry(&request, AuditDecision::Reject, request.risk_level, &reason);
                (
                    ConfirmationResponse {
                        accepted: false,
                        reason,
                    },
                    entry,
                )
            } else {
                let decision = st.checker.assess_risk(&request);
                self.apply_decision(&mut st, &request, decision)
            }
        };

        tracing::debug!(
            target: "autoaccept.agent",
            request_id = %request.id,
            operation = %request.operation,
            accepted = response.accepted,
            reason = %response.reason,
            "confirmation request processed"
        );

        // Lock is released before the audit write; the write may still be
        // in flight when this returns.
        self.audit.audit(entry).await;
        response
    }

    fn apply_decision(
        &self,
        st: &mut AgentState,
        request: &ConfirmationRequest,
        decision: Decision,
    ) -> (ConfirmationResponse, AuditLogEntry) {
        match decision.action {
            DecisionAction::Allow => {
                st.session.accept_count += 1;
                let entry = make_entry(
                    request,
                    AuditDecision::Accept,
                    decision.risk_level,
                    &decision.reason,
                );
                (
                    ConfirmationResponse {
                        accepted: true,
                        reason: decision.reason,
                    },
                    entry,
                )
            }
            DecisionAction::Deny | DecisionAction::Ask => {
                // Deny vs needs-human survives only in the reason text.
                let entry = make_entry(
                    request,
                    AuditDecision::Reject,
                    decision.risk_level,
                    &decision.reason,
                );
                (
                    ConfirmationResponse {
                        accepted: false,
                        reason: decision.reason,
                    },
                    entry,
                )
            }
        }
    }

    /// Fresh session, counters reset.
    pub fn enable_auto_accept(&self) {
        let mut st = self.lock_state();
        st.config.enabled = true;
        st.session = Session::new(true);
        tracing::info!(
            target: "autoaccept.agent",
            session_id = %st.session.session_id,
            "auto-accept enabled"
        );
    }

    /// Marks the session inactive. Audit history is untouched.
    pub fn disable_auto_accept(&self) {
        let mut st = self.lock_state();
        st.config.enabled = false;
        st.session.active = false;
        tracing::info!(
            target: "autoaccept.agent",
            session_id = %st.session.session_id,
            "auto-accept disabled"
        );
    }

    /// New session id and counters, keeping the current active state.
    pub fn reset_session(&self) {
        let mut st = self.lock_state();
        let active = st.session.active;
        st.session = Session::new(active);
    }

    pub fn get_session_status(&self) -> SessionStatus {
        let st = self.lock_state();
        let now = Utc::now();
        let expired = st.session.is_expired(st.config.session_timeout_secs, now);
        SessionStatus {
            active: st.session.active && st.config.enabled && !expired,
            session_id: st.session.session_id,
            accept_count: st.session.accept_count,
            remaining_accepts: st
                .config
                .max_auto_accepts
                .saturating_sub(st.session.accept_count),
            time_remaining_secs: st
                .session
                .time_remaining_secs(st.config.session_timeout_secs, now),
            audit_degraded: self.audit.is_degraded(),
        }
    }

    /// Swaps config and recompiles the checker. Invalid configs are
    /// rejected without touching the running state.
    pub fn update_config(&self, config: AutoAcceptConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let mut st = self.lock_state();
        st.checker.update_config(config.clone());
        st.config = config;
        Ok(())
    }

    pub fn config_snapshot(&self) -> AutoAcceptConfig {
        self.lock_state().config.clone()
    }

    pub fn hook_mode(&self) -> HookMode {
        self.lock_state().config.hook_mode
    }

    /// Dry run: reports what a real request would get. Never mutates the
    /// session and never writes to the audit log, so it is safe to call
    /// from interactive testing and passive hook mode.
    pub fn test_operation(&self, operation: &str, message: &str) -> TestOutcome {
        let st = self.lock_state();
        let now = Utc::now();
        let request = ConfirmationRequest::new(operation, message);

        if !st.config.enabled || !st.session.active {
            return TestOutcome {
                would_accept: false,
                reason: "auto-accept is disabled".to_string(),
                risk_level: request.risk_level,
            };
        }
        if st.session.is_expired(st.config.session_timeout_secs, now) {
            return TestOutcome {
                would_accept: false,
                reason: "session timeout exceeded".to_string(),
                risk_level: request.risk_level,
            };
        }
        if st.session.accept_count >= st.config.max_auto_accepts {
            return TestOutcome {
                would_accept: false,
                reason: format!(
                    "session auto-accept limit reached ({})",
                    st.config.max_auto_accepts
                ),
                risk_level: request.risk_level,
            };
        }

        let decision = st.checker.assess_risk(&request);
        TestOutcome {
            would_accept: decision.action == DecisionAction::Allow,
            reason: decision.reason,
            risk_level: decision.risk_level,
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, AgentState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[cfg(test)]
    fn backdate_session(&self, secs: i64) {
        let mut st = self.lock_state();
        st.session.started_at -= chrono::Duration::seconds(secs);
    }
}

fn make_entry(
    request: &ConfirmationRequest,
    decision: AuditDecision,
    risk_level: RiskLevel,
    reason: &str,
) -> AuditLogEntry {
    AuditLogEntry {
        timestamp: Utc::now(),
        operation: request.operation.clone(),
        message: request.message.clone(),
        decision,
        risk_level,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn test_config() -> AutoAcceptConfig {
        AutoAcceptConfig {
            enabled: true,
            max_auto_accepts: 3,
            session_timeout_secs: 600,
            allowed_operations: vec!["all".to_string()],
            whitelist_patterns: vec![".*".to_string()],
            bypass_patterns: vec![],
            danger_patterns: vec!["rm\\s+-rf".to_string()],
            ..AutoAcceptConfig::default()
        }
    }

    async fn test_agent(config: AutoAcceptConfig) -> (AutoAcceptAgent, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditLogger::start(dir.path().join("audit.log")).await.unwrap();
        (AutoAcceptAgent::new(config, audit).unwrap(), dir)
    }

    #[tokio::test]
    async fn accept_count_tracks_allowed_requests() {
        let (agent, _dir) = test_agent(test_config()).await;

        for n in 1..=3u32 {
            let resp = agent
                .process_confirmation_request(ConfirmationRequest::new(
                    "git_commit",
                    "Do you want to proceed?",
                ))
                .await;
            assert!(resp.accepted);
            assert_eq!(agent.get_session_status().accept_count, n);
        }
    }

    #[tokio::test]
    async fn quota_refuses_regardless_of_risk() {
        let (agent, _dir) = test_agent(test_config()).await;

        for _ in 0..3 {
            let resp = agent
                .process_confirmation_request(ConfirmationRequest::new("git_commit", "proceed?"))
                .await;
            assert!(resp.accepted);
        }

        let resp = agent
            .process_confirmation_request(ConfirmationRequest::new("git_commit", "proceed?"))
            .await;
        assert!(!resp.accepted);
        assert!(resp.reason.contains("limit"));
        assert_eq!(agent.get_session_status().accept_count, 3);
    }

    #[tokio::test]
    async fn expired_session_refuses_under_quota() {
        let (agent, _dir) = test_agent(test_config()).await;
        agent.backdate_session(601);

        let resp = agent
            .process_confirmation_request(ConfirmationRequest::new("git_commit", "proceed?"))
            .await;
        assert!(!resp.accepted);
        assert!(resp.reason.contains("timeout"));
    }

    #[tokio::test]
    async fn disabled_agent_refuses() {
        let (agent, _dir) = test_agent(test_config()).await;
        agent.disable_auto_accept();

        let resp = agent
            .process_confirmation_request(ConfirmationRequest::new("git_commit", "proceed?"))
            .await;
        assert!(!resp.accepted);
        assert!(resp.reason.contains("disabled"));
    }

    #[tokio::test]
    async fn enable_resets_counters() {
        let (agent, _dir) = test_agent(test_config()).await;
        let first = agent.get_session_status().session_id;

        agent
            .process_confirmation_request(ConfirmationRequest::new("git_commit", "proceed?"))
            .await;
        agent.enable_auto_accept();

        let status = agent.get_session_status();
        assert_eq!(status.accept_count, 0);
        assert_ne!(status.session_id, first);
        assert!(status.active);
    }

    #[tokio::test]
    async fn denied_request_is_rejected_and_audited() {
        let (agent, _dir) = test_agent(test_config()).await;

        let resp = agent
            .process_confirmation_request(ConfirmationRequest::new(
                "file_delete",
                "rm -rf / - This will delete everything!",
            ))
            .await;
        assert!(!resp.accepted);
        assert!(resp.reason.contains("danger_pattern"));

        agent.audit.flush().await;
        let logs = agent.audit.get_audit_logs(10).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].decision, AuditDecision::Reject);
        assert_eq!(logs[0].risk_level, RiskLevel::High);
    }

    #[tokio::test]
    async fn test_operation_has_no_side_effects() {
        let (agent, _dir) = test_agent(test_config()).await;

        let outcome = agent.test_operation("git_commit", "Do you want to proceed?");
        assert!(outcome.would_accept);

        let outcome = agent.test_operation("file_delete", "rm -rf everything");
        assert!(!outcome.would_accept);

        assert_eq!(agent.get_session_status().accept_count, 0);
        agent.audit.flush().await;
        assert!(agent.audit.get_audit_logs(10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_requests_never_exceed_quota() {
        let (agent, _dir) = test_agent(test_config()).await;
        let agent = Arc::new(agent);

        let mut handles = Vec::new();
        for _ in 0..16 {
            let agent = agent.clone();
            handles.push(tokio::spawn(async move {
                agent
                    .process_confirmation_request(ConfirmationRequest::new(
                        "git_commit",
                        "proceed?",
                    ))
                    .await
                    .accepted
            }));
        }

        let mut accepted = 0;
        for h in handles {
            if h.await.unwrap() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 3);
        assert_eq!(agent.get_session_status().accept_count, 3);
    }

    #[tokio::test]
    async fn update_config_rejects_invalid() {
        let (agent, _dir) = test_agent(test_config()).await;

        let mut bad = test_config();
        bad.danger_patterns = vec!["[invalid".to_string()];
        assert!(agent.update_config(bad).is_err());

        // Running state is untouched.
        let resp = agent
            .process_confirmation_request(ConfirmationRequest::new("file_delete", "rm -rf /tmp"))
            .await;
        assert!(!resp.accepted);
    }
}
