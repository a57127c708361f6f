use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::security::validate_pattern;

/// Whether the interceptor actually answers prompts or only logs what it
/// would have done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookMode {
    Passive,
    Active,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoAcceptConfig {
    /// Master switch. Nothing is auto-answered while this is false.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_session_timeout_secs")]
    pub session_timeout_secs: u64,

    /// Ceiling on accepted confirmations per session.
    #[serde(default = "default_max_auto_accepts")]
    pub max_auto_accepts: u32,

    /// Operation categories permitted for whitelist matches, or the
    /// sentinel `"all"`.
    #[serde(default = "default_allowed_operations")]
    pub allowed_operations: Vec<String>,

    /// Permit with medium risk, gated on `allowed_operations`.
    #[serde(default = "default_whitelist_patterns")]
    pub whitelist_patterns: Vec<String>,

    /// Permit with low risk, above whitelist in precedence.
    #[serde(default = "default_bypass_patterns")]
    pub bypass_patterns: Vec<String>,

    /// Deny unconditionally, checked before everything else.
    #[serde(default = "default_danger_patterns")]
    pub danger_patterns: Vec<String>,

    /// When false the checker approves everything. Deliberate full-bypass
    /// mode for trusted automation, off by default.
    #[serde(default = "default_safety_checks_enabled")]
    pub safety_checks_enabled: bool,

    #[serde(default = "default_hook_mode")]
    pub hook_mode: HookMode,

    #[serde(default = "default_audit_log_path")]
    pub audit_log_path: String,

    /// Directory for the diagnostic (non-audit) log file.
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_enabled() -> bool {
    false
}

fn default_session_timeout_secs() -> u64 {
    3_600
}

fn default_max_auto_accepts() -> u32 {
    100
}

fn default_allowed_operations() -> Vec<String> {
    vec!["git_operations".to_string(), "file_operations".to_string()]
}

fn default_whitelist_patterns() -> Vec<String> {
    vec![
        "^do you want to proceed".to_string(),
        "^continue\\?".to_string(),
        "^overwrite .*\\?".to_string(),
    ]
}

fn default_bypass_patterns() -> Vec<String> {
    vec![]
}

fn default_danger_patterns() -> Vec<String> {
    vec![
        "rm\\s+-rf".to_string(),
        "sudo\\s+rm".to_string(),
        "git\\s+push\\s+.*--force".to_string(),
        "drop\\s+(table|database)".to_string(),
        "mkfs".to_string(),
        "dd\\s+if=".to_string(),
    ]
}

fn default_safety_checks_enabled() -> bool {
    true
}

fn default_hook_mode() -> HookMode {
    HookMode::Active
}

fn default_audit_log_path() -> String {
    "./logs/auto-accept-audit.log".to_string()
}

fn default_log_dir() -> String {
    "./logs".to_string()
}

impl Default for AutoAcceptConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            session_timeout_secs: default_session_timeout_secs(),
            max_auto_accepts: default_max_auto_accepts(),
            allowed_operations: default_allowed_operations(),
            whitelist_patterns: default_whitelist_patterns(),
            bypass_patterns: default_bypass_patterns(),
            danger_patterns: default_danger_patterns(),
            safety_checks_enabled: default_safety_checks_enabled(),
            hook_mode: default_hook_mode(),
            audit_log_path: default_audit_log_path(),
            log_dir: default_log_dir(),
        }
    }
}

impl AutoAcceptConfig {
    /// Rejects the configuration before the engine is allowed to run.
    /// Every violated constraint is reported, nothing is silently defaulted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut violations = Vec::new();

        if self.session_timeout_secs == 0 {
            violations.push("session timeout must be greater than 0".to_string());
        }

        if self.max_auto_accepts == 0 {
            violations.push("max auto accepts must be greater than 0".to_string());
        }

        if self.allowed_operations.is_empty() {
            violations.push("at least one operation type must be allowed".to_string());
        }

        for (kind, patterns) in [
            ("whitelist", &self.whitelist_patterns),
            ("bypass", &self.bypass_patterns),
            ("danger", &self.danger_patterns),
        ] {
            for pattern in patterns {
                if validate_pattern(pattern).is_err() {
                    violations.push(format!("invalid {kind} pattern format: {pattern}"));
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation { violations })
        }
    }
}
