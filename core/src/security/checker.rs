use regex::Regex;

use crate::config::AutoAcceptConfig;
use crate::errors::DecisionError;
use crate::types::{ConfirmationRequest, Decision, DecisionAction, RiskLevel};

use super::categories::is_operation_allowed;

/// All rule patterns are matched case-insensitively, like the prompts they
/// target. This is the single compilation point for the whole crate;
/// config validation goes through it too, so a pattern that validates is a
/// pattern that compiles here.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("(?i){pattern}"))
}

pub fn validate_pattern(pattern: &str) -> Result<(), regex::Error> {
    compile_pattern(pattern).map(|_| ())
}

/// One-off match helper for the CLI test path.
pub fn test_pattern(pattern: &str, text: &str) -> Result<bool, DecisionError> {
    compile_pattern(pattern)
        .map(|re| re.is_match(text))
        .map_err(|e| DecisionError::PatternEval(e.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKind {
    Danger,
    Bypass,
    Whitelist,
}

impl RuleKind {
    fn name(self) -> &'static str {
        match self {
            RuleKind::Danger => "danger_pattern",
            RuleKind::Bypass => "bypass_pattern",
            RuleKind::Whitelist => "whitelist_pattern",
        }
    }
}

#[derive(Debug)]
struct CompiledRule {
    kind: RuleKind,
    pattern: String,
    regex: Regex,
}

/// Classifies confirmation requests into allow/deny/ask with a fixed rule
/// precedence: danger, then bypass, then whitelist, then "ask a human".
///
/// Patterns are compiled once at construction / `update_config`, never on
/// the request path.
pub struct SecurityChecker {
    config: AutoAcceptConfig,
    rules: Vec<CompiledRule>,
}

impl SecurityChecker {
    pub fn new(config: AutoAcceptConfig) -> Self {
        let rules = compile_rules(&config);
        Self { config, rules }
    }

    /// Swaps the config and recompiles every rule before it can be used.
    pub fn update_config(&mut self, config: AutoAcceptConfig) {
        self.rules = compile_rules(&config);
        self.config = config;
        tracing::info!(
            target: "autoaccept.security",
            rules = self.rules.len(),
            "security checker configuration updated"
        );
    }

    pub fn config(&self) -> &AutoAcceptConfig {
        &self.config
    }

    /// First match wins. Never panics and never fails outward; an internal
    /// evaluation error degrades to `Ask`.
    pub fn assess_risk(&self, request: &ConfirmationRequest) -> Decision {
        match self.try_assess(request) {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!(
                    target: "autoaccept.security",
                    request_id = %request.id,
                    error = %e,
                    "risk evaluation failed, deferring to human"
                );
                Decision {
                    action: DecisionAction::Ask,
                    risk_level: RiskLevel::Medium,
                    reason: format!("risk evaluation failed, deferring to human: {e}"),
                    matched_rule: None,
                }
            }
        }
    }

    fn try_assess(&self, request: &ConfirmationRequest) -> Result<Decision, DecisionError> {
        if !self.config.safety_checks_enabled {
            return Ok(Decision {
                action: DecisionAction::Allow,
                risk_level: RiskLevel::Low,
                reason: "safety checks disabled - all operations approved".to_string(),
                matched_rule: None,
            });
        }

        for rule in &self.rules {
            if !rule.regex.is_match(&request.message) {
                continue;
            }
            let matched = Some(format!("{}:{}", rule.kind.name(), rule.pattern));
            return Ok(match rule.kind {
                RuleKind::Danger => Decision {
                    action: DecisionAction::Deny,
                    risk_level: RiskLevel::High,
                    reason: format!("danger_pattern '{}' matched", rule.pattern),
                    matched_rule: matched,
                },
                RuleKind::Bypass => Decision {
                    action: DecisionAction::Allow,
                    risk_level: RiskLevel::Low,
                    reason: format!("bypass_pattern '{}' matched", rule.pattern),
                    matched_rule: matched,
                },
                RuleKind::Whitelist => self.whitelist_decision(request, rule, matched)?,
            });
        }

        Ok(Decision {
            action: DecisionAction::Ask,
            risk_level: RiskLevel::Medium,
            reason: "no specific security rule matched".to_string(),
            matched_rule: None,
        })
    }

    /// Whitelist matches are additionally gated on the operation category.
    fn whitelist_decision(
        &self,
        request: &ConfirmationRequest,
        rule: &CompiledRule,
        matched: Option<String>,
    ) -> Result<Decision, DecisionError> {
        if self.config.allowed_operations.is_empty() {
            // Validation rejects this before the engine runs; reaching it
            // means the config was swapped in unchecked.
            return Err(DecisionError::Classification(
                "allowed operations set is empty".to_string(),
            ));
        }

        if is_operation_allowed(&self.config.allowed_operations, &request.operation) {
            Ok(Decision {
                action: DecisionAction::Allow,
                risk_level: RiskLevel::Medium,
                reason: format!("whitelist_pattern '{}' matched", rule.pattern),
                matched_rule: matched,
            })
        } else {
            Ok(Decision {
                action: DecisionAction::Deny,
                risk_level: RiskLevel::Medium,
                reason: format!(
                    "operation type '{}' not allowed by configuration",
                    request.operation
                ),
                matched_rule: matched,
            })
        }
    }
}

/// Builds the rule list in evaluation order. A pattern that fails to
/// compile is skipped as non-matching and logged; validation is supposed to
/// have caught it long before this point.
fn compile_rules(config: &AutoAcceptConfig) -> Vec<CompiledRule> {
    let sets = [
        (RuleKind::Danger, &config.danger_patterns),
        (RuleKind::Bypass, &config.bypass_patterns),
        (RuleKind::Whitelist, &config.whitelist_patterns),
    ];

    let mut rules = Vec::new();
    for (kind, patterns) in sets {
        for pattern in patterns {
            match compile_pattern(pattern) {
                Ok(regex) => rules.push(CompiledRule {
                    kind,
                    pattern: pattern.clone(),
                    regex,
                }),
                Err(e) => {
                    tracing::warn!(
                        target: "autoaccept.security",
                        kind = kind.name(),
                        pattern = %pattern,
                        error = %e,
                        "skipping pattern that failed to compile"
                    );
                }
            }
        }
    }
    rules
}
