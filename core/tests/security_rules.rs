//! Rule precedence and category gating for the security checker.

use auto_accept_core::api::{
    test_pattern, AutoAcceptConfig, ConfirmationRequest, DecisionAction, DecisionError, RiskLevel,
    SecurityChecker,
};

fn base_config() -> AutoAcceptConfig {
    AutoAcceptConfig {
        enabled: true,
        allowed_operations: vec!["all".to_string()],
        whitelist_patterns: vec![],
        bypass_patterns: vec![],
        danger_patterns: vec![],
        safety_checks_enabled: true,
        ..AutoAcceptConfig::default()
    }
}

fn request(operation: &str, message: &str) -> ConfirmationRequest {
    ConfirmationRequest::new(operation, message)
}

#[test]
fn danger_pattern_denies_with_high_risk() {
    let checker = SecurityChecker::new(AutoAcceptConfig {
        danger_patterns: vec!["^rm\\s+-rf".to_string()],
        ..base_config()
    });

    let decision = checker.assess_risk(&request(
        "file_delete",
        "rm -rf / - This will delete everything!",
    ));
    assert_eq!(decision.action, DecisionAction::Deny);
    assert_eq!(decision.risk_level, RiskLevel::High);
    assert!(decision.reason.contains("danger_pattern"));
}

#[test]
fn bypass_pattern_allows_with_low_risk() {
    let checker = SecurityChecker::new(AutoAcceptConfig {
        bypass_patterns: vec!["^Do you want to proceed".to_string()],
        ..base_config()
    });

    let decision = checker.assess_risk(&request(
        "unknown_operation",
        "Do you want to proceed with this action?",
    ));
    assert_eq!(decision.action, DecisionAction::Allow);
    assert_eq!(decision.risk_level, RiskLevel::Low);
    assert!(decision.reason.contains("bypass_pattern"));
}

#[test]
fn danger_takes_precedence_over_bypass_and_whitelist() {
    let checker = SecurityChecker::new(AutoAcceptConfig {
        danger_patterns: vec!["rm\\s+-rf".to_string()],
        bypass_patterns: vec![".*".to_string()],
        whitelist_patterns: vec![".*".to_string()],
        ..base_config()
    });

    let decision = checker.assess_risk(&request("file_delete", "rm -rf build, proceed?"));
    assert_eq!(decision.action, DecisionAction::Deny);
    assert_eq!(decision.risk_level, RiskLevel::High);
}

#[test]
fn whitelist_allows_permitted_operation_with_medium_risk() {
    let checker = SecurityChecker::new(AutoAcceptConfig {
        allowed_operations: vec!["git_operations".to_string()],
        whitelist_patterns: vec!["^Do you want to proceed".to_string()],
        ..base_config()
    });

    let decision = checker.assess_risk(&request("git_commit", "Do you want to proceed? (y/n)"));
    assert_eq!(decision.action, DecisionAction::Allow);
    assert_eq!(decision.risk_level, RiskLevel::Medium);
    assert!(decision.reason.contains("whitelist_pattern"));
}

#[test]
fn whitelist_denies_operation_outside_allowed_set() {
    let checker = SecurityChecker::new(AutoAcceptConfig {
        allowed_operations: vec!["git_operations".to_string()],
        whitelist_patterns: vec![".*".to_string()],
        ..base_config()
    });

    let decision = checker.assess_risk(&request(
        "network_download",
        "Do you want to proceed with the download?",
    ));
    assert_eq!(decision.action, DecisionAction::Deny);
    assert!(decision.reason.contains("not allowed"));
}

#[test]
fn unmatched_message_asks_with_medium_risk() {
    let checker = SecurityChecker::new(base_config());

    let decision = checker.assess_risk(&request(
        "unknown_operation",
        "Some unknown operation that needs confirmation",
    ));
    assert_eq!(decision.action, DecisionAction::Ask);
    assert_eq!(decision.risk_level, RiskLevel::Medium);
    assert!(decision.reason.contains("no specific security rule matched"));
}

#[test]
fn disabled_safety_checks_allow_everything() {
    let checker = SecurityChecker::new(AutoAcceptConfig {
        safety_checks_enabled: false,
        danger_patterns: vec!["rm\\s+-rf".to_string()],
        ..base_config()
    });

    // Even a danger match is approved in full-bypass mode.
    let decision = checker.assess_risk(&request("file_delete", "rm -rf / right now"));
    assert_eq!(decision.action, DecisionAction::Allow);
    assert_eq!(decision.risk_level, RiskLevel::Low);
    assert!(decision.reason.contains("safety checks disabled"));
}

#[test]
fn pattern_matching_is_case_insensitive() {
    let checker = SecurityChecker::new(AutoAcceptConfig {
        danger_patterns: vec!["drop\\s+table".to_string()],
        ..base_config()
    });

    let decision = checker.assess_risk(&request("unknown_operation", "DROP TABLE users?"));
    assert_eq!(decision.action, DecisionAction::Deny);
}

#[test]
fn invalid_pattern_is_skipped_not_fatal() {
    // An unvalidated config reaching the checker must degrade to
    // non-matching, never panic.
    let checker = SecurityChecker::new(AutoAcceptConfig {
        danger_patterns: vec!["[invalid".to_string()],
        ..base_config()
    });

    let decision = checker.assess_risk(&request("unknown_operation", "[invalid text"));
    assert_eq!(decision.action, DecisionAction::Ask);
}

#[test]
fn update_config_recompiles_rules() {
    let mut checker = SecurityChecker::new(base_config());
    let req = request("file_delete", "rm -rf cache?");
    assert_eq!(checker.assess_risk(&req).action, DecisionAction::Ask);

    checker.update_config(AutoAcceptConfig {
        danger_patterns: vec!["rm\\s+-rf".to_string()],
        ..base_config()
    });
    assert_eq!(checker.assess_risk(&req).action, DecisionAction::Deny);
}

#[test]
fn matched_rule_names_kind_and_pattern() {
    let checker = SecurityChecker::new(AutoAcceptConfig {
        bypass_patterns: vec!["^continue".to_string()],
        ..base_config()
    });

    let decision = checker.assess_risk(&request("unknown_operation", "continue? (y/n)"));
    assert_eq!(
        decision.matched_rule.as_deref(),
        Some("bypass_pattern:^continue")
    );
}

#[test]
fn test_pattern_matches_case_insensitively() {
    assert!(test_pattern("^rm\\s+-rf", "RM -RF /tmp").unwrap());
    assert!(!test_pattern("^rm\\s+-rf", "git status, proceed?").unwrap());
}

#[test]
fn test_pattern_reports_invalid_patterns() {
    let err = test_pattern("[invalid", "anything").unwrap_err();
    assert!(matches!(err, DecisionError::PatternEval(_)));
}
