//! Append/read/clear behavior of the audit store.

use auto_accept_core::api::{AuditDecision, AuditLogEntry, AuditLogger, RiskLevel};
use chrono::Utc;

fn entry(operation: &str, reason: &str) -> AuditLogEntry {
    AuditLogEntry {
        timestamp: Utc::now(),
        operation: operation.to_string(),
        message: format!("{operation}: do you want to proceed?"),
        decision: AuditDecision::Accept,
        risk_level: RiskLevel::Medium,
        reason: reason.to_string(),
    }
}

#[tokio::test]
async fn round_trip_most_recent_first() {
    let dir = tempfile::tempdir().unwrap();
    let logger = AuditLogger::start(dir.path().join("audit.log")).await.unwrap();

    logger.audit(entry("git_commit", "first")).await;
    logger.audit(entry("git_push", "second")).await;
    logger.audit(entry("file_create", "third")).await;
    logger.flush().await;

    let logs = logger.get_audit_logs(10).unwrap();
    assert_eq!(logs.len(), 3);
    assert_eq!(logs[0].reason, "third");
    assert_eq!(logs[2].reason, "first");
}

#[tokio::test]
async fn limit_keeps_only_most_recent() {
    let dir = tempfile::tempdir().unwrap();
    let logger = AuditLogger::start(dir.path().join("audit.log")).await.unwrap();

    for i in 0..5 {
        logger.audit(entry("git_commit", &format!("entry {i}"))).await;
    }
    logger.flush().await;

    let logs = logger.get_audit_logs(2).unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].reason, "entry 4");
    assert_eq!(logs[1].reason, "entry 3");
}

#[tokio::test]
async fn clear_truncates_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let logger = AuditLogger::start(dir.path().join("audit.log")).await.unwrap();

    logger.audit(entry("git_commit", "kept?")).await;
    logger.flush().await;
    assert_eq!(logger.get_audit_logs(10).unwrap().len(), 1);

    logger.clear_audit_logs().unwrap();
    assert!(logger.get_audit_logs(10).unwrap().is_empty());

    // Appends after a clear land normally.
    logger.audit(entry("git_push", "after clear")).await;
    logger.flush().await;
    let logs = logger.get_audit_logs(10).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].reason, "after clear");
}

#[tokio::test]
async fn malformed_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let logger = AuditLogger::start(&path).await.unwrap();

    logger.audit(entry("git_commit", "good")).await;
    logger.flush().await;

    // Simulate a torn write from a crashed predecessor.
    use std::io::Write;
    let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    writeln!(f, "{{ not json").unwrap();
    drop(f);

    let reopened = AuditLogger::start(&path).await.unwrap();
    reopened.audit(entry("git_push", "also good")).await;
    reopened.flush().await;

    let logs = reopened.get_audit_logs(10).unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].reason, "also good");
    assert_eq!(logs[1].reason, "good");
}

#[tokio::test]
async fn empty_store_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let logger = AuditLogger::start(dir.path().join("audit.log")).await.unwrap();
    assert!(logger.get_audit_logs(100).unwrap().is_empty());
    assert!(!logger.is_degraded());
}

#[tokio::test]
async fn entries_survive_on_disk_as_one_json_object_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let logger = AuditLogger::start(&path).await.unwrap();

    logger.audit(entry("git_commit", "line check")).await;
    logger.flush().await;

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1);
    let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(parsed["operation"], "git_commit");
    assert_eq!(parsed["decision"], "accept");
    assert_eq!(parsed["risk_level"], "medium");
}
