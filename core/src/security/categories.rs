//! Coarse operation categories used by the whitelist gate.
//!
//! A request belongs to a category when any of the category's keywords
//! appears (case-insensitively) in its operation string.

pub const OPERATION_CATEGORIES: &[(&str, &[&str])] = &[
    ("git_operations", &["git", "commit", "push", "pull", "clone", "merge"]),
    ("file_operations", &["read", "write", "create", "delete", "mkdir", "touch"]),
    ("network_operations", &["fetch", "download", "upload", "curl", "wget"]),
    ("system_operations", &["install", "update", "restart", "service"]),
];

/// Sentinel that lifts the category gate entirely.
pub const ALL_OPERATIONS: &str = "all";

/// First category whose keyword set matches, if any.
pub fn classify_operation(operation: &str) -> Option<&'static str> {
    let op = operation.to_lowercase();
    OPERATION_CATEGORIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| op.contains(k)))
        .map(|(category, _)| *category)
}

pub fn is_operation_allowed(allowed: &[String], operation: &str) -> bool {
    if allowed.iter().any(|a| a == ALL_OPERATIONS) {
        return true;
    }

    let op = operation.to_lowercase();
    OPERATION_CATEGORIES.iter().any(|(category, keywords)| {
        allowed.iter().any(|a| a == category) && keywords.iter().any(|k| op.contains(k))
    })
}
