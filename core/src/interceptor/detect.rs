//! Confirmation-prompt detection and best-effort operation extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CONFIRMATION_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)do you want to proceed").unwrap(),
        Regex::new(r"(?i)continue\?").unwrap(),
        Regex::new(r"(?i)are you sure").unwrap(),
        Regex::new(r"(?i)confirm").unwrap(),
        Regex::new(r"(?i)\(y/n\)").unwrap(),
        Regex::new(r"(?i)\(yes/no\)").unwrap(),
        Regex::new(r"(?i)press .* to continue").unwrap(),
    ];
    static ref GIT_RE: Regex = Regex::new(r"(?i)git\s+(\w+)").unwrap();
    static ref NPM_RE: Regex = Regex::new(r"(?i)npm\s+(\w+)").unwrap();
    static ref PACKAGE_RE: Regex = Regex::new(r"(?i)(install|update|delete|remove)").unwrap();
    static ref FILE_CREATE_RE: Regex = Regex::new(r"(?i)(create|mkdir|touch)").unwrap();
    static ref FILE_DELETE_RE: Regex = Regex::new(r"(?i)(delete|rm|remove)").unwrap();
    static ref DEPLOY_RE: Regex = Regex::new(r"(?i)(deploy|push|publish)").unwrap();
}

pub fn is_confirmation_prompt(message: &str) -> bool {
    CONFIRMATION_PATTERNS.iter().any(|p| p.is_match(message))
}

/// Best-effort operation id for a prompt, e.g. `git_commit` or
/// `unknown_operation`. Coarse on purpose; the checker's category gate
/// only needs keywords.
pub fn extract_operation(message: &str) -> String {
    if let Some(caps) = GIT_RE.captures(message) {
        return format!("git_{}", caps[1].to_lowercase());
    }
    if let Some(caps) = NPM_RE.captures(message) {
        return format!("npm_{}", caps[1].to_lowercase());
    }
    if PACKAGE_RE.is_match(message) {
        return "package".to_string();
    }
    if FILE_CREATE_RE.is_match(message) {
        return "file_create".to_string();
    }
    if FILE_DELETE_RE.is_match(message) {
        return "file_delete".to_string();
    }
    if DEPLOY_RE.is_match(message) {
        return "deploy".to_string();
    }
    "unknown_operation".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_common_confirmation_shapes() {
        assert!(is_confirmation_prompt("Do you want to proceed with this action?"));
        assert!(is_confirmation_prompt("Continue? (y/n)"));
        assert!(is_confirmation_prompt("Are you sure about that"));
        assert!(is_confirmation_prompt("Please confirm the deletion"));
        assert!(is_confirmation_prompt("Delete branch? (yes/no)"));
        assert!(is_confirmation_prompt("Press any key to continue"));
    }

    #[test]
    fn ignores_ordinary_output() {
        assert!(!is_confirmation_prompt("Compiling auto-accept-core v0.3.0"));
        assert!(!is_confirmation_prompt("3 files changed, 10 insertions"));
    }

    #[test]
    fn extracts_git_subcommand() {
        assert_eq!(extract_operation("Run git commit now? (y/n)"), "git_commit");
        assert_eq!(extract_operation("git push origin main, continue?"), "git_push");
    }

    #[test]
    fn extracts_coarse_buckets() {
        assert_eq!(extract_operation("npm install left-pad?"), "npm_install");
        assert_eq!(extract_operation("Install these 12 packages?"), "package");
        assert_eq!(extract_operation("mkdir build, proceed?"), "file_create");
        assert_eq!(extract_operation("rm old.log, proceed?"), "file_delete");
        assert_eq!(extract_operation("publish to production?"), "deploy");
        assert_eq!(extract_operation("Some unknown thing"), "unknown_operation");
    }
}
