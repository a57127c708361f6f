// core/src/errors/audit_error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit log open failed: {path}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("audit log read failed: {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("audit log clear failed: {path}")]
    Clear {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
