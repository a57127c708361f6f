mod audit_error;
mod config_error;
mod decision_error;
mod intercept_error;

pub use audit_error::AuditError;
pub use config_error::ConfigError;
pub use decision_error::DecisionError;
pub use intercept_error::InterceptError;
