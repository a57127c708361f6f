// core/src/errors/config_error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config read error: {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error")]
    Parse(#[source] anyhow::Error),

    #[error("config validation failed: {}", violations.join("; "))]
    Validation { violations: Vec<String> },

    #[error("env var invalid: {key}={value}")]
    EnvInvalid { key: String, value: String },
}
