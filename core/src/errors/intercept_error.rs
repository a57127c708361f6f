// core/src/errors/intercept_error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterceptError {
    #[error("prompt i/o error")]
    Io(#[from] std::io::Error),
}
