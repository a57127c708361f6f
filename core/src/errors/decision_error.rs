// core/src/errors/decision_error.rs
use thiserror::Error;

/// Unexpected failure while matching patterns or classifying operations.
/// Always recovered locally as "ask the human", never propagated as a crash.
#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("pattern evaluation failed: {0}")]
    PatternEval(String),

    #[error("operation classification failed: {0}")]
    Classification(String),
}
