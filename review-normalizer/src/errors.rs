//! Crate-wide error hierarchy for review-normalizer.
//!
//! Goals:
//! - Single root `Error` for internal signalling, ergonomic `?` via `From`.
//! - The public `parse_response` entry never surfaces these: a strategy
//!   failure is caught by the orchestrator and means "try the next one".

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type NormalizerResult<T> = Result<T, NormalizerError>;

/// Root error type for the review-normalizer crate.
#[derive(Debug, Error)]
pub enum NormalizerError {
    /// A single strategy could not make sense of the input.
    #[error(transparent)]
    Strategy(#[from] StrategyError),

    /// Input validation errors (reserved; parsing itself is total).
    #[error("validation error: {0}")]
    Validation(String),
}

/// Why one parsing strategy gave up on a response.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// Response is not structured data (wrong leading character, no fence,
    /// no delimiter, ...): the strategy does not apply at all.
    #[error("strategy not applicable: {0}")]
    NotApplicable(&'static str),

    /// Structured payload exists but does not deserialize.
    #[error("malformed structured data: {0}")]
    Json(#[from] serde_json::Error),

    /// The strategy ran but produced zero findings.
    #[error("no findings extracted")]
    Empty,
}
