//! Crate-wide error hierarchy for diff-context-engine.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type DiffContextResult<T> = Result<T, DiffContextError>;

/// Root error type for the diff-context-engine crate.
///
/// The public parse entry points are permissive and never surface these to
/// callers; they exist for internal signalling (a bad hunk header is caught
/// and skipped, not propagated).
#[derive(Debug, Error)]
pub enum DiffContextError {
    /// Unified diff parsing failure.
    #[error(transparent)]
    Parse(#[from] DiffParseError),

    /// Input validation errors (unsupported formats, etc.).
    #[error("validation error: {0}")]
    Validation(String),
}

/// Unified diff parser errors.
#[derive(Debug, Error)]
pub enum DiffParseError {
    /// Hunk header does not look like `@@ -a,b +c,d @@`.
    #[error("invalid hunk header: {0}")]
    InvalidHunkHeader(String),

    /// Start/length value in a hunk header is not a number.
    #[error("invalid hunk range: {0}")]
    InvalidRange(String),
}
