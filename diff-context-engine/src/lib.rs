//! Unified-diff parsing with semantic context recovery.
//!
//! This crate turns raw unified-diff text (the `diff -u` / VCS format) into
//! provider-agnostic [`FileDiff`]/[`Hunk`] records and recovers, per hunk,
//! the nearest enclosing function/class signature across common source
//! language conventions.
//!
//! Everything here is pure and synchronous: no I/O, no shared state, safe to
//! call concurrently on independent inputs. Malformed input never aborts a
//! parse; unparseable fragments are skipped and the rest is returned.

pub mod errors;
pub mod function_context;
pub mod parser;
pub mod types;

pub use errors::{DiffContextError, DiffContextResult, DiffParseError};
pub use function_context::extract_function_context;
pub use parser::{looks_like_binary_patch, parse_unified_diff, parse_unified_diff_default};
pub use types::{DiffConfig, FileDiff, Hunk};
