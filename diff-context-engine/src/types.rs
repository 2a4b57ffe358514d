//! Provider-agnostic diff records produced by the parser.

use serde::{Deserialize, Serialize};

/// Tunables for the diff parser.
///
/// `context_lines` bounds how many unchanged lines are kept in
/// [`Hunk::context_before`]; the optimal window depends on how much
/// surrounding code the prompt builder wants to show, so it stays
/// configurable rather than hard-coded.
#[derive(Debug, Clone, Copy)]
pub struct DiffConfig {
    /// Maximum unchanged lines retained before the first change of a hunk.
    pub context_lines: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self { context_lines: 4 }
    }
}

/// One contiguous change block inside a unified diff.
///
/// Line numbers are 1-based and come from the hunk header; `added` carries
/// new-file numbering, `removed` carries old-file numbering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hunk {
    /// Original `@@ ... @@` header line, verbatim.
    pub header: String,
    /// Start line in the old file.
    pub old_start: u32,
    /// Start line in the new file.
    pub new_start: u32,
    /// Added lines as `(new_line, content)`, marker stripped.
    pub added: Vec<(u32, String)>,
    /// Removed lines as `(old_line, content)`, marker stripped.
    pub removed: Vec<(u32, String)>,
    /// Unchanged lines immediately preceding the first change (capped).
    pub context_before: Vec<String>,
    /// Unchanged lines following the last change, up to the hunk boundary.
    pub context_after: Vec<String>,
    /// Nearest enclosing function/class signature, when recoverable.
    pub function_name: Option<String>,
}

/// All hunks of a single file plus the reconstructed post-change text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileDiff {
    /// Repository-relative path from the `+++ b/...` header.
    pub filename: String,
    /// Post-change text: added + unchanged lines in order, removed excluded.
    ///
    /// Kept materialized for consumers that only need flattened content.
    pub content: String,
    /// Hunks in the order they appear in the diff.
    pub hunks: Vec<Hunk>,
}
