//! Parser tunables.
//!
//! The thresholds here are empirically chosen and depend on how verbose the
//! upstream model is, so they are per-call parameters with defaults rather
//! than hard-coded constants.

/// Knobs controlling strategy behavior and post-processing.
#[derive(Debug, Clone, Copy)]
pub struct ParserConfig {
    /// Token-similarity ratio above which two findings for the same file
    /// are considered duplicates.
    pub similarity_threshold: f32,
    /// Minimum character length for a flushed text block to become a
    /// finding ("OK" alone is not a finding).
    pub min_meaningful_len: usize,
    /// Cap on `title_or_description`.
    pub title_max_chars: usize,
    /// Cap on `code_snippet`.
    pub snippet_max_chars: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.70,
            min_meaningful_len: 20,
            title_max_chars: 200,
            snippet_max_chars: 200,
        }
    }
}
