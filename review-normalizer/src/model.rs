//! Core records exchanged with the calling layer.
//!
//! `FileEntry` describes what was sent to the model; `Finding` is one
//! normalized observation extracted from its reply. Both are plain, acyclic
//! value objects owned outright by the caller.

use serde::{Deserialize, Serialize};

/// Closed five-level severity scale. Free-form model wording is mapped onto
/// this via [`crate::severity::normalize`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    /// Numeric rank, higher is more severe.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 5,
            Severity::High => 4,
            Severity::Medium => 3,
            Severity::Low => 2,
            Severity::Info => 1,
        }
    }

    /// Canonical lowercase token.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file the model was asked to review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEntry {
    /// Display name, e.g. `auth.py`.
    pub name: String,
    /// Absolute or project-relative path.
    pub path: String,
    /// Full file content; used only to cut code snippets for findings.
    pub content: String,
}

impl FileEntry {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            content: content.into(),
        }
    }

    /// Synthetic entry for filenames the model invented.
    pub fn synthetic(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: name.to_string(),
            content: String::new(),
        }
    }
}

/// One normalized, structured observation extracted from model output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Finding {
    /// Path of the file the observation is about.
    pub file_path: String,
    /// 1-based source line, when one could be recovered (sane range only).
    pub line_number: Option<u32>,
    /// Free-form review-type label, e.g. "security".
    pub category: String,
    /// Canonical severity (always normalized, `medium` when unknown).
    pub severity: Severity,
    /// Short display title, truncated.
    pub title_or_description: String,
    /// Full explanatory text, preserved verbatim for display.
    pub raw_feedback: String,
    /// Short excerpt from the originating file content, when available.
    pub code_snippet: Option<String>,
}

/// Truncates to `max` chars with an ellipsis, teacher-preview style.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Cuts a ±1-line window around `line` from `content`, capped at `max` chars.
/// Returns `None` for empty content or out-of-range lines.
pub fn snippet_at(content: &str, line: u32, max: usize) -> Option<String> {
    if content.is_empty() || line == 0 {
        return None;
    }
    let lines: Vec<&str> = content.lines().collect();
    let idx = (line - 1) as usize;
    if idx >= lines.len() {
        return None;
    }
    let start = idx.saturating_sub(1);
    let end = (idx + 2).min(lines.len());
    let window = lines[start..end].join("\n");
    let trimmed = window.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(truncate_chars(trimmed, max))
}
