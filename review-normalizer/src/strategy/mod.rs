//! Ordered parsing strategies over unstructured model output.
//!
//! Each strategy is a pure function with a uniform signature; the chain is
//! tried in fixed order and the first non-empty success wins. A strategy
//! reports failure through its result value — never by panicking — so the
//! orchestrator can fall through silently.

pub mod delimited;
pub mod fallback;
pub mod fenced;
pub mod heuristic;
pub mod structured;

use crate::config::ParserConfig;
use crate::errors::NormalizerResult;
use crate::lines;
use crate::model::{FileEntry, Finding, Severity, snippet_at, truncate_chars};

/// Uniform strategy signature: `(response, file_entries, category, config)`.
pub type StrategyFn =
    fn(&str, &[FileEntry], &str, &ParserConfig) -> NormalizerResult<Vec<Finding>>;

/// The fixed chain, most structured first. `fallback` never fails for
/// non-empty input, which is what makes the whole pipeline total.
pub const CHAIN: &[(&str, StrategyFn)] = &[
    ("structured", structured::parse),
    ("fenced", fenced::parse),
    ("delimited", delimited::parse),
    ("heuristic", heuristic::parse),
    ("fallback", fallback::parse),
];

/// Assembles a [`Finding`], applying truncation and snippet recovery.
///
/// `line` falls back to scanning `raw` for a line reference; the snippet
/// comes from the entry content around that line when none was supplied.
pub(crate) fn build_finding(
    entry: &FileEntry,
    line: Option<u32>,
    category: &str,
    severity: Severity,
    title: &str,
    raw: String,
    snippet: Option<String>,
    cfg: &ParserConfig,
) -> Finding {
    let line_number = line.or_else(|| lines::extract(&raw));
    let code_snippet = snippet
        .map(|s| truncate_chars(s.trim(), cfg.snippet_max_chars))
        .or_else(|| {
            line_number.and_then(|n| snippet_at(&entry.content, n, cfg.snippet_max_chars))
        });

    Finding {
        file_path: entry.path.clone(),
        line_number,
        category: category.to_string(),
        severity,
        title_or_description: truncate_chars(title.trim(), cfg.title_max_chars),
        raw_feedback: raw,
        code_snippet,
    }
}

/// Resolves a model-stated filename against the supplied entries:
/// exact match → substring either direction → first entry → synthetic.
pub(crate) fn resolve_entry(stated: &str, entries: &[FileEntry]) -> FileEntry {
    let stated = stated.trim();
    if let Some(e) = entries.iter().find(|e| e.name == stated || e.path == stated) {
        return e.clone();
    }
    let lower = stated.to_lowercase();
    if !lower.is_empty() {
        if let Some(e) = entries.iter().find(|e| {
            let name = e.name.to_lowercase();
            let path = e.path.to_lowercase();
            name.contains(&lower)
                || lower.contains(&name)
                || path.contains(&lower)
                || lower.contains(&path)
        }) {
            return e.clone();
        }
    }
    if let Some(e) = entries.first() {
        return e.clone();
    }
    FileEntry::synthetic(if stated.is_empty() { "<unknown>" } else { stated })
}

/// First non-empty line of a block, used as a display title.
pub(crate) fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("")
}
