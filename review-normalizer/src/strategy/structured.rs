//! Strategy 1: the response *is* a structured document.
//!
//! Accepted top-level shapes, all produced by instruction-following models:
//! - `{"files": [{"filename": ..., "findings": [...]}]}`
//! - a bare list of per-file blocks
//! - a bare list of finding objects (attached to one synthetic "combined"
//!   file, which resolves to the first supplied entry)
//!
//! Field names are deliberately permissive (`file`/`path`, `line`/
//! `line_number`, `type`/`category`, ...) because models drift.

use serde::Deserialize;
use serde_json::Value;

use crate::config::ParserConfig;
use crate::errors::{NormalizerResult, StrategyError};
use crate::lines;
use crate::model::{FileEntry, Finding};
use crate::severity;
use crate::strategy::{build_finding, resolve_entry};

#[derive(Debug, Deserialize)]
struct ReviewDocument {
    #[serde(alias = "results", alias = "reviews")]
    files: Vec<FileBlock>,
}

#[derive(Debug, Deserialize)]
struct FileBlock {
    #[serde(alias = "file", alias = "path", alias = "name")]
    filename: String,
    #[serde(default, alias = "issues", alias = "comments", alias = "observations")]
    findings: Vec<RawFinding>,
}

/// One finding object as the model wrote it; everything optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFinding {
    severity: Option<String>,
    /// Number or string; models emit both.
    #[serde(alias = "line_number")]
    line: Option<Value>,
    #[serde(alias = "type")]
    category: Option<String>,
    title: Option<String>,
    description: Option<String>,
    suggestion: Option<String>,
    #[serde(alias = "snippet", alias = "code_snippet")]
    code_context: Option<String>,
    #[serde(alias = "vulnerability_id", alias = "cwe")]
    cwe_id: Option<String>,
}

/// Strategy entry point. Rejects anything not starting with `{`/`[` without
/// touching serde, so prose responses fall through instantly.
pub fn parse(
    response: &str,
    entries: &[FileEntry],
    category: &str,
    cfg: &ParserConfig,
) -> NormalizerResult<Vec<Finding>> {
    let trimmed = response.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return Err(StrategyError::NotApplicable("not a structured document").into());
    }
    parse_payload(trimmed, entries, category, cfg)
}

/// Parses an already-isolated structured payload. Shared with the
/// fenced-block strategy.
pub(crate) fn parse_payload(
    payload: &str,
    entries: &[FileEntry],
    category: &str,
    cfg: &ParserConfig,
) -> NormalizerResult<Vec<Finding>> {
    let blocks: Vec<FileBlock> = if let Ok(doc) = serde_json::from_str::<ReviewDocument>(payload) {
        doc.files
    } else if let Ok(blocks) = serde_json::from_str::<Vec<FileBlock>>(payload) {
        blocks
    } else {
        // Bare finding list; the error from here is the one worth reporting.
        let raw: Vec<RawFinding> =
            serde_json::from_str(payload).map_err(StrategyError::Json)?;
        vec![FileBlock {
            filename: "combined".to_string(),
            findings: raw,
        }]
    };

    let mut out = Vec::new();
    for block in blocks {
        let entry = resolve_entry(&block.filename, entries);
        for raw in block.findings {
            out.push(convert(raw, &entry, category, cfg));
        }
    }
    if out.is_empty() {
        return Err(StrategyError::Empty.into());
    }
    Ok(out)
}

fn convert(raw: RawFinding, entry: &FileEntry, category: &str, cfg: &ParserConfig) -> Finding {
    let sev = match raw.severity.as_deref() {
        Some(tok) => severity::normalize(tok),
        None => severity::infer_from_text(
            raw.description.as_deref().unwrap_or_default(),
        ),
    };
    let line = raw.line.as_ref().and_then(line_from_value);

    let title = raw
        .title
        .as_deref()
        .or(raw.description.as_deref())
        .or(raw.suggestion.as_deref())
        .unwrap_or("(no description)");

    let mut feedback = raw
        .description
        .clone()
        .or_else(|| raw.title.clone())
        .unwrap_or_default();
    if let Some(s) = &raw.suggestion {
        if !s.trim().is_empty() {
            if !feedback.is_empty() {
                feedback.push_str("\n\n");
            }
            feedback.push_str("Suggestion: ");
            feedback.push_str(s);
        }
    }
    if let Some(id) = &raw.cwe_id {
        if !id.trim().is_empty() {
            if !feedback.is_empty() {
                feedback.push_str("\n\n");
            }
            feedback.push_str("Reference: ");
            feedback.push_str(id);
        }
    }

    let cat = raw
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(category);

    build_finding(entry, line, cat, sev, title, feedback, raw.code_context, cfg)
}

fn line_from_value(v: &Value) -> Option<u32> {
    let n = match v {
        Value::Number(n) => n.as_u64().and_then(|x| u32::try_from(x).ok()),
        Value::String(s) => s.trim().parse().ok().or_else(|| lines::extract(s)),
        _ => None,
    }?;
    lines::is_sane(n).then_some(n)
}
