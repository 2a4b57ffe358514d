//! Strategy 3: the ad-hoc delimited text format some prompts request.
//!
//! ```text
//! === FILE: src/auth.py ===
//! --- FINDING [high] ---
//! Token is never invalidated ...
//! --- FINDING [low] ---
//! Rename this helper ...
//! ```
//!
//! File delimiters are mandatory (no `=== FILE:` anywhere means the strategy
//! does not apply); finding delimiters inside a section are optional — a
//! section without them becomes a single finding.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::ParserConfig;
use crate::errors::{NormalizerResult, StrategyError};
use crate::model::{FileEntry, Finding};
use crate::severity;
use crate::strategy::{build_finding, first_line, resolve_entry};

lazy_static! {
    static ref FILE_DELIM_RE: Regex =
        Regex::new(r"(?m)^\s*===+\s*FILE:\s*(.+?)\s*===+\s*$").unwrap();
    static ref FINDING_DELIM_RE: Regex =
        Regex::new(r"(?m)^\s*---+\s*FINDING\s*\[([^\]]*)\]\s*---+\s*$").unwrap();
}

pub fn parse(
    response: &str,
    entries: &[FileEntry],
    category: &str,
    cfg: &ParserConfig,
) -> NormalizerResult<Vec<Finding>> {
    // (section start in `response`, stated filename, body range start)
    let delims: Vec<(usize, usize, String)> = FILE_DELIM_RE
        .captures_iter(response)
        .map(|c| {
            let whole = c.get(0).expect("group 0 always present");
            (whole.start(), whole.end(), c[1].to_string())
        })
        .collect();
    if delims.is_empty() {
        return Err(StrategyError::NotApplicable("no file delimiters").into());
    }

    let mut out = Vec::new();
    for (i, (_, body_start, stated)) in delims.iter().enumerate() {
        let body_end = delims
            .get(i + 1)
            .map(|(s, _, _)| *s)
            .unwrap_or(response.len());
        let section = &response[*body_start..body_end];
        let entry = resolve_entry(stated, entries);
        parse_section(section, &entry, category, cfg, &mut out);
    }

    if out.is_empty() {
        return Err(StrategyError::Empty.into());
    }
    Ok(out)
}

/// One `=== FILE ===` section: split by finding delimiters, or take whole.
fn parse_section(
    section: &str,
    entry: &FileEntry,
    category: &str,
    cfg: &ParserConfig,
    out: &mut Vec<Finding>,
) {
    let marks: Vec<(usize, usize, String)> = FINDING_DELIM_RE
        .captures_iter(section)
        .map(|c| {
            let whole = c.get(0).expect("group 0 always present");
            (whole.start(), whole.end(), c[1].to_string())
        })
        .collect();

    if marks.is_empty() {
        let text = section.trim();
        if !text.is_empty() {
            push_finding(text, severity::infer_from_text(text), entry, category, cfg, out);
        }
        return;
    }

    // Text before the first finding delimiter is kept when substantial.
    let preamble = section[..marks[0].0].trim();
    if preamble.len() >= cfg.min_meaningful_len {
        push_finding(
            preamble,
            severity::infer_from_text(preamble),
            entry,
            category,
            cfg,
            out,
        );
    }

    for (i, (_, seg_start, token)) in marks.iter().enumerate() {
        let seg_end = marks.get(i + 1).map(|(s, _, _)| *s).unwrap_or(section.len());
        let text = section[*seg_start..seg_end].trim();
        if text.is_empty() {
            continue;
        }
        push_finding(text, severity::normalize(token), entry, category, cfg, out);
    }
}

fn push_finding(
    text: &str,
    severity: crate::model::Severity,
    entry: &FileEntry,
    category: &str,
    cfg: &ParserConfig,
    out: &mut Vec<Finding>,
) {
    out.push(build_finding(
        entry,
        None,
        category,
        severity,
        first_line(text),
        text.to_string(),
        None,
        cfg,
    ));
}
