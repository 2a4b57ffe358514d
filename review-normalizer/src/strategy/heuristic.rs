//! Strategy 4: free-form lists — the last structured-ish resort.
//!
//! Line-by-line scan recognising:
//! - file heading lines (a short line whose payload ends in a
//!   file-extension-like token) that switch the current file;
//! - `- [high] ...` bullets that open a finding with explicit severity;
//! - `1. ...` numbered items that open a finding with inferred severity;
//! - everything else non-blank continues the current finding.
//!
//! A finding is flushed at every boundary and at end of input. Findings
//! without an explicit severity marker are dropped when shorter than the
//! meaningful-length threshold; explicitly marked bullets are kept even when
//! terse — the marker shows intent.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::ParserConfig;
use crate::errors::{NormalizerResult, StrategyError};
use crate::model::{FileEntry, Finding, Severity};
use crate::severity;
use crate::strategy::{build_finding, first_line, resolve_entry};

lazy_static! {
    /// `## src/auth.py:` / `**auth.py**` / `auth.py` on a line of its own.
    static ref FILE_HEADING_RE: Regex = Regex::new(
        r"^\s*#{0,6}\s*\**\s*(?:File\s*:\s*)?([\w./\\-]+\.[A-Za-z0-9]{1,4})\s*:?\s*\**\s*$"
    )
    .unwrap();
    /// `- [high] text`, `* [LOW] text`, `• [info] text`.
    static ref SEVERITY_BULLET_RE: Regex =
        Regex::new(r"^\s*[-*•]\s*\[\s*([A-Za-z]+)\s*\]\s*(.*)$").unwrap();
    /// `1. text` / `2) text`.
    static ref NUMBERED_ITEM_RE: Regex = Regex::new(r"^\s*\d{1,3}[.)]\s+(.*)$").unwrap();
}

/// Longest line still considered a heading candidate.
const MAX_HEADING_LEN: usize = 80;

struct Pending {
    severity: Option<Severity>,
    text: String,
}

pub fn parse(
    response: &str,
    entries: &[FileEntry],
    category: &str,
    cfg: &ParserConfig,
) -> NormalizerResult<Vec<Finding>> {
    let mut out = Vec::new();
    let mut current_entry = resolve_entry("", entries);
    let mut pending: Option<Pending> = None;

    for line in response.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(caps) = SEVERITY_BULLET_RE.captures(line) {
            flush(&mut pending, &current_entry, category, cfg, &mut out);
            pending = Some(Pending {
                severity: Some(severity::normalize(&caps[1])),
                text: caps[2].trim().to_string(),
            });
            continue;
        }

        if let Some(caps) = NUMBERED_ITEM_RE.captures(line) {
            flush(&mut pending, &current_entry, category, cfg, &mut out);
            pending = Some(Pending {
                severity: None,
                text: caps[1].trim().to_string(),
            });
            continue;
        }

        if line.trim().len() <= MAX_HEADING_LEN {
            if let Some(caps) = FILE_HEADING_RE.captures(line) {
                flush(&mut pending, &current_entry, category, cfg, &mut out);
                current_entry = resolve_entry(&caps[1], entries);
                continue;
            }
        }

        if let Some(p) = pending.as_mut() {
            if !p.text.is_empty() {
                p.text.push('\n');
            }
            p.text.push_str(line.trim());
        }
        // Prose before the first boundary carries no per-finding signal;
        // the generic fallback handles responses made only of that.
    }
    flush(&mut pending, &current_entry, category, cfg, &mut out);

    if out.is_empty() {
        return Err(StrategyError::Empty.into());
    }
    Ok(out)
}

fn flush(
    pending: &mut Option<Pending>,
    entry: &FileEntry,
    category: &str,
    cfg: &ParserConfig,
    out: &mut Vec<Finding>,
) {
    let Some(p) = pending.take() else { return };
    let text = p.text.trim();
    if text.is_empty() {
        return;
    }
    // Unmarked items below the threshold are throwaway ("OK", "fine").
    if p.severity.is_none() && text.len() < cfg.min_meaningful_len {
        return;
    }
    let sev = p.severity.unwrap_or_else(|| severity::infer_from_text(text));
    out.push(build_finding(
        entry,
        None,
        category,
        sev,
        first_line(text),
        text.to_string(),
        None,
        cfg,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<FileEntry> {
        vec![
            FileEntry::new("a.py", "src/a.py", ""),
            FileEntry::new("b.py", "src/b.py", ""),
        ]
    }

    #[test]
    fn severity_bullets_without_file_headers() {
        let resp = "- [high] issue A\n- [low] issue B";
        let one = vec![FileEntry::new("a.py", "src/a.py", "")];
        let out = parse(resp, &one, "g", &ParserConfig::default()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].severity, Severity::High);
        assert_eq!(out[1].severity, Severity::Low);
        assert!(out.iter().all(|f| f.file_path == "src/a.py"));
    }

    #[test]
    fn file_headings_switch_attribution() {
        let resp = "## a.py\n- [high] unchecked deserialization of request body\n\n## b.py\n- [info] typo in comment\n";
        let out = parse(resp, &entries(), "g", &ParserConfig::default()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].file_path, "src/a.py");
        assert_eq!(out[1].file_path, "src/b.py");
    }

    #[test]
    fn numbered_items_infer_severity() {
        let resp = "1. possible sql injection in the query builder\n2. consider renaming this variable for clarity";
        let out = parse(resp, &entries(), "g", &ParserConfig::default()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].severity, Severity::Critical);
        assert_eq!(out[1].severity, Severity::Info);
    }

    #[test]
    fn continuation_lines_are_appended() {
        let resp = "- [medium] resource leak\nthe file handle opened above is never closed\non the early-return path";
        let out = parse(resp, &entries(), "g", &ParserConfig::default()).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].raw_feedback.contains("early-return path"));
        assert_eq!(out[0].title_or_description, "resource leak");
    }

    #[test]
    fn short_unmarked_items_are_dropped() {
        let resp = "1. OK\n2. fine";
        assert!(parse(resp, &entries(), "g", &ParserConfig::default()).is_err());
    }

    #[test]
    fn pure_prose_fails_through() {
        let resp = "The code looks reasonable overall and I have no blocking remarks.";
        assert!(parse(resp, &entries(), "g", &ParserConfig::default()).is_err());
    }
}
