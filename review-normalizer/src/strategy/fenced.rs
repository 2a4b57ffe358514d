//! Strategy 2: structured data wrapped in prose and code fences.
//!
//! Models often explain themselves around the payload:
//!
//! ````text
//! Here is my review:
//! ```json
//! {"files": [...]}
//! ```
//! Let me know if anything is unclear.
//! ````
//!
//! All fenced candidates are collected and tried longest-first: the longest
//! block is the most likely to be the complete payload.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::config::ParserConfig;
use crate::errors::{NormalizerResult, StrategyError};
use crate::model::{FileEntry, Finding};
use crate::strategy::structured;

lazy_static! {
    /// ```lang\n ... ``` blocks; the tag and body are captured separately.
    static ref FENCE_RE: Regex =
        Regex::new(r"```([A-Za-z0-9_-]*)[ \t]*\r?\n((?s:.*?))```").unwrap();
}

pub fn parse(
    response: &str,
    entries: &[FileEntry],
    category: &str,
    cfg: &ParserConfig,
) -> NormalizerResult<Vec<Finding>> {
    let mut candidates: Vec<&str> = Vec::new();
    for caps in FENCE_RE.captures_iter(response) {
        let tag = caps.get(1).map_or("", |m| m.as_str()).to_ascii_lowercase();
        let body = caps.get(2).map_or("", |m| m.as_str());
        let trimmed = body.trim();
        let looks_structured = trimmed.starts_with('{') || trimmed.starts_with('[');
        if tag == "json" || (tag.is_empty() && looks_structured) {
            candidates.push(trimmed);
        }
    }
    if candidates.is_empty() {
        return Err(StrategyError::NotApplicable("no structured fenced block").into());
    }

    candidates.sort_by_key(|c| std::cmp::Reverse(c.len()));
    for (i, payload) in candidates.iter().enumerate() {
        match structured::parse_payload(payload, entries, category, cfg) {
            Ok(findings) => return Ok(findings),
            Err(e) => debug!("fenced: candidate {i} rejected: {e}"),
        }
    }
    Err(StrategyError::Empty.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    fn entries() -> Vec<FileEntry> {
        vec![FileEntry::new("a.py", "a.py", "")]
    }

    #[test]
    fn payload_inside_prose() {
        let resp = "Sure! Here is the review:\n```json\n{\"files\":[{\"filename\":\"a.py\",\"findings\":[{\"severity\":\"high\",\"title\":\"issue\"}]}]}\n```\nHope this helps.";
        let out = parse(resp, &entries(), "g", &ParserConfig::default()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].severity, Severity::High);
    }

    #[test]
    fn longest_candidate_wins() {
        // A short decoy block first, then the real payload.
        let resp = "```json\n{\"files\":[]}\n```\n```json\n{\"files\":[{\"filename\":\"a.py\",\"findings\":[{\"title\":\"real finding here\"}]}]}\n```";
        let out = parse(resp, &entries(), "g", &ParserConfig::default()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title_or_description, "real finding here");
    }

    #[test]
    fn untagged_fence_with_json_body() {
        let resp = "```\n[{\"title\":\"untagged but structured payload\"}]\n```";
        let out = parse(resp, &entries(), "g", &ParserConfig::default()).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn code_fence_without_json_is_not_applicable() {
        let resp = "```python\nprint('hello')\n```";
        assert!(parse(resp, &entries(), "g", &ParserConfig::default()).is_err());
    }

    #[test]
    fn no_fence_is_not_applicable() {
        assert!(parse("plain prose", &entries(), "g", &ParserConfig::default()).is_err());
    }
}
