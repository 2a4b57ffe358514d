//! Normalizes free-form model review output into structured findings.
//!
//! A model reply may be clean JSON, JSON buried in prose and code fences, an
//! ad-hoc delimited format, a bulleted list, or plain text. This crate runs
//! an ordered strategy chain over the reply and always produces a consistent
//! result:
//!
//! 1) **structured** — the reply is a JSON document;
//! 2) **fenced** — JSON inside code fences, longest candidate first;
//! 3) **delimited** — `=== FILE: ... ===` / `--- FINDING [sev] ---` blocks;
//! 4) **heuristic** — bulleted/numbered lists with file headings;
//! 5) **fallback** — the whole reply as one finding, never fails.
//!
//! Guarantees:
//! - a non-empty, non-whitespace reply yields at least one [`Finding`];
//! - an empty/whitespace reply yields exactly zero, not an error;
//! - nothing here panics or returns an error to the caller.
//!
//! Everything is pure and synchronous; no I/O, no retained state. Safe to
//! call concurrently on independent inputs.

pub mod config;
pub mod dedup;
pub mod errors;
pub mod lines;
pub mod model;
pub mod severity;
pub mod strategy;

use tracing::{debug, warn};

pub use config::ParserConfig;
pub use errors::{NormalizerError, NormalizerResult, StrategyError};
pub use model::{FileEntry, Finding, Severity};

/// Parses one model reply into findings.
///
/// `file_entries` describes the file(s) the reply is about; `category` is
/// attached to every finding that lacks its own explicit label. The returned
/// list is deduplicated per file and owned outright by the caller.
pub fn parse_response(
    response: &str,
    file_entries: &[FileEntry],
    category: &str,
    cfg: &ParserConfig,
) -> Vec<Finding> {
    if response.trim().is_empty() {
        debug!("parse: empty response, nothing to extract");
        return Vec::new();
    }

    let mut findings = Vec::new();
    for (name, strategy) in strategy::CHAIN {
        match strategy(response, file_entries, category, cfg) {
            Ok(parsed) if !parsed.is_empty() => {
                debug!("parse: strategy={name} findings={}", parsed.len());
                if *name == "fallback" {
                    warn!("parse: no structure recovered, wrapped raw response");
                }
                findings = parsed;
                break;
            }
            Ok(_) => debug!("parse: strategy={name} returned nothing, trying next"),
            Err(e) => debug!("parse: strategy={name} failed ({e}), trying next"),
        }
    }

    let before = findings.len();
    dedup::dedup_in_place(&mut findings, cfg.similarity_threshold);
    if findings.len() < before {
        debug!("parse: dedup {} -> {}", before, findings.len());
    }
    findings
}

/// [`parse_response`] with [`ParserConfig::default`].
pub fn parse_response_default(
    response: &str,
    file_entries: &[FileEntry],
    category: &str,
) -> Vec<Finding> {
    parse_response(response, file_entries, category, &ParserConfig::default())
}
