//! Best-effort extraction of a source line number from free text.

use lazy_static::lazy_static;
use regex::Regex;

/// Line numbers at or above this are treated as noise (models sometimes echo
/// ids or timestamps that look like line references).
const MAX_SANE_LINE: u32 = 100_000;

lazy_static! {
    /// Ordered phrasings: "line N" (with optional at/on), `L42`, `:42:`.
    static ref LINE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)\b(?:at\s+|on\s+)?line\s+(\d+)").unwrap(),
        Regex::new(r"\bL(\d+)\b").unwrap(),
        Regex::new(r":(\d+):").unwrap(),
    ];
}

/// True for line numbers worth keeping: `0 < n < 100000`.
pub fn is_sane(n: u32) -> bool {
    n > 0 && n < MAX_SANE_LINE
}

/// Returns the first in-range line number found in `text`, if any.
pub fn extract(text: &str) -> Option<u32> {
    for re in LINE_PATTERNS.iter() {
        for caps in re.captures_iter(text) {
            if let Ok(n) = caps[1].parse::<u32>() {
                if is_sane(n) {
                    return Some(n);
                }
            }
        }
    }
    None
}
