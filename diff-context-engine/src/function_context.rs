//! Heuristic recovery of the enclosing function/class for a diff location.
//!
//! Input is either the trailing context of a `@@ ... @@ <context>` hunk
//! header or a single context line from the hunk body. Matching is an
//! ordered table of per-construct regexes rather than one large pattern;
//! adding a language means adding a table entry.

use lazy_static::lazy_static;
use regex::Regex;

/// Inputs shorter than this carry no usable signal.
const MIN_CONTEXT_LEN: usize = 10;

/// Cap on the returned signature text.
const MAX_CONTEXT_LEN: usize = 80;

lazy_static! {
    /// Ordered signature matchers: most specific constructs first.
    static ref SIGNATURE_PATTERNS: Vec<Regex> = vec![
        // Keyword-prefixed function definitions: def/fn/func/function/fun,
        // optionally behind visibility or async/static modifiers. The
        // optional parenthesised group before the name covers Go receivers.
        Regex::new(
            r"^\s*(?:(?:pub(?:\([^)]*\))?|export|default|async|static|unsafe|const|override)\s+)*(?:def|fn|func|function|fun)\s+(?:\([^)]*\)\s*)?[A-Za-z_][A-Za-z0-9_]*"
        )
        .unwrap(),
        // C-family / Java / C# method signatures behind access modifiers:
        // `public static Foo<T> bar(`.
        Regex::new(
            r"^\s*(?:(?:public|private|protected|internal|static|final|abstract|virtual|override|async|synchronized)\s+)+[\w<>\[\],\s\.:&*]+?\b[A-Za-z_]\w*\s*\("
        )
        .unwrap(),
        // Type declarations: class/struct/interface/trait/enum/impl/module.
        Regex::new(
            r"^\s*(?:(?:pub(?:\([^)]*\))?|export|default|abstract|final|sealed|data)\s+)*(?:class|struct|interface|trait|enum|impl|object|module)\s+[A-Za-z_][\w:]*"
        )
        .unwrap(),
        // Assignment-style function expressions: `name = (a, b) => ...`,
        // `const name = function ...`, `val handler = x => ...`.
        Regex::new(
            r"^\s*(?:export\s+)?(?:(?:const|let|var|val)\s+)?[A-Za-z_$][\w$\.]*\s*=\s*(?:async\s+)?(?:function\b|\([^)]*\)\s*=>|[A-Za-z_$][\w$]*\s*=>)"
        )
        .unwrap(),
    ];
}

/// Matches `text` against the signature table only.
///
/// Returns the trimmed matching line (capped) when some known construct is
/// recognised. Used by the diff parser to scan hunk context lines, where the
/// raw-text fallback of [`extract_function_context`] would be too eager.
pub fn match_signature(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.len() < MIN_CONTEXT_LEN {
        return None;
    }
    for re in SIGNATURE_PATTERNS.iter() {
        if re.is_match(trimmed) {
            return Some(cap_len(trimmed));
        }
    }
    None
}

/// Recovers the nearest enclosing signature from free text.
///
/// Tries the signature table first; text that matches no known construct but
/// is long enough to be meaningful is returned trimmed as a lower-confidence
/// fallback (hunk header context is usually a signature even when we have no
/// pattern for that language). Very short inputs yield `None`.
pub fn extract_function_context(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.len() < MIN_CONTEXT_LEN {
        return None;
    }
    match_signature(trimmed).or_else(|| Some(cap_len(trimmed)))
}

fn cap_len(s: &str) -> String {
    if s.chars().count() <= MAX_CONTEXT_LEN {
        return s.to_string();
    }
    s.chars().take(MAX_CONTEXT_LEN).collect()
}
