//! Severity normalization and keyword inference.
//!
//! `normalize` maps explicit tokens (`[HIGH]`, `"severity": "blocker"`) onto
//! the closed scale; `infer_from_text` is the cue scan used when a finding
//! carries no explicit token at all. Both are total: unknown input means
//! `Medium`, never an error.

use crate::model::Severity;

/// Maps an arbitrary severity token to the canonical scale.
///
/// Case-insensitive, whitespace-tolerant, idempotent on canonical values.
pub fn normalize(token: &str) -> Severity {
    match token.trim().to_ascii_lowercase().as_str() {
        "critical" | "crit" | "blocker" | "fatal" => Severity::Critical,
        "high" | "severe" | "major" | "important" | "error" => Severity::High,
        "medium" | "med" | "moderate" | "warning" | "warn" => Severity::Medium,
        "low" | "minor" | "trivial" | "nit" | "nitpick" => Severity::Low,
        "info" | "informational" | "note" | "suggestion" | "style" | "hint" => Severity::Info,
        _ => Severity::Medium,
    }
}

/// Infers a severity from free text when no explicit token is present.
///
/// Scans lowercased text for cue phrases, strongest first.
pub fn infer_from_text(text: &str) -> Severity {
    let lower = text.to_lowercase();

    const CRITICAL_CUES: [&str; 5] = [
        "remote code execution",
        "sql injection",
        "command injection",
        "critical",
        "data loss",
    ];
    const HIGH_CUES: [&str; 7] = [
        "security",
        "vulnerability",
        "race condition",
        "deadlock",
        "xss",
        "severe",
        "major",
    ];
    const LOW_CUES: [&str; 4] = ["minor", "trivial", "nit", "cosmetic"];
    const INFO_CUES: [&str; 4] = ["note:", "suggestion", "consider ", "style"];

    if CRITICAL_CUES.iter().any(|c| lower.contains(c)) {
        return Severity::Critical;
    }
    if HIGH_CUES.iter().any(|c| lower.contains(c)) {
        return Severity::High;
    }
    if LOW_CUES.iter().any(|c| lower.contains(c)) {
        return Severity::Low;
    }
    if INFO_CUES.iter().any(|c| lower.contains(c)) {
        return Severity::Info;
    }
    Severity::Medium
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_map_to_scale() {
        assert_eq!(normalize("CRIT"), Severity::Critical);
        assert_eq!(normalize(" severe "), Severity::High);
        assert_eq!(normalize("med"), Severity::Medium);
        assert_eq!(normalize("Trivial"), Severity::Low);
        assert_eq!(normalize("informational"), Severity::Info);
    }

    #[test]
    fn unknown_token_defaults_to_medium() {
        assert_eq!(normalize("banana"), Severity::Medium);
        assert_eq!(normalize(""), Severity::Medium);
    }

    #[test]
    fn normalize_is_idempotent_on_canonical_values() {
        for s in [
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
            Severity::Info,
        ] {
            assert_eq!(normalize(s.as_str()), s);
        }
    }

    #[test]
    fn inference_from_cues() {
        assert_eq!(infer_from_text("possible SQL injection here"), Severity::Critical);
        assert_eq!(infer_from_text("this is a security problem"), Severity::High);
        assert_eq!(infer_from_text("minor formatting issue"), Severity::Low);
        assert_eq!(infer_from_text("suggestion: rename this"), Severity::Info);
        assert_eq!(infer_from_text("loop bound looks off"), Severity::Medium);
    }
}
