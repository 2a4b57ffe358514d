//! End-to-end flow: diff text → prompt-side records, model reply → findings.
//!
//! Exercises both crates together the way the review orchestrator uses them:
//! the diff parser supplies per-hunk context, the normalizer turns whatever
//! the model answered into findings.

use diff_context_engine::{DiffConfig, parse_unified_diff};
use review_normalizer::{FileEntry, ParserConfig, Severity, parse_response_default};

const DIFF: &str = "\
--- a/src/session.py
+++ b/src/session.py
@@ -12,6 +12,7 @@ def create_session(user):
     session = Session(user)
     sessions[session.id] = session
+    log.info('session %s', session.id)
     return session
";

#[test]
fn diff_feeds_review_and_reply_normalizes() {
    let files = parse_unified_diff(DIFF, &DiffConfig::default());
    assert_eq!(files.len(), 1);
    let hunk = &files[0].hunks[0];
    assert!(hunk.function_name.as_deref().unwrap().contains("create_session"));
    assert_eq!(hunk.added.len(), 1);

    // The entry content the orchestrator would send alongside the diff.
    let entries = vec![FileEntry::new(
        "session.py",
        files[0].filename.clone(),
        files[0].content.clone(),
    )];

    // A messy but JSON-bearing reply.
    let reply = format!(
        "Here is what I found:\n```json\n{{\"files\":[{{\"filename\":\"session.py\",\"findings\":[{{\"severity\":\"high\",\"line\":{},\"title\":\"sessions dict grows forever\",\"description\":\"entries are never evicted\"}}]}}]}}\n```",
        hunk.added[0].0
    );
    let findings = parse_response_default(&reply, &entries, "performance");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::High);
    assert_eq!(findings[0].file_path, "src/session.py");
    assert_eq!(findings[0].line_number, Some(hunk.added[0].0));
}

#[test]
fn every_reply_shape_produces_findings() {
    let entries = vec![FileEntry::new("a.py", "a.py", "")];
    let shapes = [
        r#"{"files":[{"filename":"a.py","findings":[{"title":"plain json"}]}]}"#,
        "prose\n```json\n[{\"title\":\"fenced json\"}]\n```\nmore prose",
        "=== FILE: a.py ===\n--- FINDING [medium] ---\ndelimited finding body\n",
        "1. the first numbered observation about this code\n2. the second numbered observation about this code",
        "I could not find anything structured to say.",
    ];
    for shape in shapes {
        let out = parse_response_default(shape, &entries, "general");
        assert!(!out.is_empty(), "shape yielded nothing: {shape:?}");
        assert!(out.iter().all(|f| f.file_path == "a.py"));
    }
}

#[test]
fn thresholds_are_tunable() {
    let entries = vec![FileEntry::new("a.py", "a.py", "")];
    let resp = "=== FILE: a.py ===\n--- FINDING [low] ---\nduplicate wording here exactly\n--- FINDING [low] ---\nduplicate wording here exactly plus\n";

    let strict = ParserConfig {
        similarity_threshold: 0.50,
        ..ParserConfig::default()
    };
    let lax = ParserConfig {
        similarity_threshold: 0.99,
        ..ParserConfig::default()
    };
    let merged = review_normalizer::parse_response(resp, &entries, "g", &strict);
    let kept = review_normalizer::parse_response(resp, &entries, "g", &lax);
    assert_eq!(merged.len(), 1);
    assert_eq!(kept.len(), 2);
}
