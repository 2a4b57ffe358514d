//! Permissive unified-diff parser.
//!
//! Features:
//! - Works even if file headers (---/+++) are missing (hunks-only input
//!   lands on a synthetic `<unknown>` file).
//! - Ignores `\ No newline at end of file` marker lines.
//! - Binary patch lines (`GIT binary patch`, `Binary files ... differ`)
//!   leave the file section with an empty hunk list.
//! - Invalid hunk headers are skipped, never fatal: the caller always gets
//!   whatever hunks were well-formed.
//!
//! Each hunk gets its enclosing function/class recovered from the header's
//! trailing context, falling back to the first context line that matches a
//! known signature pattern.

use tracing::debug;

use crate::errors::DiffParseError;
use crate::function_context::{extract_function_context, match_signature};
use crate::types::{DiffConfig, FileDiff, Hunk};

/// File name used when hunks appear before any `+++` header.
const UNKNOWN_FILE: &str = "<unknown>";

/// Heuristic to detect whether diff text represents a binary patch.
pub fn looks_like_binary_patch(diff: &str) -> bool {
    if diff.contains("GIT binary patch") {
        return true;
    }
    if diff.starts_with("Binary files ") || diff.contains("\nBinary files ") {
        return true;
    }
    diff.bytes().any(|b| b == 0)
}

/// Hunk body line in original order; numbering follows the running counters.
#[derive(Debug)]
enum BodyLine {
    Added(u32, String),
    Removed(u32, String),
    Context(String),
}

/// In-progress hunk; finalized into [`Hunk`] when the next boundary is seen.
#[derive(Debug)]
struct HunkBuilder {
    header: String,
    old_start: u32,
    new_start: u32,
    old_line: u32,
    new_line: u32,
    header_context: String,
    body: Vec<BodyLine>,
}

impl HunkBuilder {
    fn finish(self, cfg: &DiffConfig) -> Hunk {
        let first_change = self
            .body
            .iter()
            .position(|l| !matches!(l, BodyLine::Context(_)));
        let last_change = self
            .body
            .iter()
            .rposition(|l| !matches!(l, BodyLine::Context(_)));

        let mut added = Vec::new();
        let mut removed = Vec::new();
        let mut context_before = Vec::new();
        let mut context_after = Vec::new();

        for (i, line) in self.body.iter().enumerate() {
            match line {
                BodyLine::Added(n, text) => added.push((*n, text.clone())),
                BodyLine::Removed(n, text) => removed.push((*n, text.clone())),
                BodyLine::Context(text) => {
                    match (first_change, last_change) {
                        (Some(f), _) if i < f => context_before.push(text.clone()),
                        (_, Some(l)) if i > l => context_after.push(text.clone()),
                        (None, _) => context_before.push(text.clone()),
                        _ => {}
                    }
                }
            }
        }
        if context_before.len() > cfg.context_lines {
            context_before.drain(..context_before.len() - cfg.context_lines);
        }

        // Prefer the `@@ ... @@ <context>` suffix; fall back to the first
        // context line that looks like a signature.
        let function_name = extract_function_context(&self.header_context).or_else(|| {
            self.body.iter().find_map(|l| match l {
                BodyLine::Context(text) => match_signature(text),
                _ => None,
            })
        });

        Hunk {
            header: self.header,
            old_start: self.old_start,
            new_start: self.new_start,
            added,
            removed,
            context_before,
            context_after,
            function_name,
        }
    }

    /// Post-change lines of this hunk (added + context, removed excluded).
    fn new_side_lines(&self) -> impl Iterator<Item = &str> {
        self.body.iter().filter_map(|l| match l {
            BodyLine::Added(_, text) | BodyLine::Context(text) => Some(text.as_str()),
            BodyLine::Removed(..) => None,
        })
    }
}

#[derive(Debug)]
struct FileBuilder {
    filename: String,
    content_lines: Vec<String>,
    hunks: Vec<Hunk>,
}

impl FileBuilder {
    fn new(filename: String) -> Self {
        Self {
            filename,
            content_lines: Vec::new(),
            hunks: Vec::new(),
        }
    }

    fn finish(self) -> FileDiff {
        FileDiff {
            filename: self.filename,
            content: self.content_lines.join("\n"),
            hunks: self.hunks,
        }
    }
}

/// Parses unified-diff text into per-file hunk lists with recovered context.
///
/// Never fails: structurally broken fragments are skipped and logged at
/// DEBUG, and an empty or unrecognisable input yields an empty list.
pub fn parse_unified_diff(text: &str, cfg: &DiffConfig) -> Vec<FileDiff> {
    let mut files: Vec<FileDiff> = Vec::new();
    let mut current_file: Option<FileBuilder> = None;
    let mut current_hunk: Option<HunkBuilder> = None;
    // Old-side path from the latest `--- a/...`; used when `+++` is /dev/null.
    let mut pending_old_name: Option<String> = None;

    fn flush_hunk(
        file: &mut Option<FileBuilder>,
        hunk: &mut Option<HunkBuilder>,
        cfg: &DiffConfig,
    ) {
        if let Some(h) = hunk.take() {
            let target = file.get_or_insert_with(|| FileBuilder::new(UNKNOWN_FILE.to_string()));
            target
                .content_lines
                .extend(h.new_side_lines().map(str::to_string));
            target.hunks.push(h.finish(cfg));
        }
    }

    for line in text.lines() {
        if line.starts_with("@@") {
            flush_hunk(&mut current_file, &mut current_hunk, cfg);
            match parse_hunk_header(line) {
                Ok((old_start, new_start, header_context)) => {
                    current_hunk = Some(HunkBuilder {
                        header: line.to_string(),
                        old_start,
                        new_start,
                        old_line: old_start,
                        new_line: new_start,
                        header_context,
                        body: Vec::new(),
                    });
                }
                Err(e) => {
                    debug!("skipping malformed hunk header: {e}");
                }
            }
            continue;
        }

        // `\ No newline at end of file` markers carry no content.
        if line.starts_with('\\') {
            continue;
        }

        if is_old_file_header(line) {
            flush_hunk(&mut current_file, &mut current_hunk, cfg);
            pending_old_name = Some(strip_diff_path(&line[4..]));
            continue;
        }
        if is_new_file_header(line) {
            flush_hunk(&mut current_file, &mut current_hunk, cfg);
            if let Some(f) = current_file.take() {
                files.push(f.finish());
            }
            let new_name = strip_diff_path(&line[4..]);
            let filename = if new_name == "/dev/null" {
                pending_old_name.take().unwrap_or(new_name)
            } else {
                new_name
            };
            current_file = Some(FileBuilder::new(filename));
            continue;
        }

        if let Some(hunk) = current_hunk.as_mut() {
            if let Some(rest) = line.strip_prefix('+') {
                hunk.body.push(BodyLine::Added(hunk.new_line, rest.to_string()));
                hunk.new_line += 1;
            } else if let Some(rest) = line.strip_prefix('-') {
                hunk.body.push(BodyLine::Removed(hunk.old_line, rest.to_string()));
                hunk.old_line += 1;
            } else if let Some(rest) = line.strip_prefix(' ') {
                hunk.body.push(BodyLine::Context(rest.to_string()));
                hunk.old_line += 1;
                hunk.new_line += 1;
            } else if line.is_empty() {
                hunk.body.push(BodyLine::Context(String::new()));
                hunk.old_line += 1;
                hunk.new_line += 1;
            } else {
                // Other headers (diff --git, index, ...) end the hunk.
                flush_hunk(&mut current_file, &mut current_hunk, cfg);
            }
            continue;
        }

        // Prelude between files: nothing to collect. Binary markers just
        // leave the current file without hunks.
    }

    flush_hunk(&mut current_file, &mut current_hunk, cfg);
    if let Some(f) = current_file.take() {
        files.push(f.finish());
    }
    files
}

/// Parses a unified diff with the default configuration.
pub fn parse_unified_diff_default(text: &str) -> Vec<FileDiff> {
    parse_unified_diff(text, &DiffConfig::default())
}

fn is_old_file_header(line: &str) -> bool {
    line.starts_with("--- a/") || line.starts_with("--- /dev/null")
}

fn is_new_file_header(line: &str) -> bool {
    line.starts_with("+++ b/") || line.starts_with("+++ /dev/null")
}

/// Strips the `a/` / `b/` prefix diff tools put in front of paths.
fn strip_diff_path(raw: &str) -> String {
    let p = raw.trim();
    p.strip_prefix("a/")
        .or_else(|| p.strip_prefix("b/"))
        .unwrap_or(p)
        .to_string()
}

/// Parses `@@ -a,b +c,d @@ optional trailing context` into
/// `(old_start, new_start, trailing)`.
fn parse_hunk_header(line: &str) -> Result<(u32, u32, String), DiffParseError> {
    let rest = line
        .strip_prefix("@@")
        .ok_or_else(|| DiffParseError::InvalidHunkHeader(line.to_string()))?;
    let (ranges, trailing) = match rest.find("@@") {
        Some(i) => (&rest[..i], rest[i + 2..].trim().to_string()),
        None => (rest, String::new()),
    };

    let mut old_start = None;
    let mut new_start = None;
    for part in ranges.split_whitespace() {
        if let Some(p) = part.strip_prefix('-') {
            old_start = Some(range_start(p)?);
        } else if let Some(p) = part.strip_prefix('+') {
            new_start = Some(range_start(p)?);
        }
    }
    match (old_start, new_start) {
        (Some(o), Some(n)) => Ok((o, n, trailing)),
        _ => Err(DiffParseError::InvalidHunkHeader(line.to_string())),
    }
}

/// Splits "12,7" or "12" and returns the start value.
fn range_start(s: &str) -> Result<u32, DiffParseError> {
    let start = s.split(',').next().unwrap_or(s);
    start
        .parse()
        .map_err(|_| DiffParseError::InvalidRange(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_FILE_DIFF: &str = "\
diff --git a/src/auth.py b/src/auth.py
index 111..222 100644
--- a/src/auth.py
+++ b/src/auth.py
@@ -10,6 +10,7 @@ def login(user):
     token = issue_token(user)
     if token is None:
         return None
+    audit_log(user)
     return token


@@ -40,4 +41,5 @@ def logout(user):
     revoke(user)
+    audit_log(user)
     return True
--- a/src/db.py
+++ b/src/db.py
@@ -3,5 +3,4 @@ class Connection:
     def close(self):
-        self.conn.close()
-        self.conn = None
+        self.release()
         return True
";

    #[test]
    fn two_files_multi_hunk() {
        let files = parse_unified_diff_default(TWO_FILE_DIFF);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].filename, "src/auth.py");
        assert_eq!(files[0].hunks.len(), 2);
        assert_eq!(files[1].filename, "src/db.py");
        assert_eq!(files[1].hunks.len(), 1);

        let h = &files[0].hunks[0];
        assert_eq!(h.old_start, 10);
        assert_eq!(h.new_start, 10);
        assert_eq!(h.added, vec![(13, "    audit_log(user)".to_string())]);
        assert!(h.removed.is_empty());

        let h2 = &files[0].hunks[1];
        assert_eq!(h2.old_start, 40);
        assert_eq!(h2.new_start, 41);
    }

    #[test]
    fn function_context_from_header() {
        let files = parse_unified_diff_default("@@ -10,5 +10,6 @@ def foo():\n context\n+added\n");
        let name = files[0].hunks[0].function_name.as_deref().unwrap();
        assert!(name.contains("foo"));
    }

    #[test]
    fn function_context_from_context_line() {
        let diff = "\
--- a/x.rs
+++ b/x.rs
@@ -1,4 +1,5 @@
 fn run_pipeline(cfg: &Config) {
     let a = 1;
+    let b = 2;
     a
";
        let files = parse_unified_diff_default(diff);
        let name = files[0].hunks[0].function_name.as_deref().unwrap();
        assert!(name.contains("run_pipeline"));
    }

    #[test]
    fn content_excludes_removed_lines() {
        let files = parse_unified_diff_default(TWO_FILE_DIFF);
        let db = &files[1];
        assert!(db.content.contains("self.release()"));
        assert!(!db.content.contains("self.conn.close()"));
        assert!(db.content.contains("return True"));
    }

    #[test]
    fn context_before_is_capped() {
        let diff = "\
@@ -1,8 +1,9 @@
 l1
 l2
 l3
 l4
 l5
 l6
+added
 after
";
        let files = parse_unified_diff(diff, &DiffConfig { context_lines: 3 });
        let h = &files[0].hunks[0];
        assert_eq!(h.context_before, vec!["l4", "l5", "l6"]);
        assert_eq!(h.context_after, vec!["after"]);
    }

    #[test]
    fn hunks_only_input_lands_on_unknown_file() {
        let files = parse_unified_diff_default("@@ -1,2 +1,2 @@\n-a\n+b\n c\n");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "<unknown>");
        assert_eq!(files[0].hunks.len(), 1);
    }

    #[test]
    fn malformed_hunk_header_is_skipped() {
        let diff = "\
--- a/f.txt
+++ b/f.txt
@@ garbage @@
+orphan
@@ -1,1 +1,2 @@
 keep
+new
";
        let files = parse_unified_diff_default(diff);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].hunks.len(), 1);
        assert_eq!(files[0].hunks[0].old_start, 1);
    }

    #[test]
    fn no_newline_marker_is_ignored() {
        let diff = "\
--- a/f.txt
+++ b/f.txt
@@ -1,1 +1,1 @@
-old
+new
\\ No newline at end of file
";
        let files = parse_unified_diff_default(diff);
        assert_eq!(files[0].hunks[0].added, vec![(1, "new".to_string())]);
    }

    #[test]
    fn empty_input_yields_empty_list() {
        assert!(parse_unified_diff_default("").is_empty());
        assert!(parse_unified_diff_default("no diff content here").is_empty());
    }

    #[test]
    fn binary_patch_detection() {
        assert!(looks_like_binary_patch("Binary files a/x.png and b/x.png differ"));
        assert!(looks_like_binary_patch("GIT binary patch\nliteral 100\n"));
        assert!(!looks_like_binary_patch(TWO_FILE_DIFF));
    }

    #[test]
    fn deleted_file_keeps_old_name() {
        let diff = "\
--- a/gone.py
+++ /dev/null
@@ -1,2 +0,0 @@
-a
-b
";
        let files = parse_unified_diff_default(diff);
        assert_eq!(files[0].filename, "gone.py");
        assert_eq!(files[0].hunks[0].removed.len(), 2);
        assert!(files[0].content.is_empty());
    }
}
