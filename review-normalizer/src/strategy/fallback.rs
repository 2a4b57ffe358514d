//! Strategy 5: wrap the whole response as one finding.
//!
//! Never fails for non-empty input; this is what makes the pipeline total.
//! The raw text is preserved verbatim so nothing the model said is lost,
//! even when no structure could be recovered.

use crate::config::ParserConfig;
use crate::errors::{NormalizerResult, StrategyError};
use crate::model::{FileEntry, Finding};
use crate::severity;
use crate::strategy::{build_finding, first_line};

pub fn parse(
    response: &str,
    entries: &[FileEntry],
    category: &str,
    cfg: &ParserConfig,
) -> NormalizerResult<Vec<Finding>> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(StrategyError::Empty.into());
    }
    let sev = severity::infer_from_text(trimmed);

    let (entry, title) = match entries {
        [] => (
            FileEntry::synthetic("<unknown>"),
            first_line(trimmed).to_string(),
        ),
        [only] => (only.clone(), first_line(trimmed).to_string()),
        [head, ..] => (
            head.clone(),
            format!("Combined batch feedback for {} files", entries.len()),
        ),
    };

    Ok(vec![build_finding(
        &entry,
        None,
        category,
        sev,
        &title,
        trimmed.to_string(),
        None,
        cfg,
    )])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_entry_gets_whole_response() {
        let es = vec![FileEntry::new("a.py", "src/a.py", "")];
        let out = parse("free-form feedback", &es, "g", &ParserConfig::default()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].file_path, "src/a.py");
        assert_eq!(out[0].raw_feedback, "free-form feedback");
    }

    #[test]
    fn multiple_entries_note_combined_batch() {
        let es = vec![
            FileEntry::new("a.py", "src/a.py", ""),
            FileEntry::new("b.py", "src/b.py", ""),
        ];
        let out = parse("feedback about both files", &es, "g", &ParserConfig::default()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].file_path, "src/a.py");
        assert!(out[0].title_or_description.contains("Combined batch"));
    }

    #[test]
    fn no_entries_uses_unknown_path() {
        let out = parse("orphan feedback", &[], "g", &ParserConfig::default()).unwrap();
        assert_eq!(out[0].file_path, "<unknown>");
    }
}
