//! Near-duplicate collapse for findings of the same file.
//!
//! Strategy (cheap, no model calls): O(n²) pairwise pass per file path,
//! order-sensitive token similarity on the full feedback text, keep the
//! finding with the longer `raw_feedback`. Review batches are tens of
//! findings, so the quadratic pass is fine.

use tracing::debug;

use crate::model::Finding;

/// Order-sensitive sequence similarity over case-folded whitespace tokens.
///
/// Computed as `2·lcs / (|a| + |b|)` where `lcs` is the longest common
/// token subsequence, so reordered text scores lower than identical text.
/// Returns a ratio in `0.0..=1.0`.
pub fn token_similarity(a: &str, b: &str) -> f32 {
    let ta: Vec<String> = a.split_whitespace().map(str::to_lowercase).collect();
    let tb: Vec<String> = b.split_whitespace().map(str::to_lowercase).collect();
    if ta.is_empty() && tb.is_empty() {
        return 1.0;
    }
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }

    // LCS length with a rolling row.
    let mut prev = vec![0usize; tb.len() + 1];
    let mut cur = vec![0usize; tb.len() + 1];
    for x in &ta {
        for (j, y) in tb.iter().enumerate() {
            cur[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    let lcs = prev[tb.len()];
    (2 * lcs) as f32 / (ta.len() + tb.len()) as f32
}

/// Collapses near-duplicate findings in place.
///
/// Two findings for the same `file_path` whose feedback similarity exceeds
/// `threshold` are merged: the one with the longer `raw_feedback` survives.
/// Idempotent: survivors are pairwise below the threshold.
pub fn dedup_in_place(findings: &mut Vec<Finding>, threshold: f32) {
    let n = findings.len();
    if n < 2 {
        return;
    }
    let mut keep = vec![true; n];

    for i in 0..n {
        if !keep[i] {
            continue;
        }
        for j in (i + 1)..n {
            if !keep[j] || findings[i].file_path != findings[j].file_path {
                continue;
            }
            let ratio = token_similarity(&findings[i].raw_feedback, &findings[j].raw_feedback);
            if ratio > threshold {
                // Keep the richer explanation.
                if findings[j].raw_feedback.len() > findings[i].raw_feedback.len() {
                    keep[i] = false;
                    debug!("dedup: dropped finding {i} in favor of {j} (ratio={ratio:.2})");
                    break;
                } else {
                    keep[j] = false;
                    debug!("dedup: dropped finding {j} in favor of {i} (ratio={ratio:.2})");
                }
            }
        }
    }

    let mut idx = 0;
    findings.retain(|_| {
        let k = keep[idx];
        idx += 1;
        k
    });
}
