//! Computes unified diffs between a [`FixProposal`]'s proposed file
//! contents and what's actually on disk.

use std::path::Path;

use faultline_core::types::{FileDiff, FixProposal};
use similar::TextDiff;

const CONTEXT_RADIUS: usize = 3;

/// Computes one [`FileDiff`] per file touched by `proposal` (the primary
/// fix plus any `additional_fixes`), against the file's current on-disk
/// contents. A file that doesn't exist yet diffs against an empty string.
pub fn compute_diffs(root: &Path, proposal: &FixProposal) -> Vec<FileDiff> {
    let mut diffs = Vec::new();
    collect(root, proposal, &mut diffs);
    diffs
}

fn collect(root: &Path, proposal: &FixProposal, out: &mut Vec<FileDiff>) {
    if let Some(filepath) = &proposal.filepath {
        out.push(diff_one(root, filepath, &proposal.full_code_block));
    }
    for additional in &proposal.additional_fixes {
        collect(root, additional, out);
    }
}

fn diff_one(root: &Path, filepath: &str, new_content: &str) -> FileDiff {
    let current = std::fs::read_to_string(root.join(filepath)).unwrap_or_default();
    let diff = TextDiff::from_lines(&current, new_content);
    let diff_text = diff
        .unified_diff()
        .context_radius(CONTEXT_RADIUS)
        .header(&format!("a/{filepath}"), &format!("b/{filepath}"))
        .to_string();

    FileDiff {
        filepath: filepath.to_string(),
        diff_text,
    }
}
