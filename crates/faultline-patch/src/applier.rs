//! Applies a [`FixProposal`]'s file contents to disk: path containment,
//! a size cap, a `.bak` backup of anything overwritten, and an atomic
//! write-then-rename so a crash mid-write never leaves a half-written file
//! in place of the original.
//!
//! Diffs for every file are computed up front by the caller; application
//! itself proceeds file by file in input order and does not roll back
//! files already written if a later one fails.

use std::path::{Path, PathBuf};

use faultline_core::config::SizeCaps;
use faultline_core::error::{FaultlineError, Result};
use faultline_core::types::{AppliedFile, ApplyResult, FixProposal};

/// Applies `proposal`'s primary fix and every `additional_fixes` entry
/// against `root`, enforcing `caps.max_patch_bytes` per file.
pub fn apply_patch_set(root: &Path, proposal: &FixProposal, caps: &SizeCaps) -> ApplyResult {
    let mut files = Vec::new();
    flatten(proposal, &mut files);

    let mut applied = Vec::new();
    let mut failed = Vec::new();

    for (filepath, content) in files {
        match apply_one(root, &filepath, &content, caps) {
            Ok(backed_up) => applied.push(AppliedFile { filepath, backed_up }),
            Err(e) => {
                tracing::warn!(file = %filepath, error = %e, "failed to apply patch");
                failed.push((filepath, e.to_string()));
            }
        }
    }

    ApplyResult { applied, failed }
}

fn flatten(proposal: &FixProposal, out: &mut Vec<(String, String)>) {
    if let Some(filepath) = &proposal.filepath {
        out.push((filepath.clone(), proposal.full_code_block.clone()));
    }
    for additional in &proposal.additional_fixes {
        flatten(additional, out);
    }
}

fn apply_one(root: &Path, filepath: &str, content: &str, caps: &SizeCaps) -> Result<bool> {
    if content.len() > caps.max_patch_bytes {
        return Err(FaultlineError::SizeCapExceeded {
            what: format!("patch for {filepath}"),
            actual: content.len(),
            limit: caps.max_patch_bytes,
        });
    }

    let resolved = resolve_contained(root, filepath)?;
    write_atomically(&resolved, content)
        .map_err(|e| FaultlineError::WriteFailed { path: filepath.to_string(), reason: e.to_string() })
}

/// Joins `filepath` onto `root` and rejects anything that resolves outside
/// it, whether via an absolute path or a `..` escape.
fn resolve_contained(root: &Path, filepath: &str) -> Result<PathBuf> {
    if Path::new(filepath).is_absolute() {
        return Err(FaultlineError::PathEscape(filepath.to_string()));
    }
    let joined = normalize_lexically(&root.join(filepath));
    let root_normalized = normalize_lexically(root);
    if !joined.starts_with(&root_normalized) {
        return Err(FaultlineError::PathEscape(filepath.to_string()));
    }
    Ok(joined)
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            std::path::Component::ParentDir => {
                out.pop();
            }
            std::path::Component::CurDir => {}
            other => out.push(other),
        }
    }
    out
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_atomically(path: &Path, content: &str) -> std::io::Result<bool> {
    let backed_up = if path.is_file() {
        std::fs::copy(path, backup_path(path))?;
        true
    } else {
        false
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(backed_up)
}
