//! Gitignore-respecting project file walker.

use std::path::{Path, PathBuf};

use faultline_core::types::Language;
use ignore::WalkBuilder;

use crate::treesitter::detect_language;

pub struct WalkEntry {
    pub path: PathBuf,
    pub language: Language,
}

/// Walks `root`, returning every recognized source file. Respects
/// `.gitignore`, global git excludes, and hidden-file conventions; does not
/// impose a file count cap -- callers that need one (the project scanner)
/// enforce it themselves so the cap is visible in one place.
pub fn walk(root: &Path) -> Vec<WalkEntry> {
    let mut entries = Vec::new();

    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .build();

    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(_) => continue,
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.into_path();
        if let Some(language) = detect_language(&path) {
            entries.push(WalkEntry { path, language });
        }
    }

    entries
}
