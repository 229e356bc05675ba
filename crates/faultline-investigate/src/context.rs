//! Orchestrates the parser registry, dependency graph, and error analyzer
//! into one [`InvestigationContext`] per request.

use std::path::Path;

use faultline_core::config::SizeCaps;
use faultline_core::types::{CallChainEntry, CandidateFile, Frame, Language, ProjectDescriptor, ReadSource};
use faultline_parsers::dependency_graph::DependencyGraph;
use faultline_parsers::registry::ParserRegistry;
use faultline_parsers::scanner;

use crate::call_chain::{assemble_call_chain, DEFAULT_UPSTREAM_DEPTH, MAX_UPSTREAM_FILES};
use crate::error_analyzer::find_candidate_files;

/// A project-local file pulled in via the dependency graph because it
/// imports the crash-site file.
#[derive(Debug, Clone)]
pub struct UpstreamFile {
    pub path: String,
    pub excerpt: String,
}

/// Everything the prompt builder needs, gathered from one `(log,
/// project_root)` pair.
#[derive(Debug, Clone, Default)]
pub struct InvestigationContext {
    pub call_chain: Vec<CallChainEntry>,
    pub upstream: Vec<UpstreamFile>,
    pub project: Option<ProjectDescriptor>,
    pub candidate_files: Vec<CandidateFile>,
    /// Audit trail of every file read while building this context, tagged
    /// with why it was read.
    pub files_read: Vec<(String, ReadSource)>,
}

/// Excerpt length taken from each upstream file -- enough to show imports
/// and top-level declarations without pulling the whole file into the
/// prompt budget.
const UPSTREAM_EXCERPT_LINES: usize = 40;

/// Builds the investigation context. When `frames` is empty (a log with no
/// recognizable traceback), falls back to a project scan plus
/// keyword-scored candidate files instead of a call chain.
pub fn investigate(
    root: &Path,
    frames: &[Frame],
    language: Language,
    error_message: Option<&str>,
    caps: &SizeCaps,
) -> InvestigationContext {
    if frames.is_empty() {
        let project = scanner::scan_project(root, caps);
        let candidate_files = error_message
            .map(|msg| find_candidate_files(&project, msg))
            .unwrap_or_default();
        return InvestigationContext {
            project: Some(project),
            candidate_files,
            ..Default::default()
        };
    }

    let mut registry = ParserRegistry::new();
    let call_chain = assemble_call_chain(root, frames, language, &mut registry);

    let crash_site = call_chain.iter().rev().find(|entry| !entry.frame.external);
    let upstream = crash_site
        .map(|entry| gather_upstream(root, &entry.frame))
        .unwrap_or_default();

    let mut files_read: Vec<(String, ReadSource)> = call_chain
        .iter()
        .filter(|entry| !entry.frame.external && entry.symbol.is_some())
        .map(|entry| (entry.frame.file.clone(), ReadSource::Traceback))
        .collect();
    files_read.extend(upstream.iter().map(|u| (u.path.clone(), ReadSource::Import)));
    files_read.dedup_by(|a, b| a.0 == b.0);

    InvestigationContext {
        call_chain,
        upstream,
        project: None,
        candidate_files: Vec::new(),
        files_read,
    }
}

fn gather_upstream(root: &Path, crash_frame: &Frame) -> Vec<UpstreamFile> {
    let mut graph = DependencyGraph::new(root);

    // `upstream()` only ever resolves the file it's asked about, so without
    // priming the graph first it could never discover an importer it
    // hasn't already touched. Resolve every project file's own imports
    // up front so incoming edges exist before the upstream walk.
    for entry in faultline_parsers::walker::walk(root) {
        if let Ok(rel) = entry.path.strip_prefix(root) {
            graph.downstream(rel, 0);
        }
    }

    graph
        .upstream(Path::new(&crash_frame.file), DEFAULT_UPSTREAM_DEPTH)
        .into_iter()
        .take(MAX_UPSTREAM_FILES)
        .filter_map(|path| {
            let source = std::fs::read_to_string(root.join(&path)).ok()?;
            let excerpt = source.lines().take(UPSTREAM_EXCERPT_LINES).collect::<Vec<_>>().join("\n");
            Some(UpstreamFile {
                path: path.to_string_lossy().to_string(),
                excerpt,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn falls_back_to_project_scan_when_no_frames() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("requirements.txt"), "flask\n").unwrap();
        let ctx = investigate(dir.path(), &[], Language::Python, Some("flask error"), &SizeCaps::default());
        assert!(ctx.call_chain.is_empty());
        assert!(ctx.project.is_some());
    }

    #[test]
    fn builds_call_chain_and_upstream_when_frames_present() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("caller.py"), "import callee\n").unwrap();
        fs::write(root.join("callee.py"), "def handle():\n    return 1 / 0\n").unwrap();

        let frame = Frame {
            file: "callee.py".to_string(),
            line: 2,
            column: None,
            symbol: None,
            raw_text: String::new(),
            external: false,
        };
        let ctx = investigate(root, &[frame], Language::Python, Some("ZeroDivisionError"), &SizeCaps::default());
        assert_eq!(ctx.call_chain.len(), 1);
        assert!(ctx.upstream.iter().any(|u| u.path.ends_with("caller.py")));
    }
}
