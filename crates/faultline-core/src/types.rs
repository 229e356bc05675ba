//! Semantic entities shared across the investigation and patching pipeline.
//!
//! These are language-neutral records, not a record of any one parser's
//! internal representation. All entities are derived from a single
//! `(log, project_root)` pair and discarded after one analysis; nothing here
//! is meant to survive across requests.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A language family recognized by the traceback parser and parser registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
    Typescript,
    Go,
    Rust,
    Java,
    Unknown,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Typescript => "typescript",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Java => "java",
            Language::Unknown => "unknown",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Language> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Some(Language::Python),
            "javascript" | "js" => Some(Language::Javascript),
            "typescript" | "ts" => Some(Language::Typescript),
            "go" | "golang" => Some(Language::Go),
            "rust" | "rs" => Some(Language::Rust),
            "java" => Some(Language::Java),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized traceback entry. Frames are ordered oldest-caller-first
/// regardless of the source language's native ordering convention:
/// `frame[0]` is the outermost caller, `frame[-1]` is the crash site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub file: String,
    pub line: u32,
    pub column: Option<u32>,
    pub symbol: Option<String>,
    pub raw_text: String,
    /// True for frames that resolve outside the project root (stdlib,
    /// node_modules, site-packages) -- excluded from extraction but kept
    /// for the rendered prompt.
    pub external: bool,
}

/// The syntactic kind of an extracted [`Symbol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Method,
    Class,
    Struct,
    Interface,
    Impl,
    Enum,
    Constructor,
    Other,
}

/// A syntactic unit extracted from a source file: the enclosing
/// function/class/etc. around a traceback line. Symbols never overlap
/// except by containment (a method nested in a class).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub name: String,
    pub file_path: String,
    /// 1-based, inclusive.
    pub start_line: u32,
    /// 1-based, inclusive.
    pub end_line: u32,
    pub source_text: String,
}

/// Resolution confidence for an [`Import`] edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Exactly one candidate file existed.
    Certain,
    /// One of several plausible candidates was chosen.
    Heuristic,
    /// No project-local candidate could be found.
    Unresolved,
}

/// A resolved import edge: a source file's textual import statement mapped
/// to a concrete on-disk target, or `None` when unresolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Import {
    pub source_file: String,
    pub import_text: String,
    pub resolved_target: Option<String>,
    pub confidence: Confidence,
}

/// A frame paired with its enclosing symbol (if extraction succeeded) and
/// the file's resolved imports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallChainEntry {
    pub frame: Frame,
    pub symbol: Option<Symbol>,
    pub imports: Vec<Import>,
}

/// Coarse project classification used when no traceback frames are
/// available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Python,
    Node,
    Go,
    Rust,
    Java,
    Unknown,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Python => "python",
            ProjectType::Node => "node",
            ProjectType::Go => "go",
            ProjectType::Rust => "rust",
            ProjectType::Java => "java",
            ProjectType::Unknown => "unknown",
        }
    }
}

/// The result of scanning a project root when no usable traceback frames
/// were supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub root: PathBuf,
    pub project_type: ProjectType,
    pub frameworks: Vec<String>,
    pub entry_points: Vec<PathBuf>,
    pub source_files: Vec<PathBuf>,
}

/// A candidate file surfaced by the error analyzer, scored by keyword
/// overlap with the error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub score: f64,
    pub matched_keywords: Vec<String>,
}

/// Coarse classification of an error message, used to focus candidate
/// file scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Http,
    Database,
    Import,
    Runtime,
    Type,
    Other,
}

/// The LLM-produced fix, one per file plus zero or more additional fixes.
/// Additional fixes are not recursive in practice; nesting depth is one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixProposal {
    pub filepath: Option<String>,
    pub full_code_block: String,
    pub explanation: String,
    #[serde(default)]
    pub root_cause_file: Option<String>,
    #[serde(default)]
    pub root_cause_explanation: Option<String>,
    #[serde(default)]
    pub additional_fixes: Vec<FixProposal>,
}

/// Where a file read during investigation came from -- part of the audit
/// trail attached to a [`PatchSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadSource {
    Traceback,
    Import,
    Scan,
    Manual,
}

/// A single file's unified diff, computed against the live filesystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDiff {
    pub filepath: String,
    pub diff_text: String,
}

/// The normalized [`FixProposal`] plus a computed unified diff per file and
/// an audit list of files read during investigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchSet {
    pub proposal: FixProposal,
    pub diffs: Vec<FileDiff>,
    pub files_read: Vec<(String, ReadSource)>,
}

/// Outcome of applying one file from a [`PatchSet`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedFile {
    pub filepath: String,
    pub backed_up: bool,
}

/// Result of a batch patch application: diffs are computed first for all
/// files, then applied in input order. Failures do not roll back files
/// already written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResult {
    pub applied: Vec<AppliedFile>,
    pub failed: Vec<(String, String)>,
}
