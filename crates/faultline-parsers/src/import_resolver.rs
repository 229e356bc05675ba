//! Per-language import statement extraction and on-disk resolution.
//!
//! Each language has its own notion of what an import "points at" --
//! Python's dotted module paths, Rust's `crate`/`super`/`self` paths, Go's
//! import-path-as-directory convention, Java's package-as-directory
//! convention, and JS/TS's relative-or-bare specifiers. Resolution never
//! touches the network or a package manager: it only looks for files that
//! already exist under the project root.

use std::path::{Path, PathBuf};

use faultline_core::types::{Confidence, Import, Language};
use regex::Regex;
use std::sync::OnceLock;

/// Extracts and resolves every import statement in `source`, which lives at
/// `file_path` (relative to `root`).
pub fn resolve_imports(language: Language, root: &Path, file_path: &Path, source: &str) -> Vec<Import> {
    let raw = match language {
        Language::Python => extract_python(source),
        Language::Javascript | Language::Typescript => extract_js(source),
        Language::Go => extract_go(source),
        Language::Rust => extract_rust(source),
        Language::Java => extract_java(source),
        Language::Unknown => Vec::new(),
    };

    raw.into_iter()
        .map(|text| resolve_one(language, root, file_path, &text))
        .collect()
}

fn resolve_one(language: Language, root: &Path, file_path: &Path, import_text: &str) -> Import {
    let candidates = match language {
        Language::Python => python_candidates(root, file_path, import_text),
        Language::Javascript | Language::Typescript => js_candidates(root, file_path, import_text),
        Language::Go => go_candidates(root, import_text),
        Language::Rust => rust_candidates(root, file_path, import_text),
        Language::Java => java_candidates(root, import_text),
        Language::Unknown => Vec::new(),
    };

    let existing: Vec<PathBuf> = candidates.into_iter().filter(|p| p.is_file()).collect();
    let (resolved_target, confidence) = match existing.len() {
        0 => (None, Confidence::Unresolved),
        1 => (
            Some(existing[0].to_string_lossy().to_string()),
            Confidence::Certain,
        ),
        _ => (
            Some(existing[0].to_string_lossy().to_string()),
            Confidence::Heuristic,
        ),
    };

    Import {
        source_file: file_path.to_string_lossy().to_string(),
        import_text: import_text.to_string(),
        resolved_target,
        confidence,
    }
}

// --- extraction ---------------------------------------------------------

fn python_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:from\s+([.\w]+)\s+import\s+[\w, *()\n]+|import\s+([.\w, ]+))").unwrap()
    })
}

fn extract_python(source: &str) -> Vec<String> {
    python_re()
        .captures_iter(source)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)))
        .flat_map(|m| m.as_str().split(',').map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .collect()
}

fn js_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?:import\s+(?:[^'"]*\sfrom\s+)?|require\()\s*['"]([^'"]+)['"]"#).unwrap()
    })
}

fn extract_js(source: &str) -> Vec<String> {
    js_re()
        .captures_iter(source)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

fn go_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""([\w./\-]+)""#).unwrap())
}

fn extract_go(source: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut in_block = false;
    for line in source.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("import ") {
            if rest.trim_start().starts_with('(') {
                in_block = true;
                continue;
            }
            if let Some(cap) = go_re().captures(rest) {
                out.push(cap[1].to_string());
            }
            continue;
        }
        if in_block {
            if trimmed.starts_with(')') {
                in_block = false;
                continue;
            }
            if let Some(cap) = go_re().captures(trimmed) {
                out.push(cap[1].to_string());
            }
        }
    }
    out
}

fn rust_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*use\s+([\w:{}, *]+?)\s*;").unwrap())
}

fn extract_rust(source: &str) -> Vec<String> {
    rust_re()
        .captures_iter(source)
        .map(|c| c[1].trim().to_string())
        .collect()
}

fn java_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*import\s+(?:static\s+)?([\w.]+(?:\.\*)?)\s*;").unwrap())
}

fn extract_java(source: &str) -> Vec<String> {
    java_re().captures_iter(source).map(|c| c[1].to_string()).collect()
}

// --- resolution ----------------------------------------------------------

fn python_candidates(root: &Path, file_path: &Path, import_text: &str) -> Vec<PathBuf> {
    let leading_dots = import_text.chars().take_while(|&c| c == '.').count();
    let rest = &import_text[leading_dots..];
    let segments: Vec<&str> = rest.split('.').filter(|s| !s.is_empty()).collect();

    let base = if leading_dots > 0 {
        let mut dir = file_path.parent().unwrap_or(Path::new("")).to_path_buf();
        for _ in 1..leading_dots {
            dir = dir.parent().unwrap_or(Path::new("")).to_path_buf();
        }
        root.join(dir)
    } else {
        root.to_path_buf()
    };

    let module_path = segments.iter().fold(base.clone(), |acc, seg| acc.join(seg));
    vec![
        module_path.with_extension("py"),
        module_path.join("__init__.py"),
    ]
}

fn js_candidates(root: &Path, file_path: &Path, import_text: &str) -> Vec<PathBuf> {
    if !(import_text.starts_with('.') || import_text.starts_with('/')) {
        return Vec::new();
    }
    let base = if import_text.starts_with('/') {
        root.to_path_buf()
    } else {
        file_path.parent().unwrap_or(Path::new("")).to_path_buf()
    };
    let joined = root.join(normalize(&base.join(import_text.trim_start_matches('/'))));
    let exts = ["ts", "tsx", "js", "jsx", "mjs", "json"];
    let mut out: Vec<PathBuf> = exts.iter().map(|e| joined.with_extension(e)).collect();
    out.extend(exts.iter().map(|e| joined.join(format!("index.{e}"))));
    out.push(joined);
    out
}

fn go_candidates(root: &Path, import_text: &str) -> Vec<PathBuf> {
    // Only the last path segment is used to probe a project-local package
    // directory; third-party module paths (anything with a dotted host,
    // e.g. "github.com/...") are left unresolved.
    if import_text.splitn(2, '/').next().is_some_and(|h| h.contains('.')) {
        return Vec::new();
    }
    vec![root.join(import_text)]
}

fn rust_candidates(root: &Path, file_path: &Path, import_text: &str) -> Vec<PathBuf> {
    let path_part = import_text.split("::{").next().unwrap_or(import_text);
    let segments: Vec<&str> = path_part.split("::").filter(|s| !s.is_empty()).collect();
    let Some((&head, tail)) = segments.split_first() else {
        return Vec::new();
    };

    let base = match head {
        "crate" => root.join("src"),
        "self" => file_path.parent().unwrap_or(Path::new("")).to_path_buf(),
        "super" => file_path
            .parent()
            .and_then(Path::parent)
            .unwrap_or(Path::new(""))
            .to_path_buf(),
        _ => return Vec::new(), // external crate
    };

    let full_path = tail.iter().fold(base.clone(), |acc, seg| acc.join(seg));
    let mut candidates = vec![full_path.with_extension("rs"), full_path.join("mod.rs")];

    // The last segment of a `use` path is often the imported item, not a
    // module file -- also try the path with that segment dropped.
    if tail.len() > 1 {
        let module_path = tail[..tail.len() - 1].iter().fold(base, |acc, seg| acc.join(seg));
        candidates.push(module_path.with_extension("rs"));
        candidates.push(module_path.join("mod.rs"));
    }
    candidates
}

fn java_candidates(root: &Path, import_text: &str) -> Vec<PathBuf> {
    let text = import_text.trim_end_matches(".*");
    let rel: PathBuf = text.split('.').collect();
    vec![
        root.join("src/main/java").join(&rel).with_extension("java"),
        root.join(&rel).with_extension("java"),
    ]
}

fn normalize(path: &Path) -> PathBuf {
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
