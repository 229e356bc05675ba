//! Tree-sitter query sources, one per non-native language, loaded and
//! compiled once per language and cached in the parser registry.

use tree_sitter::{Language, Query};

pub const TYPESCRIPT_QUERIES: &str = include_str!("typescript.scm");
pub const GO_QUERIES: &str = include_str!("go.scm");
pub const RUST_QUERIES: &str = include_str!("rust.scm");
pub const JAVA_QUERIES: &str = include_str!("java.scm");

/// Compiles the tree-sitter query source for the given language name.
pub fn query_for_language(lang: &Language, lang_name: &str) -> Result<Query, String> {
    let source = match lang_name {
        "typescript" | "tsx" | "javascript" => TYPESCRIPT_QUERIES,
        "go" => GO_QUERIES,
        "rust" => RUST_QUERIES,
        "java" => JAVA_QUERIES,
        other => return Err(format!("unsupported language: {other}")),
    };
    Query::new(lang, source).map_err(|e| format!("query compilation error for {lang_name}: {e}"))
}
