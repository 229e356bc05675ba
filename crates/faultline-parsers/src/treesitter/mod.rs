//! Tree-sitter backed symbol extraction for the non-native languages
//! (JavaScript, TypeScript, Go, Rust, Java).

use std::path::Path;

use faultline_core::types::{Language, Symbol, SymbolKind};
use streaming_iterator::StreamingIterator;
use tree_sitter::{Language as TsLanguage, Parser, Query, QueryCursor};

use crate::queries;

pub struct TreeSitterExtractor {
    parser: Parser,
}

impl TreeSitterExtractor {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Extracts all symbols defined in `source`. Returns an empty vector --
    /// never panics -- if the language is unsupported, the grammar can't be
    /// loaded, the query fails to compile, or the source fails to parse.
    pub fn extract(&mut self, language: Language, path: &Path, source: &str) -> Vec<Symbol> {
        let Some((ts_lang, lang_name)) = ts_language(language) else {
            return Vec::new();
        };
        if let Err(e) = self.parser.set_language(&ts_lang) {
            tracing::warn!(path = %path.display(), error = %e, "failed to set tree-sitter language");
            return Vec::new();
        }
        let Some(tree) = self.parser.parse(source.as_bytes(), None) else {
            tracing::warn!(path = %path.display(), "tree-sitter parse failed");
            return Vec::new();
        };
        let query = match queries::query_for_language(&ts_lang, lang_name) {
            Ok(q) => q,
            Err(e) => {
                tracing::warn!(lang = lang_name, error = %e, "failed to compile tree-sitter query");
                return Vec::new();
            }
        };
        extract_symbols(&query, tree.root_node(), source.as_bytes(), path)
    }
}

impl Default for TreeSitterExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn ts_language(language: Language) -> Option<(TsLanguage, &'static str)> {
    match language {
        Language::Javascript => Some((tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(), "javascript")),
        Language::Typescript => Some((tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(), "typescript")),
        Language::Go => Some((tree_sitter_go::LANGUAGE.into(), "go")),
        Language::Rust => Some((tree_sitter_rust::LANGUAGE.into(), "rust")),
        Language::Java => Some((tree_sitter_java::LANGUAGE.into(), "java")),
        Language::Python | Language::Unknown => None,
    }
}

fn node_text(node: tree_sitter::Node<'_>, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or("").to_string()
}

fn extract_symbols(
    query: &Query,
    root: tree_sitter::Node<'_>,
    source: &[u8],
    path: &Path,
) -> Vec<Symbol> {
    let mut cursor = QueryCursor::new();
    let capture_names = query.capture_names();
    let mut matches = cursor.matches(query, root, source);
    let file_path = path.to_string_lossy().to_string();
    let mut symbols = Vec::new();

    while let Some(m) = matches.next() {
        let mut name = None;
        let mut kind = None;
        let mut start_line = 0u32;
        let mut end_line = 0u32;
        let mut source_text = String::new();

        for cap in m.captures {
            match capture_names[cap.index as usize] {
                "def.func.name" => {
                    name = Some(node_text(cap.node, source));
                    kind = Some(SymbolKind::Function);
                }
                "def.method.name" => {
                    name = Some(node_text(cap.node, source));
                    kind = Some(SymbolKind::Method);
                }
                "def.constructor.name" => {
                    name = Some(node_text(cap.node, source));
                    kind = Some(SymbolKind::Constructor);
                }
                "def.class.name" => {
                    name = Some(node_text(cap.node, source));
                    kind = Some(SymbolKind::Class);
                }
                "def.struct.name" => {
                    name = Some(node_text(cap.node, source));
                    kind = Some(SymbolKind::Struct);
                }
                "def.enum.name" => {
                    name = Some(node_text(cap.node, source));
                    kind = Some(SymbolKind::Enum);
                }
                "def.impl.type" => {
                    name = Some(node_text(cap.node, source));
                    kind = Some(SymbolKind::Impl);
                }
                "def.mod.name" => {
                    name = Some(node_text(cap.node, source));
                    kind = Some(SymbolKind::Other);
                }
                "def.func" | "def.method" | "def.constructor" | "def.class" | "def.struct"
                | "def.enum" | "def.impl" | "def.mod" => {
                    start_line = cap.node.start_position().row as u32 + 1;
                    end_line = cap.node.end_position().row as u32 + 1;
                    source_text = node_text(cap.node, source);
                }
                _ => {}
            }
        }

        if let (Some(n), Some(k)) = (name, kind) {
            symbols.push(Symbol {
                kind: k,
                name: n,
                file_path: file_path.clone(),
                start_line,
                end_line,
                source_text,
            });
        }
    }

    // A class and its inner methods can each match their own pattern as well
    // as a shared outer one; identical name+start pairs are the same node.
    symbols.dedup_by(|a, b| a.name == b.name && a.start_line == b.start_line);
    symbols
}

/// Maps a file extension to the language family used for extension-only
/// language detection (the traceback parser prefers the language inferred
/// from the frame text itself; this is the fallback).
pub fn detect_language(path: &Path) -> Option<Language> {
    match path.extension()?.to_str()? {
        "ts" | "tsx" => Some(Language::Typescript),
        "js" | "mjs" | "cjs" | "jsx" => Some(Language::Javascript),
        "py" | "pyi" => Some(Language::Python),
        "go" => Some(Language::Go),
        "rs" => Some(Language::Rust),
        "java" => Some(Language::Java),
        _ => None,
    }
}
