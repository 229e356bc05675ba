//! Dispatches symbol extraction to the right backend per language and picks
//! the symbol that best encloses a given traceback line.

use std::path::Path;

use faultline_core::types::{Language, Symbol, SymbolKind};

use crate::native::python::extract_python_symbols;
use crate::treesitter::TreeSitterExtractor;

/// Window applied around a line when no enclosing symbol was found, either
/// because extraction failed or because the line sits at module scope.
const FALLBACK_WINDOW_LINES: u32 = 50;

pub struct ParserRegistry {
    treesitter: TreeSitterExtractor,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self {
            treesitter: TreeSitterExtractor::new(),
        }
    }

    /// Extracts every symbol defined in `source`.
    pub fn extract_all(&mut self, language: Language, path: &Path, source: &str) -> Vec<Symbol> {
        match language {
            Language::Python => extract_python_symbols(path, source),
            Language::Javascript | Language::Typescript | Language::Go | Language::Rust | Language::Java => {
                self.treesitter.extract(language, path, source)
            }
            Language::Unknown => Vec::new(),
        }
    }

    /// Returns the symbol that best encloses `line`: the smallest span
    /// containing it, breaking ties in favor of the symbol that starts
    /// latest (the more deeply nested one). Falls back to a synthetic
    /// `+/-50` line window of kind [`SymbolKind::Other`] when nothing
    /// encloses the line, including when extraction itself failed.
    pub fn symbol_at_line(&mut self, language: Language, path: &Path, source: &str, line: u32) -> Symbol {
        let symbols = self.extract_all(language, path, source);
        best_enclosing(&symbols, line).unwrap_or_else(|| fallback_symbol(path, source, line))
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn best_enclosing(symbols: &[Symbol], line: u32) -> Option<Symbol> {
    symbols
        .iter()
        .filter(|s| s.start_line <= line && line <= s.end_line)
        .min_by_key(|s| (s.end_line - s.start_line, std::cmp::Reverse(s.start_line)))
        .cloned()
}

fn fallback_symbol(path: &Path, source: &str, line: u32) -> Symbol {
    let total_lines = source.lines().count().max(1) as u32;
    let start_line = line.saturating_sub(FALLBACK_WINDOW_LINES).max(1);
    let end_line = (line + FALLBACK_WINDOW_LINES).min(total_lines);

    let source_text = source
        .lines()
        .enumerate()
        .filter_map(|(i, l)| {
            let lineno = i as u32 + 1;
            (lineno >= start_line && lineno <= end_line).then_some(l)
        })
        .collect::<Vec<_>>()
        .join("\n");

    Symbol {
        kind: SymbolKind::Other,
        name: path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string()),
        file_path: path.to_string_lossy().to_string(),
        start_line,
        end_line,
        source_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn picks_innermost_symbol_on_nested_match() {
        let source = "class Worker:\n    def run(self):\n        raise ValueError('boom')\n";
        let mut registry = ParserRegistry::new();
        let symbol = registry.symbol_at_line(Language::Python, &PathBuf::from("worker.py"), source, 3);
        assert_eq!(symbol.name, "run");
        assert_eq!(symbol.kind, SymbolKind::Method);
    }

    #[test]
    fn falls_back_to_window_when_nothing_encloses_line() {
        let source = (1..=200)
            .map(|i| format!("x{i} = {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let mut registry = ParserRegistry::new();
        let symbol = registry.symbol_at_line(Language::Python, &PathBuf::from("consts.py"), &source, 100);
        assert_eq!(symbol.kind, SymbolKind::Other);
        assert_eq!(symbol.start_line, 50);
        assert_eq!(symbol.end_line, 150);
    }

    #[test]
    fn unknown_language_falls_back_without_panicking() {
        let source = "irrelevant content\n";
        let mut registry = ParserRegistry::new();
        let symbol = registry.symbol_at_line(Language::Unknown, &PathBuf::from("data.txt"), source, 1);
        assert_eq!(symbol.kind, SymbolKind::Other);
    }
}
