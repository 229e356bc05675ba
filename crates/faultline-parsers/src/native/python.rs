//! Python symbol extraction via `rustpython-parser`'s native AST, rather
//! than a tree-sitter grammar -- Python is the one language in the
//! recognized set whose own ecosystem ships a first-class Rust AST.

use std::path::Path;

use faultline_core::types::{Symbol, SymbolKind};
use rustpython_ast::{self as ast, Ranged, Stmt};
use rustpython_parser::Parse;

/// Extracts top-level and nested function/class definitions. Returns an
/// empty vector -- never panics -- on a syntax error; the caller falls back
/// to a synthetic window symbol in that case.
pub fn extract_python_symbols(path: &Path, source: &str) -> Vec<Symbol> {
    let path_str = path.to_string_lossy().to_string();
    let suite = match ast::Suite::parse(source, &path_str) {
        Ok(suite) => suite,
        Err(e) => {
            tracing::warn!(path = %path_str, error = %e, "python AST parse failed");
            return Vec::new();
        }
    };

    let mut symbols = Vec::new();
    walk(&suite, source, &path_str, false, &mut symbols);
    symbols
}

fn walk(stmts: &[Stmt], source: &str, path: &str, in_class: bool, out: &mut Vec<Symbol>) {
    for stmt in stmts {
        match stmt {
            Stmt::FunctionDef(f) => {
                let kind = if in_class { SymbolKind::Method } else { SymbolKind::Function };
                push_symbol(out, kind, f.name.as_str(), stmt, source, path);
                walk(&f.body, source, path, false, out);
            }
            Stmt::AsyncFunctionDef(f) => {
                let kind = if in_class { SymbolKind::Method } else { SymbolKind::Function };
                push_symbol(out, kind, f.name.as_str(), stmt, source, path);
                walk(&f.body, source, path, false, out);
            }
            Stmt::ClassDef(c) => {
                push_symbol(out, SymbolKind::Class, c.name.as_str(), stmt, source, path);
                walk(&c.body, source, path, true, out);
            }
            _ => {}
        }
    }
}

fn push_symbol(
    out: &mut Vec<Symbol>,
    kind: SymbolKind,
    name: &str,
    node: &Stmt,
    source: &str,
    path: &str,
) {
    let range = node.range();
    let start_byte = u32::from(range.start()) as usize;
    let end_byte = (u32::from(range.end()) as usize).min(source.len());
    let source_text = source.get(start_byte..end_byte).unwrap_or("").to_string();

    out.push(Symbol {
        kind,
        name: name.to_string(),
        file_path: path.to_string(),
        start_line: line_of(source, start_byte),
        end_line: line_of(source, end_byte),
        source_text,
    });
}

/// 1-based line number containing the given byte offset.
fn line_of(source: &str, offset: usize) -> u32 {
    let offset = offset.min(source.len());
    source.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn extracts_top_level_function() {
        let source = "def handle(request):\n    return request.user\n";
        let symbols = extract_python_symbols(&PathBuf::from("views.py"), source);
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "handle");
        assert_eq!(symbols[0].kind, SymbolKind::Function);
        assert_eq!(symbols[0].start_line, 1);
    }

    #[test]
    fn nested_method_is_tagged_method_not_function() {
        let source = "class Worker:\n    def run(self):\n        pass\n";
        let symbols = extract_python_symbols(&PathBuf::from("worker.py"), source);
        let class = symbols.iter().find(|s| s.name == "Worker").unwrap();
        let method = symbols.iter().find(|s| s.name == "run").unwrap();
        assert_eq!(class.kind, SymbolKind::Class);
        assert_eq!(method.kind, SymbolKind::Method);
        assert!(class.start_line <= method.start_line);
        assert!(class.end_line >= method.end_line);
    }

    #[test]
    fn syntax_error_yields_empty_list_not_panic() {
        let symbols = extract_python_symbols(&PathBuf::from("broken.py"), "def (:\n");
        assert!(symbols.is_empty());
    }
}
