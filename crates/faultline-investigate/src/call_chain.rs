//! Assembles the per-frame [`CallChainEntry`] list: each non-external frame
//! gets its enclosing symbol and that file's resolved imports attached.

use std::path::Path;

use faultline_core::types::{CallChainEntry, Frame, Language};
use faultline_parsers::import_resolver::resolve_imports;
use faultline_parsers::registry::ParserRegistry;
use faultline_parsers::treesitter::detect_language;

/// Chains longer than this are trimmed, keeping both ends: the outermost
/// caller is as useful as the crash site, and a long middle is usually the
/// least informative part of a stack.
pub const MAX_CHAIN_LENGTH: usize = 10;

/// Upstream (importer) traversal is capped to this many files.
pub const MAX_UPSTREAM_FILES: usize = 5;

/// Default BFS depth for upstream traversal.
pub const DEFAULT_UPSTREAM_DEPTH: usize = 2;

/// Builds and trims the call chain for `frames`, all relative to `root`.
/// `default_language` is used for frames whose extension doesn't map to a
/// recognized language (e.g. a file with no extension).
pub fn assemble_call_chain(
    root: &Path,
    frames: &[Frame],
    default_language: Language,
    registry: &mut ParserRegistry,
) -> Vec<CallChainEntry> {
    let mut entries = Vec::with_capacity(frames.len());

    for frame in frames {
        if frame.external {
            entries.push(CallChainEntry {
                frame: frame.clone(),
                symbol: None,
                imports: Vec::new(),
            });
            continue;
        }

        let frame_path = Path::new(&frame.file);
        let language = detect_language(frame_path).unwrap_or(default_language);

        let Ok(source) = std::fs::read_to_string(root.join(frame_path)) else {
            tracing::warn!(file = %frame.file, "could not read frame source during call chain assembly");
            entries.push(CallChainEntry {
                frame: frame.clone(),
                symbol: None,
                imports: Vec::new(),
            });
            continue;
        };

        let symbol = registry.symbol_at_line(language, frame_path, &source, frame.line);
        let imports = resolve_imports(language, root, frame_path, &source);
        entries.push(CallChainEntry {
            frame: frame.clone(),
            symbol: Some(symbol),
            imports,
        });
    }

    trim_chain(entries)
}

fn trim_chain(entries: Vec<CallChainEntry>) -> Vec<CallChainEntry> {
    if entries.len() <= MAX_CHAIN_LENGTH {
        return entries;
    }
    let head = MAX_CHAIN_LENGTH / 2;
    let tail = MAX_CHAIN_LENGTH - head;
    let mut result = entries[..head].to_vec();
    result.extend_from_slice(&entries[entries.len() - tail..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn frame(file: &str, line: u32) -> Frame {
        Frame {
            file: file.to_string(),
            line,
            column: None,
            symbol: None,
            raw_text: String::new(),
            external: false,
        }
    }

    #[test]
    fn attaches_enclosing_symbol_and_imports() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.py"), "import b\n\ndef handle():\n    return 1\n").unwrap();

        let mut registry = ParserRegistry::new();
        let chain = assemble_call_chain(root, &[frame("a.py", 4)], Language::Python, &mut registry);

        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].symbol.as_ref().unwrap().name, "handle");
        assert_eq!(chain[0].imports.len(), 1);
    }

    #[test]
    fn external_frames_get_no_symbol_lookup() {
        let dir = tempdir().unwrap();
        let mut registry = ParserRegistry::new();
        let mut external = frame("site-packages/requests/api.py", 10);
        external.external = true;
        let chain = assemble_call_chain(dir.path(), &[external], Language::Python, &mut registry);
        assert!(chain[0].symbol.is_none());
    }

    #[test]
    fn long_chain_is_trimmed_keeping_both_ends() {
        let dir = tempdir().unwrap();
        let frames: Vec<Frame> = (0..20).map(|i| frame("missing.py", i)).collect();
        let mut registry = ParserRegistry::new();
        let chain = assemble_call_chain(dir.path(), &frames, Language::Python, &mut registry);
        assert_eq!(chain.len(), MAX_CHAIN_LENGTH);
        assert_eq!(chain.first().unwrap().frame.line, 0);
        assert_eq!(chain.last().unwrap().frame.line, 19);
    }
}
