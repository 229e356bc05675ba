use std::fs;

use faultline_core::types::Language;
use faultline_investigate::investigate;
use tempfile::tempdir;

const LOG: &str = "panic: runtime error: index out of range [5] with length 3\ngoroutine 1 [running]:\nmain.processData(...)\n\tmain.go:25 +0x1f\n";

fn source_with_crash_at_line_25() -> String {
    let mut lines = vec!["package main".to_string()];
    lines.extend(vec!["// padding".to_string(); 18]); // lines 2..=19
    lines.push("func processData(items []int) int {".to_string()); // 20
    lines.push("    if len(items) == 0 {".to_string()); // 21
    lines.push("        return 0".to_string()); // 22
    lines.push("    }".to_string()); // 23
    lines.push("    idx := 5".to_string()); // 24
    lines.push("    return items[idx]".to_string()); // 25 -- the panic line
    lines.push("}".to_string()); // 26
    lines.push("".to_string()); // 27
    lines.push("func main() {".to_string()); // 28
    lines.push("    processData([]int{1, 2, 3})".to_string()); // 29
    lines.push("}".to_string()); // 30
    lines.join("\n") + "\n"
}

#[test]
fn go_panic_resolves_language_and_enclosing_function() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.go"), source_with_crash_at_line_25()).unwrap();

    let parsed = faultline_parsers::traceback::parse(LOG, None);
    assert_eq!(parsed.language, Language::Go);
    assert_eq!(parsed.frames.len(), 1);
    assert_eq!(parsed.frames[0].file, "main.go");
    assert_eq!(parsed.frames[0].line, 25);
    assert_eq!(parsed.frames[0].symbol.as_deref(), Some("main.processData(...)"));

    let context = investigate(
        dir.path(),
        &parsed.frames,
        parsed.language,
        parsed.error_message.as_deref(),
        &faultline_core::config::SizeCaps::default(),
    );
    assert_eq!(context.call_chain.len(), 1);
    let symbol = context.call_chain[0].symbol.as_ref().expect("tree-sitter should extract the enclosing function");
    assert_eq!(symbol.name, "processData");
}
