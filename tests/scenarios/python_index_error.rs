use std::fs;

use faultline_core::types::Language;
use faultline_investigate::investigate;
use tempfile::tempdir;

const LOG: &str = r#"Traceback (most recent call last):
  File "src/main.py", line 42, in process_data
    return items[index]
IndexError: list index out of range
"#;

fn process_data_source() -> String {
    let mut lines = vec!["# header".to_string(); 37];
    lines.push("def process_data(items, index):".to_string()); // 38
    lines.push("    if not items:".to_string()); // 39
    lines.push("        return None".to_string()); // 40
    lines.push("    index = index % len(items)".to_string()); // 41
    lines.push("    return items[index]".to_string()); // 42 -- the crash line
    lines.push("    total = 0".to_string()); // 43
    lines.push("    for i in range(index):".to_string()); // 44
    lines.push("        total += items[i]".to_string()); // 45
    lines.push("        if total > 100:".to_string()); // 46
    lines.push("            break".to_string()); // 47
    lines.push("def other():".to_string()); // 48
    lines.push("    pass".to_string()); // 49
    lines.join("\n") + "\n"
}

#[test]
fn python_index_error_resolves_enclosing_function() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/main.py"), process_data_source()).unwrap();

    let parsed = faultline_parsers::traceback::parse(LOG, None);
    assert_eq!(parsed.language, Language::Python);
    assert_eq!(parsed.frames.len(), 1);
    assert_eq!(parsed.frames[0].line, 42);
    assert_eq!(parsed.error_message.as_deref(), Some("IndexError: list index out of range"));

    let context = investigate(
        dir.path(),
        &parsed.frames,
        parsed.language,
        parsed.error_message.as_deref(),
        &faultline_core::config::SizeCaps::default(),
    );

    assert_eq!(context.call_chain.len(), 1);
    let symbol = context.call_chain[0].symbol.as_ref().expect("symbol should be extracted");
    assert_eq!(symbol.name, "process_data");
    assert_eq!(symbol.start_line, 38);
    assert_eq!(symbol.end_line, 47);
    assert!(symbol.source_text.contains("return items[index]"));
}
