use std::fs;

use faultline_core::types::Language;
use faultline_investigate::investigate;
use tempfile::tempdir;

const LOG: &str = r#"File "main.py", line 10, in <module>
  run()
File "main.py", line 6, in run
  result = process_data(data)
File "utils.py", line 5, in process_data
  total += item.value
AttributeError: 'int' object has no attribute 'value'
"#;

const MAIN_PY: &str = r#"from utils import process_data

data = [1, 2, 3]

def run():
    result = process_data(data)
    return result

run()
"#;

const UTILS_PY: &str = r#"def process_data(items):
    total = 0
    for item in items:
        total += item.value
    return total
"#;

#[test]
fn cross_file_python_chain_finds_caller_and_upstream_import() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.py"), MAIN_PY).unwrap();
    fs::write(dir.path().join("utils.py"), UTILS_PY).unwrap();

    let parsed = faultline_parsers::traceback::parse(LOG, None);
    assert_eq!(parsed.language, Language::Python);
    assert_eq!(parsed.frames.len(), 3);
    // oldest-caller-first: <module> first, crash site (utils.py) last.
    assert_eq!(parsed.frames[2].file, "utils.py");
    assert_eq!(parsed.frames[2].line, 5);
    assert_eq!(parsed.frames[1].symbol.as_deref(), Some("run"));

    let context = investigate(
        dir.path(),
        &parsed.frames,
        parsed.language,
        parsed.error_message.as_deref(),
        &faultline_core::config::SizeCaps::default(),
    );

    assert_eq!(context.call_chain.len(), 3);
    let crash_entry = &context.call_chain[2];
    assert_eq!(crash_entry.frame.file, "utils.py");
    assert!(crash_entry.symbol.as_ref().is_some_and(|s| s.name == "process_data"));

    // main.py imports utils.py -- it should surface as upstream context of
    // the crash site so the model sees both the call site and the import edge.
    assert!(context.upstream.iter().any(|u| u.path.ends_with("main.py")));
}
