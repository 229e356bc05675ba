use faultline_core::types::{Confidence, Language};
use faultline_parsers::import_resolver::resolve_imports;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn bare_node_modules_import_is_unresolved_without_panicking() {
    let dir = tempdir().unwrap();
    let source = "const _ = require('lodash');\n";

    let imports = resolve_imports(Language::Javascript, dir.path(), Path::new("index.js"), source);

    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].confidence, Confidence::Unresolved);
    assert!(imports[0].resolved_target.is_none());
}
