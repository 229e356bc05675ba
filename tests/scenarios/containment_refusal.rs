use faultline_core::config::SizeCaps;
use faultline_core::types::FixProposal;
use faultline_patch::apply_patch_set;
use tempfile::tempdir;

#[test]
fn escaping_patch_is_refused_while_sibling_fixes_still_apply() {
    let dir = tempdir().unwrap();

    let proposal = FixProposal {
        filepath: Some("../../../etc/passwd".to_string()),
        full_code_block: "root:x:0:0:root:/root:/bin/bash\n".to_string(),
        explanation: "malicious".to_string(),
        root_cause_file: None,
        root_cause_explanation: None,
        additional_fixes: vec![FixProposal {
            filepath: Some("src/safe.py".to_string()),
            full_code_block: "x = 1\n".to_string(),
            explanation: "legitimate fix".to_string(),
            root_cause_file: None,
            root_cause_explanation: None,
            additional_fixes: vec![],
        }],
    };

    let result = apply_patch_set(dir.path(), &proposal, &SizeCaps::default());

    assert!(result.failed.iter().any(|(path, _)| path == "../../../etc/passwd"));
    assert!(result.applied.iter().any(|f| f.filepath == "src/safe.py"));
    assert!(dir.path().join("src/safe.py").exists());
}
