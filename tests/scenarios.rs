// Integration test entry point for the end-to-end scenario tests.
#[path = "scenarios/python_index_error.rs"]
mod python_index_error;
#[path = "scenarios/go_panic.rs"]
mod go_panic;
#[path = "scenarios/cross_file_python_chain.rs"]
mod cross_file_python_chain;
#[path = "scenarios/unresolved_bare_import.rs"]
mod unresolved_bare_import;
#[path = "scenarios/quota_fallback.rs"]
mod quota_fallback;
#[path = "scenarios/containment_refusal.rs"]
mod containment_refusal;
