//! Unified diff computation and safe, atomic application of an LLM's
//! [`faultline_core::types::FixProposal`] to the project's working tree.

pub mod applier;
pub mod diff;

pub use applier::apply_patch_set;
pub use diff::compute_diffs;
