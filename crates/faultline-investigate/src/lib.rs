//! Turns a parsed traceback (or, failing that, a bare project tree) into
//! the structured context the prompt builder renders for the model.

pub mod call_chain;
pub mod context;
pub mod error_analyzer;

pub use context::{investigate, InvestigationContext, UpstreamFile};
