//! Prompt rendering and the Gemini HTTP client: model-priority fallback,
//! API key rotation and quarantine, and response normalization into a
//! [`faultline_core::types::FixProposal`].

pub mod client;
pub mod key_pool;
pub mod normalize;
pub mod prompt;
pub mod token_budget;

pub use client::GeminiClient;
pub use prompt::build_prompt;
