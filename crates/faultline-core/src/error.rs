//! Error taxonomy surfaced to callers of the investigation and patching pipeline.
//!
//! Each variant corresponds to a distinct recovery path: some are fatal for
//! the current request, others are recorded as diagnostics and the pipeline
//! continues with degraded context.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FaultlineError {
    #[error("log is empty")]
    LogEmpty,

    #[error("language could not be detected from the log")]
    LanguageUnknown,

    #[error("failed to parse {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("path escapes project root: {0}")]
    PathEscape(String),

    #[error("size cap exceeded: {what} is {actual} bytes, limit is {limit}")]
    SizeCapExceeded {
        what: String,
        actual: usize,
        limit: usize,
    },

    #[error("upstream rate limited on model {model}")]
    UpstreamRateLimited { model: String },

    #[error("all configured (key, model) pairs failed")]
    UpstreamExhausted,

    #[error("model output was not valid JSON after one corrective retry: {0}")]
    ModelOutputInvalid(String),

    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FaultlineError>;
