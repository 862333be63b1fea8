//! Error types for the umber pipeline

use thiserror::Error;

/// The main error type for umber operations.
///
/// Decode-level errors (`MalformedChunk`, `SkeletonStructure`) and
/// `Assembly` errors abort only the build-plan entry that raised them;
/// `GraphValidation` aborts the whole run before any file is read.
#[derive(Debug, Error)]
pub enum UmberError {
    #[error("malformed chunk '{chunk}': {detail}")]
    MalformedChunk { chunk: String, detail: String },

    #[error("skeleton structure error: {0}")]
    SkeletonStructure(String),

    #[error("graph validation error: {0}")]
    GraphValidation(String),

    #[error("assembly error: {0}")]
    Assembly(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl UmberError {
    /// Shorthand for a `MalformedChunk` error
    pub fn malformed(chunk: &str, detail: impl Into<String>) -> Self {
        UmberError::MalformedChunk {
            chunk: chunk.to_string(),
            detail: detail.into(),
        }
    }
}

/// Result type alias for umber operations
pub type Result<T> = std::result::Result<T, UmberError>;
