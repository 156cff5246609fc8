//! Compiler errors

use thiserror::Error;

use crate::model::QueryError;

/// Result type for compilation
pub type CompileResult<T> = Result<T, CompileError>;

/// A page request that cannot be turned into a statement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The request itself is invalid
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Sampling requested against a store without a stable hash function
    #[error("Random sampling is unavailable: {dialect} has no stable 64-bit hash function")]
    SamplingUnsupported { dialect: String },
}

impl CompileError {
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::Query(err) => err.code(),
            CompileError::SamplingUnsupported { .. } => "WORDS_FEATURE_UNAVAILABLE",
        }
    }
}
