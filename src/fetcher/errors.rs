//! Page fetch errors
//!
//! Every failure below the query model surfaces here, typed by who can act
//! on it: the caller (bad input), the operator (missing feature), the
//! deployment (store trouble, retryable) or the data owner (corrupt rows).

use thiserror::Error;

use crate::compiler::CompileError;
use crate::model::QueryError;
use crate::store::StoreError;

/// Result type for page fetches
pub type FetchResult<T> = Result<T, FetchError>;

/// Who a failure is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was malformed; do not retry unchanged
    ClientInput,
    /// The store cannot serve this kind of request
    FeatureUnavailable,
    /// The store failed; the same request may succeed later
    Infrastructure,
    /// Stored data violates the catalog invariants
    DataIntegrity,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Feature unavailable: {0}")]
    Unsupported(String),

    #[error("Word store error: {0}")]
    Store(StoreError),

    #[error("Row {row} could not be decoded: {message}")]
    Decode { row: usize, message: String },
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Query(_) => ErrorKind::ClientInput,
            FetchError::Unsupported(_) => ErrorKind::FeatureUnavailable,
            FetchError::Store(_) => ErrorKind::Infrastructure,
            FetchError::Decode { .. } => ErrorKind::DataIntegrity,
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            FetchError::Query(err) => err.code(),
            FetchError::Unsupported(_) => "WORDS_FEATURE_UNAVAILABLE",
            FetchError::Store(StoreError::Timeout) => "WORDS_STORE_TIMEOUT",
            FetchError::Store(_) => "WORDS_STORE_UNAVAILABLE",
            FetchError::Decode { .. } => "WORDS_ROW_DECODE",
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Infrastructure
    }
}

impl From<CompileError> for FetchError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::Query(err) => FetchError::Query(err),
            unsupported @ CompileError::SamplingUnsupported { .. } => {
                FetchError::Unsupported(unsupported.to_string())
            }
        }
    }
}

impl From<StoreError> for FetchError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Decode {
                row,
                column,
                message,
            } => FetchError::Decode {
                row,
                message: format!("column {}: {}", column, message),
            },
            other => FetchError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_decode_becomes_data_integrity() {
        let err = FetchError::from(StoreError::Decode {
            row: 4,
            column: 2,
            message: "unexpected real value 1.5".into(),
        });
        assert_eq!(
            err,
            FetchError::Decode {
                row: 4,
                message: "column 2: unexpected real value 1.5".into()
            }
        );

        let err = FetchError::from(StoreError::Connection("refused".into()));
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
        assert_eq!(err.code(), "WORDS_STORE_UNAVAILABLE");
    }

    #[test]
    fn test_kinds_and_codes() {
        let err = FetchError::from(QueryError::UnknownField("x".into()));
        assert_eq!(err.kind(), ErrorKind::ClientInput);
        assert_eq!(err.code(), "WORDS_UNKNOWN_FIELD");
        assert!(!err.is_retryable());

        let err = FetchError::from(CompileError::SamplingUnsupported {
            dialect: "postgres".into(),
        });
        assert_eq!(err.kind(), ErrorKind::FeatureUnavailable);
        assert!(err.to_string().contains("postgres"));

        let err = FetchError::Store(StoreError::Timeout);
        assert_eq!(err.code(), "WORDS_STORE_TIMEOUT");
        assert!(err.is_retryable());

        let err = FetchError::Decode {
            row: 2,
            message: "text is empty".into(),
        };
        assert_eq!(err.kind(), ErrorKind::DataIntegrity);
        assert_eq!(err.code(), "WORDS_ROW_DECODE");
    }
}
