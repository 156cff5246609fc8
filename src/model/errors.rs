//! Query model errors
//!
//! Only caller-input failures live here. Out-of-domain numbers are repaired,
//! not reported (see `RangeFilter::clamped`).

use thiserror::Error;

/// Result type for query model operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Caller input that cannot be turned into a page request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Sort or filter identifier outside the attribute allow-list
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Page size below 1
    #[error("Invalid limit {0}: must be at least 1")]
    InvalidLimit(u64),

    /// Sort direction other than asc/desc
    #[error("Invalid sort direction: {0}")]
    InvalidSortDirection(String),
}

impl QueryError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::UnknownField(_) => "WORDS_UNKNOWN_FIELD",
            QueryError::InvalidLimit(_) => "WORDS_INVALID_LIMIT",
            QueryError::InvalidSortDirection(_) => "WORDS_INVALID_SORT_DIRECTION",
        }
    }
}
