//! Word store errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures at the store boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Could not open or prepare a connection
    #[error("Failed to connect to word store: {0}")]
    Connection(String),

    /// Statement failed to prepare or run
    #[error("Query failed: {0}")]
    Execution(String),

    /// Deadline passed before the statement finished
    #[error("Query interrupted: deadline exceeded")]
    Timeout,

    /// A column value could not be represented
    #[error("Row {row}, column {column}: {message}")]
    Decode {
        row: usize,
        column: usize,
        message: String,
    },

    /// A record offered for insertion violates the catalog invariants
    #[error("Record rejected: {0}")]
    Rejected(String),
}

impl StoreError {
    /// Whether a caller may retry the same request unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StoreError::Connection(_) | StoreError::Execution(_) | StoreError::Timeout
        )
    }
}
