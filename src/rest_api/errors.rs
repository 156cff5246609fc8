//! # REST API Errors
//!
//! HTTP mapping of fetch failures. The status follows the failure kind:
//! client input → 400, missing feature → 501, store trouble → 503,
//! corrupt data → 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::fetcher::{ErrorKind, FetchError};
use crate::model::QueryError;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

#[derive(Debug, Clone, Error)]
pub enum RestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Unsupported HTTP method")]
    MethodNotAllowed,

    /// The blocking task running the store call did not finish
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<QueryError> for RestError {
    fn from(err: QueryError) -> Self {
        RestError::Fetch(FetchError::Query(err))
    }
}

impl RestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::Fetch(err) => match err.kind() {
                ErrorKind::ClientInput => StatusCode::BAD_REQUEST,
                ErrorKind::FeatureUnavailable => StatusCode::NOT_IMPLEMENTED,
                ErrorKind::Infrastructure => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::DataIntegrity => StatusCode::INTERNAL_SERVER_ERROR,
            },
            RestError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RestError::Fetch(err) => err.code(),
            RestError::MethodNotAllowed => "WORDS_METHOD_NOT_ALLOWED",
            RestError::Internal(_) => "WORDS_INTERNAL",
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            RestError::Fetch(err) => err.is_retryable(),
            RestError::MethodNotAllowed | RestError::Internal(_) => false,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    pub status: u16,
    pub retryable: bool,
}

impl From<&RestError> for ErrorResponse {
    fn from(err: &RestError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code(),
            status: err.status_code().as_u16(),
            retryable: err.is_retryable(),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
