//! # HTTP Errors
//!
//! Maps engine errors onto status codes. Client mistakes become 400; every
//! other failure becomes 500 with a message and no further detail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::query::QueryError;

/// Result type for route handlers
pub type RestResult<T> = Result<T, RestError>;

/// Transport-level errors
#[derive(Debug, Clone, Error)]
pub enum RestError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// A query parameter could not be parsed
    #[error("Invalid query parameter {name}: {value}")]
    InvalidQueryParam { name: String, value: String },

    /// Rejected by engine validation
    #[error("{0}")]
    Validation(QueryError),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Engine or runtime failure
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl RestError {
    pub fn invalid_param(name: &str, value: &str) -> Self {
        RestError::InvalidQueryParam {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::InvalidQueryParam { .. } | RestError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            RestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QueryError> for RestError {
    fn from(err: QueryError) -> Self {
        if err.is_client_error() {
            RestError::Validation(err)
        } else {
            RestError::Internal(err.to_string())
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<RestError> for ErrorResponse {
    fn from(err: RestError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
