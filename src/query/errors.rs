//! Query error types
//!
//! Error codes:
//! - SALES_INVALID_RANGE (client)
//! - SALES_INVALID_PAGE (client)
//! - SALES_CONVERSION_FAILED (row-level, logged and skipped)
//! - SALES_BACKEND_UNAVAILABLE (server)
//! - SALES_QUERY_FAILED (server)

use std::fmt;

/// Who is responsible for an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The request was malformed
    Client,
    /// The service could not answer a well-formed request
    Server,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Client => write!(f, "CLIENT"),
            Severity::Server => write!(f, "SERVER"),
        }
    }
}

/// Query error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorCode {
    /// Malformed or conflicting age/date range
    InvalidRange,
    /// Page number or page size out of bounds
    InvalidPage,
    /// A stored row could not be turned into a transaction
    ConversionFailed,
    /// Dataset not loaded or store not connected
    BackendUnavailable,
    /// Anything else
    QueryFailed,
}

impl QueryErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            QueryErrorCode::InvalidRange => "SALES_INVALID_RANGE",
            QueryErrorCode::InvalidPage => "SALES_INVALID_PAGE",
            QueryErrorCode::ConversionFailed => "SALES_CONVERSION_FAILED",
            QueryErrorCode::BackendUnavailable => "SALES_BACKEND_UNAVAILABLE",
            QueryErrorCode::QueryFailed => "SALES_QUERY_FAILED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            QueryErrorCode::InvalidRange | QueryErrorCode::InvalidPage => Severity::Client,
            _ => Severity::Server,
        }
    }
}

impl fmt::Display for QueryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Query error with code and message
#[derive(Debug, Clone, PartialEq)]
pub struct QueryError {
    code: QueryErrorCode,
    message: String,
}

impl QueryError {
    /// Malformed or conflicting range parameters
    pub fn invalid_range(reason: impl Into<String>) -> Self {
        Self {
            code: QueryErrorCode::InvalidRange,
            message: reason.into(),
        }
    }

    /// Page or page size out of bounds
    pub fn invalid_page(reason: impl Into<String>) -> Self {
        Self {
            code: QueryErrorCode::InvalidPage,
            message: reason.into(),
        }
    }

    /// A row could not be converted into the output shape
    pub fn conversion_failed(row: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self {
            code: QueryErrorCode::ConversionFailed,
            message: format!("Cannot convert row {}: {}", row, reason.into()),
        }
    }

    /// The backing store is not attached
    pub fn backend_unavailable(backend: &str) -> Self {
        Self {
            code: QueryErrorCode::BackendUnavailable,
            message: format!("{} backend is not available", backend),
        }
    }

    /// Unexpected failure
    pub fn query_failed(reason: impl Into<String>) -> Self {
        Self {
            code: QueryErrorCode::QueryFailed,
            message: reason.into(),
        }
    }

    pub fn code(&self) -> QueryErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// True when the caller sent a bad request
    pub fn is_client_error(&self) -> bool {
        self.severity() == Severity::Client
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for QueryError {}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
