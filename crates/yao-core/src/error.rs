//! Error types for Yao operations.
//!
//! This module provides the error hierarchy shared by every Yao crate,
//! including the mapping from OpenStack HTTP responses onto typed variants.

use serde_json::Value;
use thiserror::Error;

/// Main error type for Yao operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The backing service answered 404 without an `itemNotFound` fault
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backing service answered 404 with an `itemNotFound` fault
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// A name resolved to more than one resource
    #[error("Too many items found: {0}")]
    TooManyItemsFound(String),

    /// Configuration error, including missing service access
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The request was rejected as malformed
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The token was missing or rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The token lacks permission for the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Service is unavailable or overloaded
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Failed to parse a response body or attribute
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Any other non-success status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response
        message: String,
    },
}

/// Specialized result type for Yao operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::ItemNotFound(_) => "ITEM_NOT_FOUND",
            Self::TooManyItemsFound(_) => "TOO_MANY_ITEMS_FOUND",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Conflict(_) => "CONFLICT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
        }
    }

    /// Returns true for the absence signals (`NotFound` and `ItemNotFound`).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::ItemNotFound(_))
    }

    /// Builds an error from a non-success HTTP status and its raw body.
    ///
    /// OpenStack services wrap failures in a fault envelope such as
    /// `{"itemNotFound": {"message": "...", "code": 404}}`; the message is
    /// lifted out of it when present.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let fault = serde_json::from_str::<Value>(body).ok();
        let fault_name = fault
            .as_ref()
            .and_then(Value::as_object)
            .and_then(|map| map.keys().next().cloned());
        let message = fault
            .as_ref()
            .and_then(fault_message)
            .unwrap_or_else(|| body.trim().to_string());

        match status {
            404 if fault_name.as_deref() == Some("itemNotFound") => Self::ItemNotFound(message),
            404 => Self::NotFound(message),
            400 => Self::BadRequest(message),
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            409 => Self::Conflict(message),
            502..=504 => Self::ServiceUnavailable(message),
            _ => Self::UnexpectedStatus { status, message },
        }
    }
}

fn fault_message(fault: &Value) -> Option<String> {
    let map = fault.as_object()?;
    if let Some(message) = map.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }
    map.values()
        .filter_map(Value::as_object)
        .find_map(|inner| inner.get("message").and_then(Value::as_str))
        .map(str::to_string)
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}
