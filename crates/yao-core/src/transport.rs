//! The HTTP seam between resource accessors and a service endpoint.
//!
//! A [`Transport`] is one HTTP client bound to one service at one access
//! level. Resource code only speaks [`ApiRequest`] / [`ApiResponse`], which
//! keeps it independent of the concrete client.

use crate::error::{Error, Result};
use crate::query::Query;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use url::Url;

/// A request relative to a service's base URL, or an absolute URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path below the base URL, or an absolute `http(s)://` URL
    pub path: String,
    /// Query parameters
    pub query: Query,
    /// JSON body
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Create a request with no query and no body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Query::new(),
            body: None,
        }
    }

    /// `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PUT` request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// `DELETE` request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach query parameters.
    #[must_use]
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl ApiResponse {
    /// Create a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body as JSON. An empty body decodes to `null`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the body is not valid JSON.
    pub fn json(&self) -> Result<Value> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body)
            .map_err(|err| Error::ParseError(format!("Invalid JSON response body: {err}")))
    }
}

/// An HTTP client bound to one service endpoint.
///
/// Implementations return `Ok` only for 2xx responses; any other status is
/// mapped through [`Error::from_status`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Base URL that relative request paths are resolved against.
    fn url_prefix(&self) -> Url;

    /// Perform one HTTP round trip.
    ///
    /// # Errors
    ///
    /// Returns the mapped error for non-success statuses and transport
    /// failures.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}
