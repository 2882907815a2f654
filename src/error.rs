//! Error types for the recipe API client
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Error Kind Enum ==
/// What went wrong while fetching a resource.
#[derive(Error, Debug)]
pub enum ErrorKind {
    /// Required input was missing or malformed
    #[error("{0}")]
    InvalidArgument(String),

    /// Server answered 404
    #[error("{0}")]
    NotFound(String),

    /// Server answered with any other non-success status
    #[error("{message} (HTTP {status})")]
    RequestFailed { status: u16, message: String },

    /// Transport-level failure (connection refused, reset, TLS, ...)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Success status but the body was not the expected JSON shape
    #[error("invalid response body: {0}")]
    InvalidResponse(String),
}

// == Api Error ==
/// An [`ErrorKind`] wrapped with the operation it happened in.
#[derive(Error, Debug)]
#[error("{context}: {kind}")]
pub struct ApiError {
    context: String,
    #[source]
    kind: ErrorKind,
}

impl ApiError {
    /// Wraps `kind` with a description of the failing operation.
    pub fn new(context: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            context: context.into(),
            kind,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidArgument(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound(_))
    }

    pub fn is_request_failed(&self) -> bool {
        matches!(self.kind, ErrorKind::RequestFailed { .. })
    }

    pub fn is_network(&self) -> bool {
        matches!(self.kind, ErrorKind::Network(_))
    }

    /// HTTP status of a `RequestFailed` error.
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::RequestFailed { status, .. } => Some(status),
            ErrorKind::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the recipe API client.
pub type Result<T> = std::result::Result<T, ApiError>;
