//! Error types for the Bitable client.
//!
//! This module provides a unified error type with explicit variants for
//! provider-reported failures, transport, protocol decoding, authentication
//! and local input validation.

use std::fmt;
use thiserror::Error;

/// The unified error type for Bitable operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The provider answered but reported failure (`code != 0`).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Local precondition failure, raised before any network call.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Protocol errors (undecodable or inconsistent responses).
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Tenant token acquisition failed.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Aggregation stopped after the configured page cap.
    #[error("pagination stopped after {max_pages} pages")]
    PaginationLimit { max_pages: u32 },

    /// Local filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A failure reported by the provider in its response envelope.
///
/// Carries everything needed to open a support ticket with the provider:
/// the numeric code, the message and the request log id. The raw response
/// body is kept for diagnostics.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Human-readable operation label, e.g. `"search records"`.
    pub operation: &'static str,
    /// Provider error code (non-zero).
    pub code: i64,
    /// Provider error message.
    pub message: String,
    /// Provider request log id, if the response carried one.
    pub log_id: Option<String>,
    /// Raw response body.
    pub body: serde_json::Value,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed, code: {}, msg: {}, log_id: {}",
            self.operation,
            self.code,
            self.message,
            self.log_id.as_deref().unwrap_or("-")
        )
    }
}

impl std::error::Error for ApiError {}

/// Local input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A batch-update element lacks `record_id` or `fields`.
    #[error("batch update entry {index} must contain record_id and fields")]
    IncompleteRecordUpdate { index: usize },

    /// Invalid base URL.
    #[error("invalid base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Protocol-level errors: the provider's answer could not be understood.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code, if the failure came from an HTTP response.
    pub status: Option<u16>,
    /// What went wrong.
    pub message: String,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(status) = self.status {
            write!(f, "HTTP {}: ", status)?;
        }
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Tenant token errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint answered with a non-200 status.
    #[error("token request returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// The token endpoint reported failure.
    #[error("token request rejected, code: {code}, msg: {message}")]
    Rejected { code: i64, message: String },

    /// The token endpoint reported success but returned no token.
    #[error("token response carried no tenant_access_token")]
    MissingToken,
}
