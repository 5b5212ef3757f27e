//! Error types for the API client
//!
//! Every variant renders as a single human-readable message. The query layer
//! stores `error.to_string()` and never inspects the variant beyond that.

use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Message used when neither the server nor the transport produced one
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred";

/// API client errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// A required input was missing or invalid; no request was made
    #[error("{0}")]
    Validation(String),

    /// A well-formed response explicitly signalled failure
    #[error("{0}")]
    Application(String),

    /// The server answered with a non-2xx status
    #[error("{message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Server-provided `error` field, or the transport message
        message: String,
    },

    /// Network-level failure (connect, DNS, broken body, ...)
    #[error("{0}")]
    Transport(String),

    /// The request did not complete within the configured timeout
    #[error("timeout of {}ms exceeded", .0.as_millis())]
    Timeout(Duration),

    /// Response body could not be decoded into the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an application error
    pub fn application(msg: impl Into<String>) -> Self {
        Self::Application(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build an HTTP error from a status code and the raw response body.
    ///
    /// The message is the body's `error` field when present, otherwise the
    /// transport-level description of the status.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let server = serde_json::from_str::<Value>(body).ok();
        let transport = format!("Request failed with status code {status}");
        Self::Http {
            status,
            message: normalize_message(server.as_ref(), Some(&transport)),
        }
    }

    /// Kind used for logging and metrics labels
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Application(_) => ErrorKind::Application,
            Self::Http { .. }
            | Self::Transport(_)
            | Self::Timeout(_)
            | Self::Decode(_)
            | Self::Config(_) => ErrorKind::Transport,
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Http { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Http { status, .. } if *status >= 500)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        let message = err.to_string();
        if message.is_empty() {
            Self::Transport(FALLBACK_MESSAGE.to_string())
        } else {
            Self::Transport(message)
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Coarse error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid input
    Validation,
    /// Network failure, timeout, or non-2xx response
    Transport,
    /// Response carried an explicit failure flag
    Application,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Validation => "validation",
            Self::Transport => "transport",
            Self::Application => "application",
        };
        f.write_str(label)
    }
}

/// Pick the displayable message for a failure.
///
/// Priority: the server's `error` field, then the transport message, then
/// [`FALLBACK_MESSAGE`].
#[must_use]
pub fn normalize_message(server_body: Option<&Value>, transport: Option<&str>) -> String {
    server_body
        .and_then(|body| body.get("error"))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| transport.filter(|s| !s.trim().is_empty()))
        .unwrap_or(FALLBACK_MESSAGE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_error_field_wins() {
        let body = json!({"success": false, "error": "Product not found: 7"});
        assert_eq!(
            normalize_message(Some(&body), Some("Request failed with status code 404")),
            "Product not found: 7"
        );
    }

    #[test]
    fn test_transport_message_when_no_server_field() {
        let body = json!({"detail": "nope"});
        assert_eq!(
            normalize_message(Some(&body), Some("connection refused")),
            "connection refused"
        );
    }

    #[test]
    fn test_fallback_message() {
        assert_eq!(normalize_message(None, None), FALLBACK_MESSAGE);
        assert_eq!(normalize_message(None, Some("  ")), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_from_status_parses_body() {
        let err = ApiError::from_status(404, r#"{"success":false,"error":"Product not found: 9"}"#);
        assert_eq!(err.to_string(), "Product not found: 9");
        assert!(err.is_client_error());
        assert!(!err.is_server_error());

        let err = ApiError::from_status(502, "<html>bad gateway</html>");
        assert_eq!(err.to_string(), "Request failed with status code 502");
        assert!(err.is_server_error());
    }

    #[test]
    fn test_timeout_message_and_kind() {
        let err = ApiError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "timeout of 10000ms exceeded");
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(ApiError::validation("x").kind(), ErrorKind::Validation);
        assert_eq!(ApiError::application("x").kind(), ErrorKind::Application);
    }
}
