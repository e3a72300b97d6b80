//! Error types for compression service operations

use serde::Deserialize;
use std::io;
use thiserror::Error;

/// Result type alias for service operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur while talking to the compression service
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// Service could not be reached at all
    #[error("Cannot reach compression service: {0}")]
    Connection(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Service answered with an error status or error payload
    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// Response body did not match the wire contract
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Configured service URL cannot be used
    #[error("Invalid service URL: {0}")]
    InvalidEndpoint(String),

    /// Local I/O failure while staging files for upload
    #[error("I/O error: {0}")]
    Io(String),

    /// Request could not be built or sent for another reason
    #[error("Request error: {0}")]
    Request(String),
}

/// `{ "error": message }` body produced by the service on failure
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Build a Service error from a non-success status and its body,
    /// extracting the `error` field when the body follows the convention
    pub fn from_status_body(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.error,
            Err(_) => {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    trimmed.to_string()
                }
            }
        };
        ApiError::Service { status, message }
    }

    /// Check if the error is transient (safe to retry by hand)
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Connection(_) | ApiError::Timeout(_) | ApiError::Io(_) => true,
            ApiError::Service { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Check if the error means the service was never reached
    pub fn is_connection(&self) -> bool {
        matches!(self, ApiError::Connection(_) | ApiError::Timeout(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else if err.is_connect() {
            ApiError::Connection(err.to_string())
        } else if err.is_decode() {
            ApiError::MalformedResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Service {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ApiError::Request(err.to_string())
        }
    }
}

impl From<io::Error> for ApiError {
    fn from(err: io::Error) -> Self {
        ApiError::Io(err.to_string())
    }
}
