// Client-side API error types
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failure of a single control-plane call, propagated unchanged to the caller
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure, timeout, or a request reqwest refused to build
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: Value },

    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Query params that do not flatten to key/value pairs
    #[error("Invalid query params: {0}")]
    InvalidParams(String),

    #[error("Invalid MIME type '{mime}': {reason}")]
    InvalidMime { mime: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status, when the server got far enough to send one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport(e) if e.is_timeout())
    }

    /// Error body returned by the server, if any
    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
