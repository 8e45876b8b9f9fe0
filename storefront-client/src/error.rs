//! Client error types

use reqwest::StatusCode;
use shared::ApiErrorBody;
use thiserror::Error;

use crate::storage::StorageError;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// 401 from the backend
    #[error("Authentication required: {}", .0.message().unwrap_or_default())]
    Unauthorized(ApiErrorBody),

    /// 403 from the backend
    #[error("Permission denied: {}", .0.message().unwrap_or_default())]
    Forbidden(ApiErrorBody),

    /// 404 from the backend
    #[error("Not found: {}", .0.message().unwrap_or_default())]
    NotFound(ApiErrorBody),

    /// 400 from the backend
    #[error("Validation error: {}", .0.message().unwrap_or_default())]
    Validation(ApiErrorBody),

    /// Any other non-success status
    #[error("Server returned {status}: {}", .body.message().unwrap_or_default())]
    Status { status: u16, body: ApiErrorBody },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persisted client state could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Maps a non-success status and its body to an error
    pub fn from_status(status: StatusCode, text: &str) -> Self {
        let body = ApiErrorBody::parse(text);
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(body),
            StatusCode::FORBIDDEN => Self::Forbidden(body),
            StatusCode::NOT_FOUND => Self::NotFound(body),
            StatusCode::BAD_REQUEST => Self::Validation(body),
            _ => Self::Status {
                status: status.as_u16(),
                body,
            },
        }
    }

    /// HTTP status the backend answered with, if this came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Validation(_) => Some(400),
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Body the backend sent with the error, if any
    pub fn body(&self) -> Option<&ApiErrorBody> {
        match self {
            Self::Unauthorized(body)
            | Self::Forbidden(body)
            | Self::NotFound(body)
            | Self::Validation(body)
            | Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
