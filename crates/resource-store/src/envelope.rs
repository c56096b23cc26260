//! # Response Envelope
//!
//! Every API call answers with an [`Envelope`] or fails with an [`ApiError`].
//! The envelope mirrors the wire format `{ "success": bool, "data": ..., "message": ... }`.

use serde::{Deserialize, Serialize};

/// The uniform wrapper around every API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// A successful response carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// A successful response without a body, as returned by deletes.
    pub fn done() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
        }
    }

    /// A response where the server declined the operation.
    pub fn declined(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Errors raised by an API client instead of returning an envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("operation not supported: {0}")]
    Unsupported(String),
}

/// Result of a single API call.
pub type ApiResult<T> = Result<Envelope<T>, ApiError>;
