//! # Transport Errors
//!
//! Network and HTTP-level failures. The engine never retries these; a caller
//! may restart the whole traversal.

use thiserror::Error;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Longest response body excerpt kept in an error
pub const MAX_ERROR_BODY: usize = 512;

/// Transport errors
#[derive(Debug, Error)]
pub enum TransportError {
    /// Base URL is not usable
    #[error("Invalid base URL '{0}'")]
    InvalidUrl(String),

    /// HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// Request could not be sent or its body not read
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("Endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Endpoint no longer knows the scroll cursor
    #[error("Scroll cursor expired: {body}")]
    CursorExpired { body: String },
}

impl TransportError {
    /// Build a status error, keeping a bounded excerpt of the body
    pub fn status(status: u16, body: &[u8]) -> Self {
        Self::Status {
            status,
            body: excerpt(body),
        }
    }

    /// Build a cursor-expired error, keeping a bounded excerpt of the body
    pub fn cursor_expired(body: &[u8]) -> Self {
        Self::CursorExpired { body: excerpt(body) }
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            TransportError::InvalidUrl(_) => "ESQ_TRANSPORT_INVALID_URL",
            TransportError::Client(_) => "ESQ_TRANSPORT_CLIENT",
            TransportError::Request(_) => "ESQ_TRANSPORT_REQUEST",
            TransportError::Status { .. } => "ESQ_TRANSPORT_STATUS",
            TransportError::CursorExpired { .. } => "ESQ_TRANSPORT_CURSOR_EXPIRED",
        }
    }

    /// Returns true if the endpoint reported the cursor gone
    pub fn is_cursor_expired(&self) -> bool {
        matches!(self, TransportError::CursorExpired { .. })
    }
}

fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    match text.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.into_owned(),
    }
}
