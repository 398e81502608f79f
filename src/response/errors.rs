//! # Response Errors
//!
//! Decode failures indicate a protocol or version mismatch with the
//! endpoint and are fatal for the traversal that hit them.

use thiserror::Error;

/// Result type for response decoding
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Response decoding errors
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Payload is not well-formed JSON or not an object
    #[error("Malformed response: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Payload lacks the `hits.hits[]` list
    #[error("Response has no hit list: {0}")]
    MissingHits(String),

    /// A hit has no string identifier
    #[error("Hit {index} has no string '_id'")]
    MissingId { index: usize },

    /// Cursor field present but not a string
    #[error("Cursor field '{field}' is not a string")]
    InvalidCursor { field: String },

    /// Non-empty first page without a cursor to continue from
    #[error("Response carries hits but no '{field}' cursor")]
    MissingCursor { field: String },
}

impl DecodeError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            DecodeError::Malformed(_) => "ESQ_DECODE_MALFORMED",
            DecodeError::MissingHits(_) => "ESQ_DECODE_MISSING_HITS",
            DecodeError::MissingId { .. } => "ESQ_DECODE_MISSING_ID",
            DecodeError::InvalidCursor { .. } => "ESQ_DECODE_INVALID_CURSOR",
            DecodeError::MissingCursor { .. } => "ESQ_DECODE_MISSING_CURSOR",
        }
    }
}
