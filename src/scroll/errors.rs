//! # Traversal Errors
//!
//! Every failure aborts the traversal and reaches the caller with the stage
//! it happened in and what had been delivered by then. Only cursor release
//! failures are downgraded, to warnings.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use crate::query::EncodeError;
use crate::response::DecodeError;
use crate::transport::TransportError;

/// Error a batch handler reports
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Tag of a traversal error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalErrorKind {
    EncodeFailure,
    TransportFailure,
    DecodeFailure,
    HandlerFailure,
    CursorExpired,
}

impl TraversalErrorKind {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::EncodeFailure => "ESQ_SCROLL_ENCODE_FAILED",
            Self::TransportFailure => "ESQ_SCROLL_TRANSPORT_FAILED",
            Self::DecodeFailure => "ESQ_SCROLL_DECODE_FAILED",
            Self::HandlerFailure => "ESQ_SCROLL_HANDLER_FAILED",
            Self::CursorExpired => "ESQ_SCROLL_CURSOR_EXPIRED",
        }
    }
}

impl fmt::Display for TraversalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Underlying cause of a failed traversal
#[derive(Debug, Error)]
pub enum TraversalError {
    /// Request could not be encoded; a local bug
    #[error("Encode failure: {0}")]
    Encode(#[source] EncodeError),

    /// Network or HTTP failure
    #[error("Transport failure: {0}")]
    Transport(#[source] TransportError),

    /// Response shape mismatch
    #[error("Decode failure: {0}")]
    Decode(#[source] DecodeError),

    /// The consumer rejected a batch
    #[error("Handler failure: {0}")]
    Handler(#[source] HandlerError),

    /// Continuation rejected because the cursor's ttl elapsed
    #[error("Cursor expired: {0}")]
    CursorExpired(#[source] TransportError),
}

impl TraversalError {
    pub fn kind(&self) -> TraversalErrorKind {
        match self {
            TraversalError::Encode(_) => TraversalErrorKind::EncodeFailure,
            TraversalError::Transport(_) => TraversalErrorKind::TransportFailure,
            TraversalError::Decode(_) => TraversalErrorKind::DecodeFailure,
            TraversalError::Handler(_) => TraversalErrorKind::HandlerFailure,
            TraversalError::CursorExpired(_) => TraversalErrorKind::CursorExpired,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

impl From<TransportError> for TraversalError {
    fn from(e: TransportError) -> Self {
        if e.is_cursor_expired() {
            TraversalError::CursorExpired(e)
        } else {
            TraversalError::Transport(e)
        }
    }
}

impl From<EncodeError> for TraversalError {
    fn from(e: EncodeError) -> Self {
        TraversalError::Encode(e)
    }
}

impl From<DecodeError> for TraversalError {
    fn from(e: DecodeError) -> Self {
        TraversalError::Decode(e)
    }
}

/// Where in the traversal a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Encoding the request
    Encode,
    /// Initial search request and its response
    InitialSearch,
    /// A continuation request and its response
    Continuation,
    /// Inside the batch handler
    Handler,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Encode => "encode",
            Stage::InitialSearch => "initial_search",
            Stage::Continuation => "continuation",
            Stage::Handler => "handler",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed traversal with its delivery record
///
/// `documents_delivered` counts batches the handler accepted. A restart
/// re-reads from the start of the index, so those documents will be seen
/// again.
#[derive(Debug, Error)]
#[error("{error} (stage: {stage}, delivered {documents_delivered} documents in {batches_delivered} batches)")]
pub struct TraversalFailure {
    #[source]
    pub error: TraversalError,
    pub stage: Stage,
    pub traversal_id: Uuid,
    pub batches_delivered: u64,
    pub documents_delivered: u64,
    /// The batch in flight had already been handed to the handler
    pub current_batch_delivered: bool,
}

impl TraversalFailure {
    pub fn kind(&self) -> TraversalErrorKind {
        self.error.kind()
    }

    pub fn code(&self) -> &'static str {
        self.error.code()
    }
}
