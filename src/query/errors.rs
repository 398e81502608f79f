//! # Query Errors
//!
//! Construction and encoding failures. Both are local bugs and are never
//! retried.

use thiserror::Error;

/// Result type for query construction
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type for query encoding
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Query construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Range start is after range stop
    #[error("Invalid range: start {start} is after stop {stop}")]
    InvalidRange { start: i64, stop: i64 },
}

impl QueryError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::InvalidRange { .. } => "ESQ_QUERY_INVALID_RANGE",
        }
    }
}

/// Encoding errors
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Combinator not supported by the encoder's dialect
    #[error("Unsupported combinator '{0}'")]
    UnsupportedCombinator(&'static str),

    /// Leaf with an empty field name
    #[error("Empty field name in '{0}' predicate")]
    EmptyField(&'static str),

    /// Range leaf without any bound
    #[error("Range on '{0}' has no bounds")]
    UnboundedRange(String),

    /// Sort directive with an empty field name
    #[error("Empty field name in sort directive")]
    EmptySortField,

    /// Serializer failure
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl EncodeError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            EncodeError::UnsupportedCombinator(_) => "ESQ_ENCODE_UNSUPPORTED_COMBINATOR",
            EncodeError::EmptyField(_) => "ESQ_ENCODE_EMPTY_FIELD",
            EncodeError::UnboundedRange(_) => "ESQ_ENCODE_UNBOUNDED_RANGE",
            EncodeError::EmptySortField => "ESQ_ENCODE_EMPTY_SORT_FIELD",
            EncodeError::Serialize(_) => "ESQ_ENCODE_SERIALIZE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_range_display() {
        let err = QueryError::InvalidRange { start: 100, stop: 50 };
        let display = err.to_string();
        assert!(display.contains("100"));
        assert!(display.contains("50"));
        assert_eq!(err.code(), "ESQ_QUERY_INVALID_RANGE");
    }

    #[test]
    fn test_encode_error_codes() {
        assert_eq!(
            EncodeError::UnsupportedCombinator("should").code(),
            "ESQ_ENCODE_UNSUPPORTED_COMBINATOR"
        );
        assert_eq!(EncodeError::EmptyField("match").code(), "ESQ_ENCODE_EMPTY_FIELD");
    }
}
