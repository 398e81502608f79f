//! CLI-specific error types
//!
//! All CLI errors are fatal: the process prints `CODE: message` and exits
//! non-zero.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::query::QueryError;
use crate::scroll::{TraversalErrorKind, TraversalFailure};
use crate::transport::TransportError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// Bad command-line value
    InvalidArgument,
    /// I/O error (stdout)
    IoError,
    /// HTTP client could not be set up
    TransportSetup,
    /// Traversal aborted; carries the traversal's own classification
    Traversal(TraversalErrorKind),
    /// Traversal stopped by Ctrl-C
    Cancelled,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "ESQ_CLI_CONFIG_ERROR",
            Self::InvalidArgument => "ESQ_CLI_INVALID_ARGUMENT",
            Self::IoError => "ESQ_CLI_IO_ERROR",
            Self::TransportSetup => "ESQ_CLI_TRANSPORT_SETUP",
            Self::Traversal(kind) => kind.code(),
            Self::Cancelled => "ESQ_CLI_CANCELLED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// Invalid argument
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidArgument, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(format!("{} ({})", e, e.code()))
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        Self::invalid_argument(format!("{} ({})", e, e.code()))
    }
}

impl From<TransportError> for CliError {
    fn from(e: TransportError) -> Self {
        Self::new(
            CliErrorCode::TransportSetup,
            format!("{} ({})", e, e.code()),
        )
    }
}

impl From<TraversalFailure> for CliError {
    fn from(f: TraversalFailure) -> Self {
        Self::new(CliErrorCode::Traversal(f.kind()), f.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_code_then_message() {
        let err = CliError::invalid_argument("bad start");
        assert_eq!(err.to_string(), "ESQ_CLI_INVALID_ARGUMENT: bad start");
        assert_eq!(err.message(), "bad start");
    }

    #[test]
    fn test_traversal_code_passes_through() {
        let code = CliErrorCode::Traversal(TraversalErrorKind::CursorExpired);
        assert_eq!(code.code(), "ESQ_SCROLL_CURSOR_EXPIRED");
    }

    #[test]
    fn test_query_error_is_invalid_argument() {
        let err: CliError = QueryError::InvalidRange { start: 9, stop: 1 }.into();
        assert_eq!(err.code(), &CliErrorCode::InvalidArgument);
        assert!(err.message().contains("ESQ_QUERY_INVALID_RANGE"));
    }
}
