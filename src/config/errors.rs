//! Configuration errors
//!
//! All configuration errors are fatal: the CLI refuses to start a traversal
//! on a configuration it could not fully validate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File is not valid TOML or does not match the layout
    #[error("Invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is not acceptable
    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "ESQ_CONFIG_READ",
            ConfigError::Parse(_) => "ESQ_CONFIG_PARSE",
            ConfigError::Invalid { .. } => "ESQ_CONFIG_INVALID",
        }
    }
}
