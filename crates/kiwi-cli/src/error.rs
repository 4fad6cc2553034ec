//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid `--now` value.
    #[error("Invalid timestamp: {0}. Use RFC 3339, e.g. 2025-12-20T12:00:00+13:00.")]
    InvalidTimestamp(String),

    /// Bank has no registered source or parser.
    #[error("No feed implementation for bank '{0}'. Known banks: {1}")]
    UnknownBank(String, String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
