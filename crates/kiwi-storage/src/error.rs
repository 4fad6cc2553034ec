//! Storage error types.

use std::path::PathBuf;

use thiserror::Error;

/// Storage operation result type.
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage error types.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Persisted content exists but is not a valid bank record.
    #[error("Corrupt rate history for bank '{bank}': {detail}")]
    Corrupt {
        /// Bank whose record failed to decode.
        bank: String,
        /// Decoder message, prefixed with the offending location.
        detail: String,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O error on a specific path.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Internal backend failure (poisoned lock and similar).
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Creates a corrupt-record error.
    pub fn corrupt(bank: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Corrupt {
            bank: bank.into(),
            detail: detail.into(),
        }
    }

    /// Creates an I/O error for a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if the error is a decode failure of persisted state.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
