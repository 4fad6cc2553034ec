//! Error types for feed and notifier implementations.

use kiwi_core::KiwiError;
use thiserror::Error;

/// Common error type for trait operations.
#[derive(Debug, Error)]
pub enum TraitError {
    /// Connection to external service failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Remote service answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// Response status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Operation timed out
    #[error("timeout")]
    Timeout,

    /// Expected content missing from an upstream document
    #[error("not found: {0}")]
    NotFound(String),

    /// Parse/deserialization error
    #[error("parse error: {0}")]
    ParseError(String),

    /// Domain-level failure raised while normalising a feed
    #[error(transparent)]
    Core(#[from] KiwiError),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl TraitError {
    /// Returns true if retrying the same request could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TraitError::ConnectionFailed(_) | TraitError::Timeout | TraitError::HttpStatus { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_is_transparent() {
        let err: TraitError = KiwiError::invalid_rate("abc", "invalid digit").into();
        assert_eq!(err.to_string(), "Invalid rate 'abc': invalid digit");
        assert!(!err.is_transient());
    }

    #[test]
    fn test_http_status_is_transient() {
        let err = TraitError::HttpStatus {
            status: 403,
            url: "https://example.com".into(),
        };
        assert_eq!(err.to_string(), "HTTP 403 from https://example.com");
        assert!(err.is_transient());
    }
}
