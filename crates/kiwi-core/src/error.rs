//! Error types for the Kiwi Rates core.
//!
//! Every variant here aborts the update of the bank it names. Nothing in the
//! core downgrades an error to a warning.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type KiwiResult<T> = Result<T, KiwiError>;

/// The main error type for core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KiwiError {
    /// The upstream parser produced no readings for a bank.
    ///
    /// An empty batch almost always means the source changed shape, so it is
    /// never treated as "no changes".
    #[error("No rates observed for bank '{bank}': upstream source returned an empty batch")]
    UpstreamEmpty {
        /// Bank whose batch was empty.
        bank: String,
    },

    /// A rate value could not be parsed as a decimal number.
    #[error("Invalid rate '{value}': {reason}")]
    InvalidRate {
        /// The raw text that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A bank identifier is empty or contains characters outside `[a-z0-9_-]`.
    #[error("Invalid bank id '{0}': expected lowercase letters, digits, '-' or '_'")]
    InvalidBankId(String),
}

impl KiwiError {
    /// Creates an upstream-empty error.
    #[must_use]
    pub fn upstream_empty(bank: impl Into<String>) -> Self {
        Self::UpstreamEmpty { bank: bank.into() }
    }

    /// Creates an invalid-rate error.
    #[must_use]
    pub fn invalid_rate(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRate {
            value: value.into(),
            reason: reason.into(),
        }
    }
}
