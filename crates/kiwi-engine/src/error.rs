//! Engine error types.

use kiwi_core::KiwiError;
use kiwi_storage::StorageError;
use kiwi_traits::TraitError;
use thiserror::Error;

/// Engine result type.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Domain error (empty batch, invalid rate)
    #[error(transparent)]
    Core(#[from] KiwiError),

    /// Loading or saving history failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Fetching or parsing the bank feed failed
    #[error("source error: {0}")]
    Source(#[from] TraitError),
}

impl EngineError {
    /// Returns true if the stored history could not be decoded.
    #[must_use]
    pub fn is_corrupt_history(&self) -> bool {
        matches!(self, EngineError::Storage(e) if e.is_corrupt())
    }

    /// Returns true if the bank returned no rates.
    #[must_use]
    pub fn is_upstream_empty(&self) -> bool {
        matches!(
            self,
            EngineError::Core(KiwiError::UpstreamEmpty { .. })
                | EngineError::Source(TraitError::Core(KiwiError::UpstreamEmpty { .. }))
        )
    }
}
