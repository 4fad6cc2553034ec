//! Rate store trait definition.

use kiwi_core::{BankId, BankRecord};

use crate::error::StorageResult;

/// Persistence for per-bank rate history.
///
/// The store performs no comparison logic; it loads and replaces whole
/// records. Implementations must never hand back a partially written record.
///
/// # Example
///
/// ```rust
/// use kiwi_core::{BankId, BankRecord};
/// use kiwi_storage::{InMemoryStore, RateStore};
///
/// let store = InMemoryStore::new();
/// let bank = BankId::new("bnz").unwrap();
///
/// // Unknown banks load as an empty seed record.
/// assert_eq!(store.load(&bank).unwrap(), BankRecord::empty());
/// ```
pub trait RateStore: Send + Sync {
    /// Returns the backend name for logging.
    fn backend_name(&self) -> &'static str;

    /// Loads a bank's record, or an empty seed record if none exists.
    ///
    /// Existing content that cannot be decoded is an error, never a reset.
    fn load(&self, bank: &BankId) -> StorageResult<BankRecord>;

    /// Replaces a bank's record atomically.
    fn save(&self, bank: &BankId, record: &BankRecord) -> StorageResult<()>;

    /// Returns true if a record has been saved for the bank.
    fn exists(&self, bank: &BankId) -> StorageResult<bool>;

    /// Loads records for several banks, failing on the first error.
    fn load_many(&self, banks: &[BankId]) -> StorageResult<Vec<(BankId, BankRecord)>> {
        banks
            .iter()
            .map(|bank| Ok((bank.clone(), self.load(bank)?)))
            .collect()
    }
}
