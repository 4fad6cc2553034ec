//! In-memory rate store.
//!
//! Useful for tests and dry runs. Data is not persisted across restarts.

use std::collections::HashMap;
use std::sync::RwLock;

use kiwi_core::{BankId, BankRecord};

use crate::adapter::RateStore;
use crate::error::{StorageError, StorageResult};

/// In-memory rate store.
///
/// Thread-safe through an [`RwLock`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<BankId, BankRecord>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with records.
    pub fn with_records(records: impl IntoIterator<Item = (BankId, BankRecord)>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().collect()),
        }
    }

    /// Number of banks with a saved record.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Returns true if nothing has been saved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Backend(format!("Lock error: {e}"))
}

impl RateStore for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn load(&self, bank: &BankId) -> StorageResult<BankRecord> {
        Ok(self
            .records
            .read()
            .map_err(lock_error)?
            .get(bank)
            .cloned()
            .unwrap_or_default())
    }

    fn save(&self, bank: &BankId, record: &BankRecord) -> StorageResult<()> {
        self.records
            .write()
            .map_err(lock_error)?
            .insert(bank.clone(), record.clone());
        Ok(())
    }

    fn exists(&self, bank: &BankId) -> StorageResult<bool> {
        Ok(self.records.read().map_err(lock_error)?.contains_key(bank))
    }
}
