//! JSON file store.
//!
//! One pretty-printed document per bank, `<data_dir>/<bank>_rates.json`.
//! Saves go through a temporary file in the same directory that is then
//! renamed over the target, so an interrupted run leaves either the old or
//! the new document.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use kiwi_core::{BankId, BankRecord, RateReading};
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::adapter::RateStore;
use crate::error::{StorageError, StorageResult};

/// File name suffix of bank record documents.
pub const RECORD_SUFFIX: &str = "_rates.json";

/// Directory-backed JSON store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `data_dir`. The directory is created on
    /// first save.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Returns the data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the document path for a bank.
    #[must_use]
    pub fn record_path(&self, bank: &BankId) -> PathBuf {
        self.data_dir.join(format!("{}{RECORD_SUFFIX}", bank.as_str()))
    }

    fn decode(bank: &BankId, content: &str) -> StorageResult<BankRecord> {
        serde_json::from_str(content)
            .map_err(|err| StorageError::corrupt(bank.as_str(), describe_decode_error(content, &err)))
    }
}

/// Points at the first bad reading when the top-level shape is fine.
///
/// serde_json reports a line and column but not the array index, which is
/// what one needs to fix a hand-edited history file.
fn describe_decode_error(content: &str, err: &serde_json::Error) -> String {
    let Ok(Value::Object(doc)) = serde_json::from_str::<Value>(content) else {
        return err.to_string();
    };
    let Some(Value::Array(rates)) = doc.get("rates") else {
        return err.to_string();
    };
    for (index, item) in rates.iter().enumerate() {
        if let Err(item_err) = serde_json::from_value::<RateReading>(item.clone()) {
            return format!("rates[{index}]: {item_err}");
        }
    }
    err.to_string()
}

impl RateStore for JsonFileStore {
    fn backend_name(&self) -> &'static str {
        "json-file"
    }

    fn load(&self, bank: &BankId) -> StorageResult<BankRecord> {
        let path = self.record_path(bank);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let record = Self::decode(bank, &content)?;
                tracing::debug!(
                    bank = %bank,
                    path = %path.display(),
                    readings = record.rates.len(),
                    "Loaded rate history"
                );
                Ok(record)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(bank = %bank, path = %path.display(), "No rate history yet, seeding");
                Ok(BankRecord::empty())
            }
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    fn save(&self, bank: &BankId, record: &BankRecord) -> StorageResult<()> {
        fs::create_dir_all(&self.data_dir).map_err(|e| StorageError::io(&self.data_dir, e))?;

        let path = self.record_path(bank);
        let mut content = serde_json::to_string_pretty(record)?;
        content.push('\n');

        let mut tmp =
            NamedTempFile::new_in(&self.data_dir).map_err(|e| StorageError::io(&self.data_dir, e))?;
        tmp.write_all(content.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| StorageError::io(tmp.path(), e))?;
        tmp.persist(&path)
            .map_err(|e| StorageError::io(&path, e.error))?;

        tracing::debug!(
            bank = %bank,
            path = %path.display(),
            readings = record.rates.len(),
            "Saved rate history"
        );
        Ok(())
    }

    fn exists(&self, bank: &BankId) -> StorageResult<bool> {
        Ok(self.record_path(bank).is_file())
    }
}
