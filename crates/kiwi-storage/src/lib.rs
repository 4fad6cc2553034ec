//! # Kiwi Storage
//!
//! Persistence for per-bank rate history.
//!
//! Each bank's history is one [`BankRecord`](kiwi_core::BankRecord). A store
//! loads and replaces whole records; all comparison logic lives in
//! [`kiwi_core::filter`].
//!
//! # Backends
//!
//! ## JsonFileStore (Default)
//!
//! One pretty-printed JSON document per bank under a data directory, named
//! `<bank>_rates.json`. Writes are atomic: content goes to a temporary file in
//! the same directory which is then renamed over the old document.
//!
//! A missing document loads as an empty record. A document that exists but
//! does not decode is a [`StorageError::Corrupt`] error and is never
//! silently replaced.
//!
//! ## InMemoryStore
//!
//! A simple in-memory implementation for testing.
//!
//! # Example
//!
//! ```rust,no_run
//! use kiwi_core::BankId;
//! use kiwi_storage::{JsonFileStore, RateStore};
//!
//! let store = JsonFileStore::new("./data");
//! let bank = BankId::new("bnz")?;
//! let record = store.load(&bank)?;
//! println!("{} readings", record.rates.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod adapter;
mod error;
mod file;
mod memory;

pub use adapter::RateStore;
pub use error::{StorageError, StorageResult};
pub use file::{JsonFileStore, RECORD_SUFFIX};
pub use memory::InMemoryStore;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::adapter::RateStore;
    pub use crate::error::{StorageError, StorageResult};
    pub use crate::file::JsonFileStore;
    pub use crate::memory::InMemoryStore;
}
