//! # Kiwi Core
//!
//! Rate history engine and change renderer for the Kiwi Rates tracker.
//!
//! - **Types**: [`RateReading`], [`BankRecord`], [`BankId`] and the parser
//!   boundary types [`ObservedRate`] / [`ObservedBatch`]
//! - **Change filter**: appends only readings that differ from the last
//!   stored value of their `(product, term)` series
//! - **Projection**: current / previous / first-seen per series
//! - **Renderer**: delta, direction, recency and new-product flags, and the
//!   global "last rate change" summary
//!
//! Everything in this crate is synchronous and free of I/O. Time is always
//! passed in as an explicit `now`.
//!
//! ## Example
//!
//! ```rust
//! use chrono::DateTime;
//! use kiwi_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let bank = BankId::new("bnz").unwrap();
//! let monday = DateTime::parse_from_rfc3339("2025-12-15T12:00:00+13:00").unwrap();
//! let friday = DateTime::parse_from_rfc3339("2025-12-19T12:00:00+13:00").unwrap();
//!
//! let batch = ObservedBatch::new(vec![ObservedRate::new("Standard", "1 year", dec!(4.49))], None);
//! let record = apply_batch(&bank, BankRecord::empty(), &batch, monday).unwrap().record;
//!
//! let batch = ObservedBatch::new(vec![ObservedRate::new("Standard", "1 year", dec!(4.39))], None);
//! let record = apply_batch(&bank, record, &batch, friday).unwrap().record;
//!
//! let view = render(&[BankSnapshot::from_record(bank, &record)], friday, &RenderConfig::default());
//! let row = &view.banks[0].rows[0];
//! assert_eq!(row.delta_display(), "-0.10");
//! assert!(row.is_recent_change);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod error;
pub mod filter;
pub mod projection;
pub mod render;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{KiwiError, KiwiResult};
    pub use crate::filter::{apply_batch, apply_changes, AcceptedChange, FilterOutcome};
    pub use crate::projection::{project, SeriesState};
    pub use crate::render::{
        render, BankSnapshot, BankView, Direction, LastChange, RateRow, RenderConfig,
        RenderedView,
    };
    pub use crate::types::{
        BankId, BankRecord, ObservedBatch, ObservedRate, RateReading, SeriesKey, Timestamp,
    };
}

// Re-export commonly used types at crate root
pub use error::{KiwiError, KiwiResult};
pub use types::{BankId, BankRecord, ObservedBatch, ObservedRate, RateReading, Timestamp};
