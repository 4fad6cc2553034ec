//! Domain types for rate history tracking.
//!
//! - [`BankId`]: explicit bank identifier
//! - [`RateReading`]: one accepted, time-stamped rate observation
//! - [`BankRecord`]: append-only history of one bank
//! - [`ObservedRate`] / [`ObservedBatch`]: parser output before acceptance
//! - [`SeriesKey`]: `(product_name, term)` identity of a series

mod bank;
mod reading;
mod record;

pub use bank::BankId;
pub use reading::{ObservedBatch, ObservedRate, RateReading, SeriesKey, Timestamp};
pub use record::BankRecord;
