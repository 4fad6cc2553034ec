//! Per-bank rate history record.

use serde::{Deserialize, Serialize};

use super::reading::{RateReading, SeriesKey, Timestamp};

/// Append-only rate history of one bank.
///
/// `rates` is kept in acceptance order with series interleaved. The record
/// is never reordered or edited in place; the change filter only appends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankRecord {
    /// The bank's own claim of when it last changed rates, if it reports one.
    ///
    /// Required in persisted documents, `null` allowed.
    #[serde(deserialize_with = "Option::deserialize")]
    pub bank_last_updated: Option<Timestamp>,
    /// Accepted readings, oldest first.
    pub rates: Vec<RateReading>,
}

impl BankRecord {
    /// Creates an empty seed record.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if no readings have been accepted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Iterates the readings of one series in storage order.
    pub fn series<'a>(&'a self, key: &'a SeriesKey) -> impl Iterator<Item = &'a RateReading> + 'a {
        self.rates.iter().filter(move |r| r.is_series(key))
    }

    /// Returns the last stored reading of a series.
    #[must_use]
    pub fn latest(&self, key: &SeriesKey) -> Option<&RateReading> {
        self.rates.iter().rev().find(|r| r.is_series(key))
    }
}
