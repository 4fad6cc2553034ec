//! Rate readings and the parser boundary types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{KiwiError, KiwiResult};

/// Zoned timestamp as stored in rate history (bank-local offset preserved).
pub type Timestamp = DateTime<FixedOffset>;

/// Identity of one tracked loan rate line: `(product_name, term)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesKey {
    /// Loan product, e.g. "Standard".
    pub product_name: String,
    /// Loan term, e.g. "1 year" or "Variable".
    pub term: String,
}

impl SeriesKey {
    /// Creates a new series key.
    pub fn new(product_name: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            term: term.into(),
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.product_name, self.term)
    }
}

/// One accepted rate observation for a series.
///
/// `scraped_at` is the moment the reading was accepted into history, not the
/// moment the feed was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateReading {
    /// When this reading was accepted.
    pub scraped_at: Timestamp,
    /// Loan product name.
    pub product_name: String,
    /// Loan term.
    pub term: String,
    /// Interest rate in percent (4.49 means 4.49%).
    #[serde(deserialize_with = "deserialize_rate_number")]
    pub rate_percentage: Decimal,
}

/// Reads a rate stored as a JSON number. Strings and other types are errors.
fn deserialize_rate_number<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Decimal::from_str(&value.to_string()).map_err(serde::de::Error::custom)
}

impl RateReading {
    /// Creates a new reading.
    pub fn new(
        product_name: impl Into<String>,
        term: impl Into<String>,
        rate_percentage: Decimal,
        scraped_at: Timestamp,
    ) -> Self {
        Self {
            scraped_at,
            product_name: product_name.into(),
            term: term.into(),
            rate_percentage,
        }
    }

    /// Returns the series this reading belongs to.
    #[must_use]
    pub fn series_key(&self) -> SeriesKey {
        SeriesKey::new(&self.product_name, &self.term)
    }

    /// Returns true if this reading belongs to the given series.
    #[must_use]
    pub fn is_series(&self, key: &SeriesKey) -> bool {
        self.product_name == key.product_name && self.term == key.term
    }
}

/// A rate as reported by a bank feed, before it is stamped with a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedRate {
    /// Loan product name.
    pub product_name: String,
    /// Loan term.
    pub term: String,
    /// Interest rate in percent.
    pub rate_percentage: Decimal,
}

impl ObservedRate {
    /// Creates an observed rate from an already-parsed decimal.
    pub fn new(
        product_name: impl Into<String>,
        term: impl Into<String>,
        rate_percentage: Decimal,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            term: term.into(),
            rate_percentage,
        }
    }

    /// Creates an observed rate from raw feed text.
    ///
    /// The rate text must be a plain decimal number. Anything else is
    /// rejected rather than coerced.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kiwi_core::types::ObservedRate;
    /// use rust_decimal_macros::dec;
    ///
    /// let rate = ObservedRate::parse("Standard", "1 year", " 4.49 ").unwrap();
    /// assert_eq!(rate.rate_percentage, dec!(4.49));
    /// assert!(ObservedRate::parse("Standard", "1 year", "n/a").is_err());
    /// ```
    pub fn parse(
        product_name: impl Into<String>,
        term: impl Into<String>,
        raw_rate: &str,
    ) -> KiwiResult<Self> {
        let trimmed = raw_rate.trim();
        if trimmed.is_empty() {
            return Err(KiwiError::invalid_rate(raw_rate, "empty value"));
        }
        let rate_percentage = Decimal::from_str(trimmed)
            .map_err(|e| KiwiError::invalid_rate(trimmed, e.to_string()))?;
        Ok(Self::new(product_name, term, rate_percentage))
    }

    /// Returns the series this rate belongs to.
    #[must_use]
    pub fn series_key(&self) -> SeriesKey {
        SeriesKey::new(&self.product_name, &self.term)
    }

    /// Stamps this rate with an acceptance time.
    #[must_use]
    pub fn at(self, scraped_at: Timestamp) -> RateReading {
        RateReading {
            scraped_at,
            product_name: self.product_name,
            term: self.term,
            rate_percentage: self.rate_percentage,
        }
    }
}

/// Everything one parse of a bank feed produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedBatch {
    /// Rates in feed order.
    pub rates: Vec<ObservedRate>,
    /// The bank's own claim of when it last changed its rates.
    pub bank_last_updated: Option<Timestamp>,
}

impl ObservedBatch {
    /// Creates a batch.
    #[must_use]
    pub fn new(rates: Vec<ObservedRate>, bank_last_updated: Option<Timestamp>) -> Self {
        Self {
            rates,
            bank_last_updated,
        }
    }

    /// Returns true if the batch holds no rates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Returns the number of rates in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Stamps every rate with `now`, preserving feed order.
    #[must_use]
    pub fn stamp(&self, now: Timestamp) -> Vec<RateReading> {
        self.rates.iter().cloned().map(|r| r.at(now)).collect()
    }
}
