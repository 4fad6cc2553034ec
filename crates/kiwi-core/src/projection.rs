//! Latest-state projection of a bank's history.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{BankRecord, RateReading, SeriesKey, Timestamp};

/// Current view of one series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesState {
    /// Last stored reading.
    pub current: RateReading,
    /// Second-to-last stored reading, absent for a single-reading series.
    pub previous: Option<RateReading>,
    /// `scraped_at` of the first stored reading.
    pub first_seen_at: Timestamp,
}

impl SeriesState {
    fn open(reading: &RateReading) -> Self {
        Self {
            current: reading.clone(),
            previous: None,
            first_seen_at: reading.scraped_at,
        }
    }

    fn advance(&mut self, reading: &RateReading) {
        let prior = std::mem::replace(&mut self.current, reading.clone());
        self.previous = Some(prior);
    }

    /// Returns the series key.
    #[must_use]
    pub fn key(&self) -> SeriesKey {
        self.current.series_key()
    }
}

/// Projects a record into one [`SeriesState`] per distinct series.
///
/// Series are returned in the order they first appear in storage. The
/// record is only read.
#[must_use]
pub fn project(record: &BankRecord) -> Vec<SeriesState> {
    let mut index: HashMap<SeriesKey, usize> = HashMap::new();
    let mut states: Vec<SeriesState> = Vec::new();

    for reading in &record.rates {
        match index.get(&reading.series_key()) {
            Some(&i) => states[i].advance(reading),
            None => {
                index.insert(reading.series_key(), states.len());
                states.push(SeriesState::open(reading));
            }
        }
    }

    states
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn reading(term: &str, rate: Decimal, at: &str) -> RateReading {
        RateReading::new("Standard", term, rate, DateTime::parse_from_rfc3339(at).unwrap())
    }

    fn sample() -> BankRecord {
        BankRecord {
            bank_last_updated: None,
            rates: vec![
                reading("1 year", dec!(5.00), "2025-12-10T12:00:00+13:00"),
                reading("Variable", dec!(5.84), "2025-12-10T12:00:00+13:00"),
                reading("1 year", dec!(4.49), "2025-12-15T12:00:00+13:00"),
                reading("1 year", dec!(4.59), "2025-12-20T12:00:00+13:00"),
            ],
        }
    }

    #[test]
    fn test_projects_last_two_readings() {
        let states = project(&sample());
        assert_eq!(states.len(), 2);

        let one_year = &states[0];
        assert_eq!(one_year.current.rate_percentage, dec!(4.59));
        assert_eq!(
            one_year.previous.as_ref().map(|r| r.rate_percentage),
            Some(dec!(4.49))
        );
        assert_eq!(
            one_year.first_seen_at,
            DateTime::parse_from_rfc3339("2025-12-10T12:00:00+13:00").unwrap()
        );
    }

    #[test]
    fn test_single_reading_has_no_previous() {
        let states = project(&sample());
        let variable = &states[1];
        assert_eq!(variable.current.term, "Variable");
        assert!(variable.previous.is_none());
        assert_eq!(variable.first_seen_at, variable.current.scraped_at);
    }

    #[test]
    fn test_empty_record_projects_nothing() {
        assert!(project(&BankRecord::empty()).is_empty());
    }

    #[test]
    fn test_projection_is_idempotent() {
        let record = sample();
        let before = record.clone();
        let first = project(&record);
        let second = project(&record);
        assert_eq!(first, second);
        assert_eq!(record, before);
    }
}
