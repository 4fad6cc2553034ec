//! Change filter.
//!
//! Decides which observed readings are genuine changes against stored
//! history and appends only those. Comparison is exact decimal equality
//! against the last stored value of each series, with readings accepted
//! earlier in the same batch counting as stored.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{KiwiError, KiwiResult};
use crate::types::{BankId, BankRecord, ObservedBatch, RateReading, SeriesKey, Timestamp};

/// A reading the filter accepted, with the value it replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceptedChange {
    /// The appended reading.
    pub reading: RateReading,
    /// The series value just before this reading, `None` for a new series.
    pub previous_rate: Option<Decimal>,
}

impl AcceptedChange {
    /// Returns true if this reading opened a new series.
    #[must_use]
    pub fn is_new_series(&self) -> bool {
        self.previous_rate.is_none()
    }
}

/// Result of one filter pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    /// The updated record: the input record plus accepted readings.
    pub record: BankRecord,
    /// Accepted readings in observed order.
    pub accepted: Vec<AcceptedChange>,
    /// Number of readings offered to the filter.
    pub observed: usize,
}

impl FilterOutcome {
    /// The notifier hand-off signal: true if any reading was appended.
    #[must_use]
    pub fn rates_changed(&self) -> bool {
        !self.accepted.is_empty()
    }

    /// Number of readings discarded as unchanged.
    #[must_use]
    pub fn discarded(&self) -> usize {
        self.observed - self.accepted.len()
    }
}

/// Applies observed readings to a bank's history.
///
/// `observed` readings must already carry their acceptance time. The
/// record's `bank_last_updated` is replaced whenever the caller passes
/// `Some`, independent of whether any rate changed.
///
/// # Errors
///
/// Returns [`KiwiError::UpstreamEmpty`] if `observed` is empty; the record is
/// not touched in that case.
///
/// # Example
///
/// ```rust
/// use chrono::DateTime;
/// use kiwi_core::filter::apply_changes;
/// use kiwi_core::types::{BankId, BankRecord, RateReading};
/// use rust_decimal_macros::dec;
///
/// let bank = BankId::new("bnz").unwrap();
/// let now = DateTime::parse_from_rfc3339("2025-12-20T12:00:00+13:00").unwrap();
/// let observed = vec![RateReading::new("Standard", "1 year", dec!(4.49), now)];
///
/// let first = apply_changes(&bank, BankRecord::empty(), observed.clone(), None).unwrap();
/// assert!(first.rates_changed());
///
/// let second = apply_changes(&bank, first.record, observed, None).unwrap();
/// assert!(!second.rates_changed());
/// ```
pub fn apply_changes(
    bank: &BankId,
    current: BankRecord,
    observed: Vec<RateReading>,
    bank_last_updated: Option<Timestamp>,
) -> KiwiResult<FilterOutcome> {
    if observed.is_empty() {
        return Err(KiwiError::upstream_empty(bank.as_str()));
    }

    let mut latest: HashMap<SeriesKey, Decimal> = HashMap::new();
    for reading in &current.rates {
        latest.insert(reading.series_key(), reading.rate_percentage);
    }

    let observed_count = observed.len();
    let mut record = current;
    let mut accepted = Vec::new();

    for reading in observed {
        let key = reading.series_key();
        let previous_rate = latest.get(&key).copied();
        if previous_rate == Some(reading.rate_percentage) {
            log::trace!("{bank}: {key} unchanged at {}", reading.rate_percentage);
            continue;
        }

        match previous_rate {
            Some(old) => log::debug!("{bank}: {key} changed {old} -> {}", reading.rate_percentage),
            None => log::debug!("{bank}: new series {key} at {}", reading.rate_percentage),
        }

        latest.insert(key, reading.rate_percentage);
        record.rates.push(reading.clone());
        accepted.push(AcceptedChange {
            reading,
            previous_rate,
        });
    }

    if bank_last_updated.is_some() {
        record.bank_last_updated = bank_last_updated;
    }

    Ok(FilterOutcome {
        record,
        accepted,
        observed: observed_count,
    })
}

/// Stamps a parsed batch with `now` and applies it.
///
/// # Errors
///
/// Returns [`KiwiError::UpstreamEmpty`] if the batch holds no rates.
pub fn apply_batch(
    bank: &BankId,
    current: BankRecord,
    batch: &ObservedBatch,
    now: Timestamp,
) -> KiwiResult<FilterOutcome> {
    apply_changes(bank, current, batch.stamp(now), batch.bank_last_updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use rust_decimal_macros::dec;

    fn ts(s: &str) -> Timestamp {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn bnz() -> BankId {
        BankId::new("bnz").unwrap()
    }

    fn reading(term: &str, rate: Decimal, at: &str) -> RateReading {
        RateReading::new("Standard", term, rate, ts(at))
    }

    fn seeded() -> BankRecord {
        BankRecord {
            bank_last_updated: Some(ts("2025-12-18T00:00:00+13:00")),
            rates: vec![
                reading("1 year", dec!(4.49), "2025-12-15T12:00:00+13:00"),
                reading("Variable", dec!(5.84), "2025-12-15T12:00:00+13:00"),
            ],
        }
    }

    const NOW: &str = "2025-12-22T12:00:00+13:00";

    #[test]
    fn test_first_observation_is_accepted() {
        let outcome = apply_changes(
            &bnz(),
            BankRecord::empty(),
            vec![reading("1 year", dec!(4.49), NOW)],
            None,
        )
        .unwrap();

        assert!(outcome.rates_changed());
        assert_eq!(outcome.record.rates.len(), 1);
        assert!(outcome.accepted[0].is_new_series());
    }

    #[test]
    fn test_unchanged_rate_is_discarded() {
        let outcome = apply_changes(
            &bnz(),
            seeded(),
            vec![reading("1 year", dec!(4.49), NOW)],
            None,
        )
        .unwrap();

        assert!(!outcome.rates_changed());
        assert_eq!(outcome.record.rates, seeded().rates);
        assert_eq!(outcome.discarded(), 1);
    }

    #[test]
    fn test_changed_rate_is_appended_with_previous() {
        let outcome = apply_changes(
            &bnz(),
            seeded(),
            vec![
                reading("1 year", dec!(4.29), NOW),
                reading("Variable", dec!(5.84), NOW),
            ],
            None,
        )
        .unwrap();

        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.accepted[0].previous_rate, Some(dec!(4.49)));
        assert_eq!(outcome.record.rates.len(), 3);
        assert_eq!(outcome.record.rates[2].rate_percentage, dec!(4.29));
        // Existing readings are untouched.
        assert_eq!(&outcome.record.rates[..2], &seeded().rates[..]);
    }

    #[test]
    fn test_comparison_is_exact_decimal() {
        // Same value at a different scale is not a change.
        let outcome = apply_changes(
            &bnz(),
            seeded(),
            vec![reading("1 year", dec!(4.490), NOW)],
            None,
        )
        .unwrap();
        assert!(!outcome.rates_changed());

        // The smallest representable difference is.
        let outcome = apply_changes(
            &bnz(),
            seeded(),
            vec![reading("1 year", dec!(4.4901), NOW)],
            None,
        )
        .unwrap();
        assert!(outcome.rates_changed());
    }

    #[test]
    fn test_compares_against_last_not_first_stored_value() {
        let mut record = seeded();
        record
            .rates
            .push(reading("1 year", dec!(4.39), "2025-12-20T12:00:00+13:00"));

        // Back to the original value is a change against 4.39.
        let outcome = apply_changes(
            &bnz(),
            record,
            vec![reading("1 year", dec!(4.49), NOW)],
            None,
        )
        .unwrap();
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.accepted[0].previous_rate, Some(dec!(4.39)));
    }

    #[test]
    fn test_duplicates_within_batch_use_running_value() {
        let outcome = apply_changes(
            &bnz(),
            seeded(),
            vec![
                reading("1 year", dec!(4.29), NOW),
                reading("1 year", dec!(4.29), NOW),
                reading("1 year", dec!(4.49), NOW),
            ],
            None,
        )
        .unwrap();

        let rates: Vec<_> = outcome
            .accepted
            .iter()
            .map(|c| c.reading.rate_percentage)
            .collect();
        assert_eq!(rates, vec![dec!(4.29), dec!(4.49)]);
        assert_eq!(outcome.accepted[1].previous_rate, Some(dec!(4.29)));
    }

    #[test]
    fn test_empty_observed_is_upstream_error() {
        let err = apply_changes(&bnz(), seeded(), Vec::new(), None).unwrap_err();
        assert_eq!(err, KiwiError::upstream_empty("bnz"));
    }

    #[test]
    fn test_bank_last_updated_replaced_when_reported() {
        let reported = ts("2026-01-05T00:00:00+13:00");
        let outcome = apply_changes(
            &bnz(),
            seeded(),
            vec![reading("1 year", dec!(4.49), NOW)],
            Some(reported),
        )
        .unwrap();
        assert_eq!(outcome.record.bank_last_updated, Some(reported));
        assert!(!outcome.rates_changed());
    }

    #[test]
    fn test_bank_last_updated_kept_when_not_reported() {
        let outcome = apply_changes(
            &bnz(),
            seeded(),
            vec![reading("1 year", dec!(4.49), NOW)],
            None,
        )
        .unwrap();
        assert_eq!(outcome.record.bank_last_updated, seeded().bank_last_updated);
    }

    #[test]
    fn test_apply_batch_stamps_now() {
        use crate::types::{ObservedBatch, ObservedRate};

        let batch = ObservedBatch::new(
            vec![ObservedRate::new("Standard", "2 years", dec!(4.69))],
            None,
        );
        let outcome = apply_batch(&bnz(), seeded(), &batch, ts(NOW)).unwrap();
        assert_eq!(outcome.accepted[0].reading.scraped_at, ts(NOW));
    }
}
