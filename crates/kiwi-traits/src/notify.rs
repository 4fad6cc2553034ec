//! Change notification contract.
//!
//! Delivery is best-effort: callers log a failed [`Notifier::notify`] and
//! carry on. A notifier never gets a say in whether history is saved.

use kiwi_core::filter::FilterOutcome;
use kiwi_core::BankId;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::TraitError;

/// One changed series, as shown in a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateChange {
    /// Loan product name.
    pub product_name: String,
    /// Loan term.
    pub term: String,
    /// Value before the change, `None` for a new series.
    pub old_rate: Option<Decimal>,
    /// Value after the change.
    pub new_rate: Decimal,
}

/// Everything a notifier needs to describe one bank's changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeNotice {
    /// Bank whose rates changed.
    pub bank: BankId,
    /// Changes in acceptance order.
    pub changes: Vec<RateChange>,
}

impl ChangeNotice {
    /// Builds a notice from a filter pass.
    ///
    /// Returns `None` when nothing was accepted.
    #[must_use]
    pub fn from_outcome(bank: &BankId, outcome: &FilterOutcome) -> Option<Self> {
        if !outcome.rates_changed() {
            return None;
        }
        let changes = outcome
            .accepted
            .iter()
            .map(|c| RateChange {
                product_name: c.reading.product_name.clone(),
                term: c.reading.term.clone(),
                old_rate: c.previous_rate,
                new_rate: c.reading.rate_percentage,
            })
            .collect();
        Some(Self {
            bank: bank.clone(),
            changes,
        })
    }
}

/// Delivers change notices.
pub trait Notifier: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Sends one notice.
    fn notify(&self, notice: &ChangeNotice) -> Result<(), TraitError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use kiwi_core::filter::apply_changes;
    use kiwi_core::{BankRecord, RateReading};
    use rust_decimal_macros::dec;

    #[test]
    fn test_notice_carries_previous_values() {
        let bank = BankId::new("bnz").unwrap();
        let t0 = DateTime::parse_from_rfc3339("2025-12-15T12:00:00+13:00").unwrap();
        let t1 = DateTime::parse_from_rfc3339("2025-12-20T12:00:00+13:00").unwrap();

        let seeded = apply_changes(
            &bank,
            BankRecord::empty(),
            vec![RateReading::new("Standard", "1 year", dec!(4.49), t0)],
            None,
        )
        .unwrap();
        assert_eq!(
            ChangeNotice::from_outcome(&bank, &seeded).unwrap().changes[0].old_rate,
            None
        );

        let outcome = apply_changes(
            &bank,
            seeded.record,
            vec![
                RateReading::new("Standard", "1 year", dec!(4.29), t1),
                RateReading::new("TotalMoney", "Variable", dec!(5.84), t1),
            ],
            None,
        )
        .unwrap();
        let notice = ChangeNotice::from_outcome(&bank, &outcome).unwrap();
        assert_eq!(notice.changes.len(), 2);
        assert_eq!(notice.changes[0].old_rate, Some(dec!(4.49)));
        assert_eq!(notice.changes[0].new_rate, dec!(4.29));
        assert_eq!(notice.changes[1].old_rate, None);
    }

    #[test]
    fn test_no_notice_without_changes() {
        let bank = BankId::new("bnz").unwrap();
        let t0 = DateTime::parse_from_rfc3339("2025-12-15T12:00:00+13:00").unwrap();
        let reading = RateReading::new("Standard", "1 year", dec!(4.49), t0);
        let record = BankRecord {
            bank_last_updated: None,
            rates: vec![reading.clone()],
        };
        let outcome = apply_changes(&bank, record, vec![reading], None).unwrap();
        assert!(ChangeNotice::from_outcome(&bank, &outcome).is_none());
    }
}
