//! Per-bank pipeline: fetch, filter, persist, notify.
//!
//! Every bank is processed independently. A bank whose fetch, parse or
//! history load fails is reported and skipped; the other banks still run.
//! Notification happens only after the record is saved and its failure is
//! logged, never propagated.

use kiwi_core::filter::{apply_batch, AcceptedChange};
use kiwi_core::render::{render, BankSnapshot, RenderConfig, RenderedView};
use kiwi_core::{BankId, ObservedBatch, Timestamp};
use kiwi_storage::RateStore;
use kiwi_traits::{ChangeNotice, Notifier, RateSource};
use serde::Serialize;

use crate::error::{EngineError, EngineResult};

/// What one bank run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankRunOutcome {
    /// Bank processed.
    pub bank: BankId,
    /// Time stamped on accepted readings.
    pub scraped_at: Timestamp,
    /// Readings offered to the filter.
    pub observed: usize,
    /// Readings appended to history.
    pub accepted: Vec<AcceptedChange>,
    /// True if a notice was delivered.
    pub notified: bool,
}

impl BankRunOutcome {
    /// True if any reading was appended.
    #[must_use]
    pub fn rates_changed(&self) -> bool {
        !self.accepted.is_empty()
    }
}

/// Result for one bank in a multi-bank run.
#[derive(Debug)]
pub struct BankRunResult {
    /// Bank processed.
    pub bank: BankId,
    /// Outcome or the error that stopped this bank.
    pub result: EngineResult<BankRunOutcome>,
}

/// Results of a multi-bank run, in source order.
#[derive(Debug, Default)]
pub struct RunReport {
    /// One entry per source.
    pub results: Vec<BankRunResult>,
}

impl RunReport {
    /// Successful outcomes.
    pub fn succeeded(&self) -> impl Iterator<Item = &BankRunOutcome> {
        self.results.iter().filter_map(|r| r.result.as_ref().ok())
    }

    /// Failed banks with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&BankId, &EngineError)> {
        self.results
            .iter()
            .filter_map(|r| r.result.as_ref().err().map(|e| (&r.bank, e)))
    }

    /// True if every bank succeeded.
    #[must_use]
    pub fn all_ok(&self) -> bool {
        self.results.iter().all(|r| r.result.is_ok())
    }

    /// True if any bank appended readings.
    #[must_use]
    pub fn rates_changed(&self) -> bool {
        self.succeeded().any(BankRunOutcome::rates_changed)
    }
}

/// Orchestrates store, filter and notifier.
///
/// # Example
///
/// ```rust
/// use chrono::DateTime;
/// use kiwi_core::{BankId, ObservedBatch, ObservedRate};
/// use kiwi_engine::Pipeline;
/// use kiwi_storage::InMemoryStore;
/// use rust_decimal_macros::dec;
///
/// let pipeline = Pipeline::new(InMemoryStore::new());
/// let bank = BankId::new("bnz").unwrap();
/// let now = DateTime::parse_from_rfc3339("2025-12-20T12:00:00+13:00").unwrap();
/// let batch = ObservedBatch::new(
///     vec![ObservedRate::new("Standard", "1 year", dec!(4.49))],
///     None,
/// );
///
/// assert!(pipeline.run_bank(&bank, &batch, now).unwrap().rates_changed());
/// assert!(!pipeline.run_bank(&bank, &batch, now).unwrap().rates_changed());
/// ```
pub struct Pipeline<S> {
    store: S,
    notifier: Option<Box<dyn Notifier>>,
}

impl<S: RateStore> Pipeline<S> {
    /// Creates a pipeline without notification.
    pub fn new(store: S) -> Self {
        Self {
            store,
            notifier: None,
        }
    }

    /// Attaches a notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Attaches a notifier if one is configured.
    #[must_use]
    pub fn with_optional_notifier(mut self, notifier: Option<Box<dyn Notifier>>) -> Self {
        self.notifier = notifier;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Applies an already parsed batch to one bank.
    ///
    /// Loads the bank's record, filters the batch against it and saves the
    /// result. The record is saved even if no rate changed so a new
    /// bank-reported update time is kept.
    ///
    /// # Errors
    ///
    /// Fails on an empty batch, unreadable history or a failed save. Nothing
    /// is written in the first two cases.
    pub fn run_bank(
        &self,
        bank: &BankId,
        batch: &ObservedBatch,
        now: Timestamp,
    ) -> EngineResult<BankRunOutcome> {
        let current = self.store.load(bank)?;
        let outcome = apply_batch(bank, current, batch, now)?;
        self.store.save(bank, &outcome.record)?;

        tracing::info!(
            bank = %bank,
            observed = outcome.observed,
            accepted = outcome.accepted.len(),
            discarded = outcome.discarded(),
            "Rate history updated"
        );

        let notified = match ChangeNotice::from_outcome(bank, &outcome) {
            Some(notice) => self.deliver(&notice),
            None => false,
        };

        Ok(BankRunOutcome {
            bank: bank.clone(),
            scraped_at: now,
            observed: outcome.observed,
            accepted: outcome.accepted,
            notified,
        })
    }

    fn deliver(&self, notice: &ChangeNotice) -> bool {
        let Some(notifier) = &self.notifier else {
            return false;
        };
        match notifier.notify(notice) {
            Ok(()) => {
                tracing::info!(
                    bank = %notice.bank,
                    notifier = notifier.name(),
                    changes = notice.changes.len(),
                    "Notification sent"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    bank = %notice.bank,
                    notifier = notifier.name(),
                    error = %e,
                    "Notification failed"
                );
                false
            }
        }
    }

    /// Fetches from a source and runs its bank.
    ///
    /// # Errors
    ///
    /// Propagates fetch failures in addition to those of [`Self::run_bank`].
    pub fn run_source(&self, source: &dyn RateSource, now: Timestamp) -> EngineResult<BankRunOutcome> {
        let bank = source.bank_id();
        tracing::debug!(bank = %bank, source = ?source.source_type(), "Fetching rates");
        let batch = source.fetch()?;
        self.run_bank(bank, &batch, now)
    }

    /// Runs every source, isolating failures per bank.
    pub fn run_all(&self, sources: &[Box<dyn RateSource>], now: Timestamp) -> RunReport {
        let mut report = RunReport::default();
        for source in sources {
            let bank = source.bank_id().clone();
            let result = self.run_source(source.as_ref(), now);
            if let Err(e) = &result {
                tracing::error!(bank = %bank, error = %e, "Bank run failed");
            }
            report.results.push(BankRunResult { bank, result });
        }
        report
    }

    /// Projects the stored history of several banks.
    ///
    /// # Errors
    ///
    /// Fails on the first bank whose history cannot be loaded.
    pub fn snapshots(&self, banks: &[BankId]) -> EngineResult<Vec<BankSnapshot>> {
        Ok(self
            .store
            .load_many(banks)?
            .into_iter()
            .map(|(bank, record)| BankSnapshot::from_record(bank, &record))
            .collect())
    }

    /// Projects and renders the stored history of several banks.
    ///
    /// # Errors
    ///
    /// Fails on the first bank whose history cannot be loaded.
    pub fn render(
        &self,
        banks: &[BankId],
        now: Timestamp,
        config: &RenderConfig,
    ) -> EngineResult<RenderedView> {
        Ok(render(&self.snapshots(banks)?, now, config))
    }
}
