//! Integration tests for the per-bank pipeline.

use std::fs;
use std::sync::{Arc, Mutex};

use chrono::DateTime;
use kiwi_core::render::{Direction, LastChange, RenderConfig};
use kiwi_core::{BankId, ObservedBatch, ObservedRate, Timestamp};
use kiwi_engine::{EngineError, Pipeline};
use kiwi_ext_bnz::BnzParser;
use kiwi_storage::{InMemoryStore, JsonFileStore, RateStore};
use kiwi_traits::{ChangeNotice, DocumentSource, Notifier, RateSource, SourceType, TraitError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::tempdir;

// =============================================================================
// Helpers
// =============================================================================

fn ts(s: &str) -> Timestamp {
    DateTime::parse_from_rfc3339(s).unwrap()
}

fn bank(id: &str) -> BankId {
    BankId::new(id).unwrap()
}

fn batch(rates: &[(&str, &str, Decimal)]) -> ObservedBatch {
    ObservedBatch::new(
        rates
            .iter()
            .map(|(p, t, r)| ObservedRate::new(*p, *t, *r))
            .collect(),
        None,
    )
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    sent: Arc<Mutex<Vec<ChangeNotice>>>,
}

impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn notify(&self, notice: &ChangeNotice) -> Result<(), TraitError> {
        self.sent.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn notify(&self, _notice: &ChangeNotice) -> Result<(), TraitError> {
        Err(TraitError::ConnectionFailed("ntfy unreachable".into()))
    }
}

/// Source returning a fixed batch, or failing when it has none.
struct FixedSource {
    bank: BankId,
    batch: Option<ObservedBatch>,
}

impl RateSource for FixedSource {
    fn bank_id(&self) -> &BankId {
        &self.bank
    }

    fn source_type(&self) -> SourceType {
        SourceType::Static
    }

    fn fetch(&self) -> Result<ObservedBatch, TraitError> {
        self.batch
            .clone()
            .ok_or_else(|| TraitError::NotFound("API key not found in HTML".into()))
    }
}

// =============================================================================
// Single bank
// =============================================================================

#[test]
fn first_run_seeds_history_and_notifies() {
    let notifier = RecordingNotifier::default();
    let pipeline = Pipeline::new(InMemoryStore::new()).with_notifier(Box::new(notifier.clone()));
    let now = ts("2025-12-15T12:00:00+13:00");

    let outcome = pipeline
        .run_bank(
            &bank("bnz"),
            &batch(&[
                ("Standard", "1 year", dec!(4.49)),
                ("Standard", "Variable", dec!(5.84)),
            ]),
            now,
        )
        .unwrap();

    assert!(outcome.rates_changed());
    assert!(outcome.notified);
    assert_eq!(outcome.observed, 2);
    assert_eq!(outcome.scraped_at, now);

    let record = pipeline.store().load(&bank("bnz")).unwrap();
    assert_eq!(record.rates.len(), 2);
    assert!(record.rates.iter().all(|r| r.scraped_at == now));

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].changes.len(), 2);
}

#[test]
fn unchanged_rerun_appends_nothing_and_stays_quiet() {
    let notifier = RecordingNotifier::default();
    let pipeline = Pipeline::new(InMemoryStore::new()).with_notifier(Box::new(notifier.clone()));
    let observed = batch(&[("Standard", "1 year", dec!(4.49))]);

    pipeline
        .run_bank(&bank("bnz"), &observed, ts("2025-12-15T12:00:00+13:00"))
        .unwrap();
    let second = pipeline
        .run_bank(&bank("bnz"), &observed, ts("2025-12-16T12:00:00+13:00"))
        .unwrap();

    assert!(!second.rates_changed());
    assert!(!second.notified);
    assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    assert_eq!(pipeline.store().load(&bank("bnz")).unwrap().rates.len(), 1);
}

#[test]
fn changed_rate_notice_carries_old_value() {
    let notifier = RecordingNotifier::default();
    let pipeline = Pipeline::new(InMemoryStore::new()).with_notifier(Box::new(notifier.clone()));

    pipeline
        .run_bank(
            &bank("bnz"),
            &batch(&[("Standard", "1 year", dec!(4.49))]),
            ts("2025-12-15T12:00:00+13:00"),
        )
        .unwrap();
    pipeline
        .run_bank(
            &bank("bnz"),
            &batch(&[("Standard", "1 year", dec!(4.29))]),
            ts("2025-12-20T12:00:00+13:00"),
        )
        .unwrap();

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent[1].changes[0].old_rate, Some(dec!(4.49)));
    assert_eq!(sent[1].changes[0].new_rate, dec!(4.29));
}

#[test]
fn notifier_failure_does_not_fail_the_run() {
    let pipeline = Pipeline::new(InMemoryStore::new()).with_notifier(Box::new(FailingNotifier));

    let outcome = pipeline
        .run_bank(
            &bank("bnz"),
            &batch(&[("Standard", "1 year", dec!(4.49))]),
            ts("2025-12-15T12:00:00+13:00"),
        )
        .unwrap();

    assert!(outcome.rates_changed());
    assert!(!outcome.notified);
    assert_eq!(pipeline.store().load(&bank("bnz")).unwrap().rates.len(), 1);
}

#[test]
fn empty_batch_fails_without_writing() {
    let pipeline = Pipeline::new(InMemoryStore::new());

    let err = pipeline
        .run_bank(&bank("bnz"), &batch(&[]), ts("2025-12-15T12:00:00+13:00"))
        .unwrap_err();

    assert!(err.is_upstream_empty());
    assert!(!pipeline.store().exists(&bank("bnz")).unwrap());
}

#[test]
fn feed_without_rates_is_upstream_empty_and_keeps_history() {
    let pipeline = Pipeline::new(InMemoryStore::new());
    pipeline
        .run_bank(
            &bank("bnz"),
            &batch(&[("Standard", "1 year", dec!(4.49))]),
            ts("2025-12-15T12:00:00+13:00"),
        )
        .unwrap();

    let source = DocumentSource::from_file(
        BnzParser::new(bank("bnz")),
        "<rss><standard><lastupdated>Thursday, 18 December 2025</lastupdated></standard></rss>",
    );
    let err = pipeline
        .run_source(&source, ts("2025-12-19T12:00:00+13:00"))
        .unwrap_err();

    assert!(err.is_upstream_empty());
    let record = pipeline.store().load(&bank("bnz")).unwrap();
    assert_eq!(record.rates.len(), 1);
    assert_eq!(record.bank_last_updated, None);
}

#[test]
fn bank_update_time_is_saved_without_rate_changes() {
    let pipeline = Pipeline::new(InMemoryStore::new());
    let mut observed = batch(&[("Standard", "1 year", dec!(4.49))]);

    pipeline
        .run_bank(&bank("bnz"), &observed, ts("2025-12-15T12:00:00+13:00"))
        .unwrap();

    let reported = ts("2025-12-18T00:00:00+13:00");
    observed.bank_last_updated = Some(reported);
    let outcome = pipeline
        .run_bank(&bank("bnz"), &observed, ts("2025-12-19T12:00:00+13:00"))
        .unwrap();

    assert!(!outcome.rates_changed());
    let record = pipeline.store().load(&bank("bnz")).unwrap();
    assert_eq!(record.bank_last_updated, Some(reported));
    assert_eq!(record.rates.len(), 1);
}

#[test]
fn corrupt_history_is_reported_and_left_alone() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    let path = store.record_path(&bank("bnz"));
    fs::write(&path, "{\"rates\": [").unwrap();

    let pipeline = Pipeline::new(store);
    let err = pipeline
        .run_bank(
            &bank("bnz"),
            &batch(&[("Standard", "1 year", dec!(4.49))]),
            ts("2025-12-15T12:00:00+13:00"),
        )
        .unwrap_err();

    assert!(err.is_corrupt_history());
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"rates\": [");
}

// =============================================================================
// Multiple banks
// =============================================================================

#[test]
fn failing_bank_does_not_stop_the_others() {
    let pipeline = Pipeline::new(InMemoryStore::new());
    let sources: Vec<Box<dyn RateSource>> = vec![
        Box::new(FixedSource {
            bank: bank("anz"),
            batch: None,
        }),
        Box::new(FixedSource {
            bank: bank("bnz"),
            batch: Some(batch(&[("Standard", "1 year", dec!(4.49))])),
        }),
    ];

    let report = pipeline.run_all(&sources, ts("2025-12-15T12:00:00+13:00"));

    assert!(!report.all_ok());
    assert!(report.rates_changed());
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, &bank("anz"));
    assert!(matches!(failures[0].1, EngineError::Source(TraitError::NotFound(_))));
    assert_eq!(report.succeeded().count(), 1);
    assert!(pipeline.store().exists(&bank("bnz")).unwrap());
    assert!(!pipeline.store().exists(&bank("anz")).unwrap());
}

#[test]
fn render_reflects_persisted_changes() {
    let dir = tempdir().unwrap();
    let pipeline = Pipeline::new(JsonFileStore::new(dir.path()));

    pipeline
        .run_bank(
            &bank("bnz"),
            &batch(&[("Standard", "1 year", dec!(4.49))]),
            ts("2025-11-01T12:00:00+13:00"),
        )
        .unwrap();
    pipeline
        .run_bank(
            &bank("bnz"),
            &batch(&[("Standard", "1 year", dec!(4.39))]),
            ts("2025-12-10T12:00:00+13:00"),
        )
        .unwrap();

    let view = pipeline
        .render(
            &[bank("bnz")],
            ts("2025-12-15T12:00:00+13:00"),
            &RenderConfig::default(),
        )
        .unwrap();

    let rows: Vec<_> = view.rows().collect();
    assert_eq!(rows.len(), 1);
    let row = rows[0].1;
    assert_eq!(row.rate_percentage, dec!(4.39));
    assert_eq!(row.delta, dec!(-0.10));
    assert_eq!(row.direction, Direction::Decrease);
    assert!(row.is_recent_change);
    assert!(!row.is_new_product);
    assert_eq!(
        view.last_change,
        LastChange::Changed {
            at: ts("2025-12-10T12:00:00+13:00"),
            days_ago: 5,
        }
    );
}

#[test]
fn render_of_unknown_bank_is_empty() {
    let pipeline = Pipeline::new(InMemoryStore::new());
    let view = pipeline
        .render(
            &[bank("bnz")],
            ts("2025-12-15T12:00:00+13:00"),
            &RenderConfig::default(),
        )
        .unwrap();
    assert!(view.is_empty());
    assert_eq!(view.last_change, LastChange::NoChanges);
}
