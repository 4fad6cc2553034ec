//! Change renderer.
//!
//! Turns projected series state across all banks into annotated display
//! rows. Output depends only on the snapshots, `now` and the window
//! configuration.

use chrono::Duration;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::projection::{project, SeriesState};
use crate::types::{BankId, BankRecord, Timestamp};

/// Default lookback for highlighting a recent change, in days.
pub const RECENCY_WINDOW_DAYS: i64 = 14;

/// Default lookback since first appearance for the "new" badge, in days.
pub const NEW_PRODUCT_WINDOW_DAYS: i64 = 30;

const SECONDS_PER_DAY: i64 = 86_400;

/// Window settings for the renderer. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// How long after a change the row stays highlighted.
    pub recency_window: Duration,
    /// How long after first appearance a series carries the new badge.
    pub new_product_window: Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            recency_window: Duration::days(RECENCY_WINDOW_DAYS),
            new_product_window: Duration::days(NEW_PRODUCT_WINDOW_DAYS),
        }
    }
}

impl RenderConfig {
    /// Creates a config from window lengths in days.
    #[must_use]
    pub fn from_days(recency_days: i64, new_product_days: i64) -> Self {
        Self {
            recency_window: Duration::days(recency_days),
            new_product_window: Duration::days(new_product_days),
        }
    }
}

/// Direction of the latest change of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Rate went up: costlier for borrowers.
    Increase,
    /// Rate went down: cheaper for borrowers.
    Decrease,
    /// No change, or first appearance.
    Unchanged,
}

impl Direction {
    /// Classifies a delta by its sign.
    #[must_use]
    pub fn from_delta(delta: Decimal) -> Self {
        if delta > Decimal::ZERO {
            Self::Increase
        } else if delta < Decimal::ZERO {
            Self::Decrease
        } else {
            Self::Unchanged
        }
    }

    /// CSS class used by the HTML page.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Increase => "rate-change-positive",
            Self::Decrease => "rate-change-negative",
            Self::Unchanged => "rate-change-neutral",
        }
    }
}

/// Projected state of one bank, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankSnapshot {
    /// Bank the series belong to.
    pub bank: BankId,
    /// Bank-reported last update, passed through for display.
    pub bank_last_updated: Option<Timestamp>,
    /// One entry per series.
    pub series: Vec<SeriesState>,
}

impl BankSnapshot {
    /// Projects a stored record.
    #[must_use]
    pub fn from_record(bank: BankId, record: &BankRecord) -> Self {
        Self {
            bank,
            bank_last_updated: record.bank_last_updated,
            series: project(record),
        }
    }
}

/// One annotated display row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateRow {
    /// Loan product name.
    pub product_name: String,
    /// Loan term.
    pub term: String,
    /// Current rate in percent.
    pub rate_percentage: Decimal,
    /// Previous rate, if the series has one.
    pub previous_rate: Option<Decimal>,
    /// `current - previous`, zero on first appearance.
    pub delta: Decimal,
    /// Sign of `delta`.
    pub direction: Direction,
    /// True when there is no previous reading to compare against.
    pub first_appearance: bool,
    /// Changed within the recency window.
    pub is_recent_change: bool,
    /// First seen within the new-product window.
    pub is_new_product: bool,
    /// When the current reading was accepted.
    pub updated_at: Timestamp,
    /// Whole days since the current reading was accepted.
    pub days_since_update: i64,
    /// Whole days since the series first appeared.
    pub days_since_first_seen: i64,
}

impl RateRow {
    /// Delta formatted for display, e.g. `+0.26`, `-0.20`, `0.00`.
    #[must_use]
    pub fn delta_display(&self) -> String {
        format_delta(self.delta)
    }

    /// Rate formatted for display, e.g. `4.39`.
    #[must_use]
    pub fn rate_display(&self) -> String {
        format_rate(self.rate_percentage)
    }
}

/// Rows of one bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankView {
    /// Bank id.
    pub bank: BankId,
    /// Bank-reported last update.
    pub bank_last_updated: Option<Timestamp>,
    /// Rows sorted by product then term.
    pub rows: Vec<RateRow>,
}

/// Most recent genuine change across all banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LastChange {
    /// At least one series has a non-zero delta.
    Changed {
        /// Acceptance time of the most recent change.
        at: Timestamp,
        /// Whole days between that change and `now`.
        days_ago: i64,
    },
    /// No series has ever had a non-zero delta.
    NoChanges,
}

/// Full renderer output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedView {
    /// Reference time the view was rendered against.
    pub now: Timestamp,
    /// Banks sorted by id.
    pub banks: Vec<BankView>,
    /// Global last-change summary.
    pub last_change: LastChange,
}

impl RenderedView {
    /// Returns true if no bank has any rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.banks.iter().all(|b| b.rows.is_empty())
    }

    /// Iterates all rows with their bank.
    pub fn rows(&self) -> impl Iterator<Item = (&BankId, &RateRow)> {
        self.banks
            .iter()
            .flat_map(|b| b.rows.iter().map(move |r| (&b.bank, r)))
    }
}

/// Whole days from `earlier` to `now`, rounded towards negative infinity.
#[must_use]
pub fn days_between(earlier: Timestamp, now: Timestamp) -> i64 {
    (now - earlier).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Formats a delta with two decimals and an explicit sign for increases.
///
/// ```rust
/// use kiwi_core::render::format_delta;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_delta(dec!(0.26)), "+0.26");
/// assert_eq!(format_delta(dec!(-0.2)), "-0.20");
/// assert_eq!(format_delta(dec!(0)), "0.00");
/// ```
#[must_use]
pub fn format_delta(delta: Decimal) -> String {
    let rounded = delta.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        "0.00".to_string()
    } else if rounded.is_sign_positive() {
        format!("+{rounded:.2}")
    } else {
        format!("{rounded:.2}")
    }
}

/// Formats a rate with two decimals, rounding half away from zero like
/// [`format_delta`].
#[must_use]
pub fn format_rate(rate: Decimal) -> String {
    let rounded = rate.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Annotates one series.
#[must_use]
pub fn render_row(state: &SeriesState, now: Timestamp, config: &RenderConfig) -> RateRow {
    let current = &state.current;
    let previous_rate = state.previous.as_ref().map(|p| p.rate_percentage);
    let delta = previous_rate.map_or(Decimal::ZERO, |p| current.rate_percentage - p);
    let since_update = now - current.scraped_at;

    RateRow {
        product_name: current.product_name.clone(),
        term: current.term.clone(),
        rate_percentage: current.rate_percentage,
        previous_rate,
        delta,
        direction: Direction::from_delta(delta),
        first_appearance: previous_rate.is_none(),
        is_recent_change: previous_rate.is_some()
            && !delta.is_zero()
            && since_update <= config.recency_window,
        is_new_product: now - state.first_seen_at <= config.new_product_window,
        updated_at: current.scraped_at,
        days_since_update: days_between(current.scraped_at, now),
        days_since_first_seen: days_between(state.first_seen_at, now),
    }
}

/// Renders all banks against `now`.
///
/// # Example
///
/// ```rust
/// use chrono::DateTime;
/// use kiwi_core::render::{render, BankSnapshot, LastChange, RenderConfig};
/// use kiwi_core::types::{BankId, BankRecord, RateReading};
/// use rust_decimal_macros::dec;
///
/// let at = DateTime::parse_from_rfc3339("2025-12-15T12:00:00+13:00").unwrap();
/// let record = BankRecord {
///     bank_last_updated: None,
///     rates: vec![RateReading::new("Standard", "1 year", dec!(4.49), at)],
/// };
/// let snapshot = BankSnapshot::from_record(BankId::new("bnz").unwrap(), &record);
///
/// let view = render(&[snapshot], at, &RenderConfig::default());
/// assert_eq!(view.last_change, LastChange::NoChanges);
/// assert_eq!(view.banks[0].rows[0].delta_display(), "0.00");
/// ```
#[must_use]
pub fn render(snapshots: &[BankSnapshot], now: Timestamp, config: &RenderConfig) -> RenderedView {
    let mut banks: Vec<BankView> = snapshots
        .iter()
        .map(|snapshot| {
            let mut rows: Vec<RateRow> = snapshot
                .series
                .iter()
                .map(|state| render_row(state, now, config))
                .collect();
            rows.sort_by(|a, b| {
                (&a.product_name, &a.term).cmp(&(&b.product_name, &b.term))
            });
            BankView {
                bank: snapshot.bank.clone(),
                bank_last_updated: snapshot.bank_last_updated,
                rows,
            }
        })
        .collect();
    banks.sort_by(|a, b| a.bank.cmp(&b.bank));

    let last_change = banks
        .iter()
        .flat_map(|b| b.rows.iter())
        .filter(|row| !row.delta.is_zero())
        .map(|row| row.updated_at)
        .max()
        .map_or(LastChange::NoChanges, |at| LastChange::Changed {
            at,
            days_ago: days_between(at, now),
        });

    RenderedView {
        now,
        banks,
        last_change,
    }
}
