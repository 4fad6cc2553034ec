//! BNZ rates feed parser.
//!
//! The feed is an RSS-like XML document:
//!
//! ```xml
//! <rss version="2.0">
//!   <standard type="HL">
//!     <lastupdated>Thursday, 18 December 2025</lastupdated>
//!     <rate>
//!       <label>Standard</label>
//!       <term>1 year</term>
//!       <interest>4.49</interest>
//!     </rate>
//!   </standard>
//! </rss>
//! ```
//!
//! Every `<rate>` whose direct `<label>`, `<term>` and `<interest>` children
//! are all non-empty yields one observed rate. Other elements are ignored.

use chrono::{NaiveDate, TimeZone};
use chrono_tz::Pacific::Auckland;
use kiwi_core::{BankId, KiwiError, ObservedBatch, ObservedRate, Timestamp};
use kiwi_traits::{FeedParser, TraitError};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Logged when a feed parses but holds no rates.
const NO_RATES_MESSAGE: &str =
    "No rates found in XML feed - BNZ API may be down or response format changed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Label,
    Term,
    Interest,
    LastUpdated,
}

impl Field {
    fn from_rate_child(name: &[u8]) -> Option<Self> {
        match name {
            b"label" => Some(Field::Label),
            b"term" => Some(Field::Term),
            b"interest" => Some(Field::Interest),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct PendingRate {
    depth: usize,
    label: String,
    term: String,
    interest: String,
}

impl PendingRate {
    fn field_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Label => Some(&mut self.label),
            Field::Term => Some(&mut self.term),
            Field::Interest => Some(&mut self.interest),
            Field::LastUpdated => None,
        }
    }

    fn finish(self) -> Result<Option<ObservedRate>, TraitError> {
        let label = self.label.trim();
        let term = self.term.trim();
        let interest = self.interest.trim();
        if label.is_empty() || term.is_empty() || interest.is_empty() {
            tracing::debug!(label, term, interest, "Skipping incomplete rate element");
            return Ok(None);
        }
        Ok(Some(ObservedRate::parse(label, term, interest)?))
    }
}

/// Parser for the BNZ home loan rates feed.
#[derive(Debug, Clone)]
pub struct BnzParser {
    bank: BankId,
}

impl BnzParser {
    /// Creates a parser that reports rates for `bank`.
    pub fn new(bank: BankId) -> Self {
        Self { bank }
    }
}

impl FeedParser for BnzParser {
    fn bank_id(&self) -> &BankId {
        &self.bank
    }

    fn parse(&self, raw: &str) -> Result<ObservedBatch, TraitError> {
        let mut reader = Reader::from_str(raw);
        reader.config_mut().trim_text(true);

        let mut depth = 0usize;
        let mut pending: Option<PendingRate> = None;
        let mut field: Option<Field> = None;
        let mut last_updated_text: Option<String> = None;
        let mut rates = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                TraitError::ParseError(format!(
                    "invalid XML at byte {}: {e}",
                    reader.buffer_position()
                ))
            })?;
            match event {
                Event::Start(e) => {
                    depth += 1;
                    let name = e.local_name();
                    let name = name.as_ref();
                    match pending.as_ref().map(|r| r.depth) {
                        Some(rate_depth) => {
                            if depth == rate_depth + 1 {
                                field = Field::from_rate_child(name);
                            }
                        }
                        None if name == b"rate" => {
                            pending = Some(PendingRate {
                                depth,
                                ..PendingRate::default()
                            });
                        }
                        None if name == b"lastupdated" && last_updated_text.is_none() => {
                            field = Some(Field::LastUpdated);
                            last_updated_text = Some(String::new());
                        }
                        None => {}
                    }
                }
                Event::End(_) => {
                    if pending.as_ref().is_some_and(|r| r.depth == depth) {
                        if let Some(rate) = pending.take() {
                            if let Some(observed) = rate.finish()? {
                                rates.push(observed);
                            }
                        }
                    }
                    field = None;
                    depth = depth.saturating_sub(1);
                }
                Event::Text(t) => {
                    let text = t
                        .unescape()
                        .map_err(|e| TraitError::ParseError(format!("invalid text: {e}")))?;
                    push_text(field, &mut pending, &mut last_updated_text, &text);
                }
                Event::CData(c) => {
                    let text = String::from_utf8_lossy(&c);
                    push_text(field, &mut pending, &mut last_updated_text, &text);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if rates.is_empty() {
            tracing::warn!(bank = %self.bank, "{}", NO_RATES_MESSAGE);
            return Err(KiwiError::upstream_empty(self.bank.as_str()).into());
        }

        let bank_last_updated = last_updated_text.as_deref().and_then(|text| {
            let parsed = parse_last_updated(text);
            if parsed.is_none() {
                tracing::warn!(bank = %self.bank, text, "Unrecognised lastupdated value, ignoring");
            }
            parsed
        });

        tracing::debug!(
            bank = %self.bank,
            rates = rates.len(),
            last_updated = ?bank_last_updated,
            "Parsed BNZ feed"
        );
        Ok(ObservedBatch::new(rates, bank_last_updated))
    }
}

fn push_text(
    field: Option<Field>,
    pending: &mut Option<PendingRate>,
    last_updated: &mut Option<String>,
    text: &str,
) {
    match (field, pending.as_mut()) {
        (Some(Field::LastUpdated), _) => {
            if let Some(buf) = last_updated.as_mut() {
                buf.push_str(text);
            }
        }
        (Some(f), Some(rate)) => {
            if let Some(buf) = rate.field_mut(f) {
                buf.push_str(text);
            }
        }
        _ => {}
    }
}

/// Parses a BNZ date such as `Thursday, 18 December 2025` as midnight in
/// Auckland. The weekday prefix is optional.
#[must_use]
pub fn parse_last_updated(text: &str) -> Option<Timestamp> {
    let text = text.trim();
    let date_part = text.split_once(", ").map_or(text, |(_, rest)| rest);
    let date = NaiveDate::parse_from_str(date_part.trim(), "%d %B %Y").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Auckland
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.fixed_offset())
}
