//! Bank feed contracts.
//!
//! Each bank plugs in as a pair:
//! - [`FeedParser`]: bank-specific raw document -> [`ObservedBatch`]
//! - [`RateSource`]: fetches the raw document and parses it
//!
//! Which implementation serves a bank is chosen by configuration.

use kiwi_core::{BankId, ObservedBatch};
use serde::{Deserialize, Serialize};

use crate::error::TraitError;

/// How a source obtains its raw document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    /// Live HTTP fetch from the bank.
    Http,
    /// Previously saved document on disk.
    File,
    /// Fixed data, for tests.
    Static,
}

/// Normalises a bank's raw feed into observed rates.
pub trait FeedParser: Send + Sync {
    /// Bank this parser understands.
    fn bank_id(&self) -> &BankId;

    /// Parses one raw document.
    ///
    /// Implementations must fail rather than return an empty batch, and must
    /// reject rates that are not plain decimal numbers.
    fn parse(&self, raw: &str) -> Result<ObservedBatch, TraitError>;
}

/// Produces the current observed rates of one bank.
pub trait RateSource: Send + Sync {
    /// Bank this source serves.
    fn bank_id(&self) -> &BankId;

    /// Source type, for logging.
    fn source_type(&self) -> SourceType;

    /// Fetches and parses the bank's current rates.
    fn fetch(&self) -> Result<ObservedBatch, TraitError>;
}

/// A source that parses a document already held in memory.
///
/// Used for offline ingestion of saved feeds.
pub struct DocumentSource<P> {
    parser: P,
    document: String,
    source_type: SourceType,
}

impl<P: FeedParser> DocumentSource<P> {
    /// Wraps a document read from disk.
    pub fn from_file(parser: P, document: impl Into<String>) -> Self {
        Self {
            parser,
            document: document.into(),
            source_type: SourceType::File,
        }
    }

    /// Wraps a fixed document.
    pub fn from_static(parser: P, document: impl Into<String>) -> Self {
        Self {
            parser,
            document: document.into(),
            source_type: SourceType::Static,
        }
    }
}

impl<P: FeedParser> RateSource for DocumentSource<P> {
    fn bank_id(&self) -> &BankId {
        self.parser.bank_id()
    }

    fn source_type(&self) -> SourceType {
        self.source_type
    }

    fn fetch(&self) -> Result<ObservedBatch, TraitError> {
        self.parser.parse(&self.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiwi_core::ObservedRate;

    /// Parses `product|term|rate` lines.
    struct PipeParser(BankId);

    impl FeedParser for PipeParser {
        fn bank_id(&self) -> &BankId {
            &self.0
        }

        fn parse(&self, raw: &str) -> Result<ObservedBatch, TraitError> {
            let mut rates = Vec::new();
            for line in raw.lines().filter(|l| !l.trim().is_empty()) {
                let parts: Vec<&str> = line.split('|').collect();
                if parts.len() != 3 {
                    return Err(TraitError::ParseError(format!("bad line: {line}")));
                }
                rates.push(ObservedRate::parse(parts[0], parts[1], parts[2])?);
            }
            if rates.is_empty() {
                return Err(TraitError::NotFound("no rates".into()));
            }
            Ok(ObservedBatch::new(rates, None))
        }
    }

    #[test]
    fn test_document_source_delegates_to_parser() {
        let source = DocumentSource::from_static(
            PipeParser(BankId::new("test").unwrap()),
            "Standard|1 year|4.49\nStandard|Variable|5.84\n",
        );
        assert_eq!(source.bank_id().as_str(), "test");
        assert_eq!(source.source_type(), SourceType::Static);
        assert_eq!(source.fetch().unwrap().len(), 2);
    }

    #[test]
    fn test_decimal_errors_surface_from_parser() {
        let source =
            DocumentSource::from_file(PipeParser(BankId::new("test").unwrap()), "Standard|1 year|x");
        assert!(matches!(source.fetch(), Err(TraitError::Core(_))));
    }
}
