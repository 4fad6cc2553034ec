//! Live BNZ rate source.

use kiwi_core::{BankId, ObservedBatch};
use kiwi_traits::{FeedParser, RateSource, SourceType, TraitError};

use crate::extractor::extract_api_key;
use crate::http::{HttpClient, RetryPolicy};
use crate::parser::BnzParser;

/// Public comparison page carrying the feed API key.
pub const RATES_PAGE_URL: &str =
    "https://www.bnz.co.nz/personal-banking/home-loans/compare-bnz-home-loan-rates";

/// Home loan rates feed.
pub const RATES_FEED_URL: &str = "https://api.bnz.co.nz/v1/ratesfeed/home/xml";

const PAGE_HEADERS: &[(&str, &str)] = &[
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("Accept-Language", "en-GB,en;q=0.9"),
];

const FEED_HEADERS: &[(&str, &str)] = &[
    ("Accept", "application/xml, text/xml"),
    ("Accept-Language", "en-GB,en;q=0.9"),
    ("Referer", "https://www.bnz.co.nz/"),
    ("Origin", "https://www.bnz.co.nz"),
    ("Cache-Control", "no-cache"),
    ("Pragma", "no-cache"),
];

/// Fetches the BNZ feed: page, API key, then XML.
#[derive(Debug, Clone)]
pub struct BnzSource {
    parser: BnzParser,
    http: HttpClient,
    page_url: String,
    feed_url: String,
}

impl BnzSource {
    /// Creates a source for `bank` against the public BNZ endpoints.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(bank: BankId, policy: RetryPolicy) -> Result<Self, TraitError> {
        Ok(Self {
            parser: BnzParser::new(bank),
            http: HttpClient::new(policy)?,
            page_url: RATES_PAGE_URL.to_string(),
            feed_url: RATES_FEED_URL.to_string(),
        })
    }

    /// Points the source at different endpoints.
    #[must_use]
    pub fn with_urls(mut self, page_url: impl Into<String>, feed_url: impl Into<String>) -> Self {
        self.page_url = page_url.into();
        self.feed_url = feed_url.into();
        self
    }
}

impl RateSource for BnzSource {
    fn bank_id(&self) -> &BankId {
        self.parser.bank_id()
    }

    fn source_type(&self) -> SourceType {
        SourceType::Http
    }

    fn fetch(&self) -> Result<ObservedBatch, TraitError> {
        let html = self.http.get_text(&self.page_url, PAGE_HEADERS)?;
        let api_key = extract_api_key(&html)?;
        tracing::debug!(bank = %self.bank_id(), "Extracted feed API key");

        let mut headers: Vec<(&str, &str)> = FEED_HEADERS.to_vec();
        headers.push(("apikey", api_key.as_str()));
        let xml = self.http.get_text(&self.feed_url, &headers)?;

        self.parser.parse(&xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_metadata() {
        let source = BnzSource::new(BankId::new("bnz").unwrap(), RetryPolicy::default()).unwrap();
        assert_eq!(source.bank_id().as_str(), "bnz");
        assert_eq!(source.source_type(), SourceType::Http);
        assert_eq!(source.feed_url, RATES_FEED_URL);

        let source = source.with_urls("http://127.0.0.1:1/page", "http://127.0.0.1:1/feed");
        assert_eq!(source.page_url, "http://127.0.0.1:1/page");
    }

    #[test]
    fn test_unreachable_page_fails_after_retries() {
        let policy = RetryPolicy {
            max_retries: 1,
            backoff: std::time::Duration::from_millis(1),
            timeout: std::time::Duration::from_secs(2),
        };
        let source = BnzSource::new(BankId::new("bnz").unwrap(), policy)
            .unwrap()
            .with_urls("http://127.0.0.1:1/page", "http://127.0.0.1:1/feed");
        let err = source.fetch().unwrap_err();
        assert!(err.is_transient());
    }
}
