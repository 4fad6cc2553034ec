//! Tests against saved BNZ documents.

use std::fs;
use std::path::PathBuf;

use chrono::DateTime;
use kiwi_core::BankId;
use kiwi_ext_bnz::{extract_api_key, BnzParser};
use kiwi_traits::{DocumentSource, FeedParser, RateSource, SourceType};
use rust_decimal_macros::dec;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).unwrap()
}

fn parser() -> BnzParser {
    BnzParser::new(BankId::new("bnz").unwrap())
}

#[test]
fn parses_all_rates_in_feed_order() {
    let batch = parser().parse(&fixture("bnz_rates.xml")).unwrap();

    assert_eq!(batch.len(), 12);
    assert_eq!(batch.rates[0].product_name, "TotalMoney");
    assert_eq!(batch.rates[0].term, "Variable");
    assert_eq!(batch.rates[0].rate_percentage, dec!(5.94));

    let standard_1y = batch
        .rates
        .iter()
        .find(|r| r.product_name == "Standard" && r.term == "1 year")
        .unwrap();
    assert_eq!(standard_1y.rate_percentage, dec!(4.49));
}

#[test]
fn reads_bank_last_updated_as_auckland_midnight() {
    let batch = parser().parse(&fixture("bnz_rates.xml")).unwrap();
    assert_eq!(
        batch.bank_last_updated,
        Some(DateTime::parse_from_rfc3339("2025-12-18T00:00:00+13:00").unwrap())
    );
}

#[test]
fn extracts_key_from_saved_page() {
    assert_eq!(
        extract_api_key(&fixture("bnz_page.html")).unwrap(),
        "l7xx3f2a9c8e41d24b5e8f0c6a7d1e2b3c4d"
    );
}

#[test]
fn saved_feed_works_as_offline_source() {
    let source = DocumentSource::from_file(parser(), fixture("bnz_rates.xml"));
    assert_eq!(source.bank_id().as_str(), "bnz");
    assert_eq!(source.source_type(), SourceType::File);
    assert_eq!(source.fetch().unwrap().len(), 12);
}

#[test]
fn feed_without_rates_is_upstream_empty() {
    let source = DocumentSource::from_file(
        parser(),
        "<rss><standard><lastupdated>Thursday, 18 December 2025</lastupdated></standard></rss>",
    );
    let err = source.fetch().unwrap_err();
    assert!(matches!(
        err,
        kiwi_traits::TraitError::Core(kiwi_core::KiwiError::UpstreamEmpty { .. })
    ));
    assert!(err.to_string().contains("'bnz'"));
}
