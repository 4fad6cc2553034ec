//! Maps bank ids to their feed implementations.

use kiwi_core::BankId;
use kiwi_ext_bnz::{BnzParser, BnzSource, RetryPolicy};
use kiwi_traits::{DocumentSource, RateSource};

use crate::error::{CliError, CliResult};

/// Banks with a feed implementation.
pub const KNOWN_BANKS: &[&str] = &["bnz"];

fn unknown(bank: &BankId) -> CliError {
    CliError::UnknownBank(bank.to_string(), KNOWN_BANKS.join(", "))
}

/// Live source for a bank.
pub fn live_source(bank: &BankId, policy: RetryPolicy) -> CliResult<Box<dyn RateSource>> {
    match bank.as_str() {
        "bnz" => {
            let source = BnzSource::new(bank.clone(), policy)
                .map_err(|e| CliError::Config(e.to_string()))?;
            Ok(Box::new(source))
        }
        _ => Err(unknown(bank)),
    }
}

/// Source reading a saved feed document for a bank.
pub fn offline_source(bank: &BankId, document: String) -> CliResult<Box<dyn RateSource>> {
    match bank.as_str() {
        "bnz" => Ok(Box::new(DocumentSource::from_file(
            BnzParser::new(bank.clone()),
            document,
        ))),
        _ => Err(unknown(bank)),
    }
}
