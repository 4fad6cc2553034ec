//! # Kiwi BNZ Extension
//!
//! BNZ (Bank of New Zealand) home loan rates for the Kiwi Rates tracker.
//!
//! The public comparison page embeds an API key in its bootstrap script; the
//! key unlocks an XML rates feed. This crate provides:
//!
//! - [`extract_api_key`]: pulls the key out of the page HTML
//! - [`BnzParser`]: [`FeedParser`](kiwi_traits::FeedParser) for the XML feed
//! - [`BnzSource`]: [`RateSource`](kiwi_traits::RateSource) doing the whole fetch
//! - [`HttpClient`] and [`RetryPolicy`]: blocking GET with exponential backoff
//!
//! # Example
//!
//! ```rust
//! use kiwi_core::BankId;
//! use kiwi_ext_bnz::BnzParser;
//! use kiwi_traits::FeedParser;
//!
//! let parser = BnzParser::new(BankId::new("bnz").unwrap());
//! let xml = "<rss><standard><rate><label>Standard</label><term>1 year</term>\
//!            <interest>4.49</interest></rate></standard></rss>";
//! let batch = parser.parse(xml).unwrap();
//! assert_eq!(batch.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod extractor;
pub mod http;
pub mod parser;
pub mod source;

pub use extractor::extract_api_key;
pub use http::{retry_with_backoff, HttpClient, RetryPolicy};
pub use parser::{parse_last_updated, BnzParser};
pub use source::{BnzSource, RATES_FEED_URL, RATES_PAGE_URL};
