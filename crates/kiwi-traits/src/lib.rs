//! # Kiwi Traits
//!
//! Contracts between the rate history engine and its collaborators.
//!
//! This crate contains only trait definitions and the small value types
//! they exchange. Implementations live in extension crates.
//!
//! ## Module Structure
//!
//! - [`source`]: bank feed parsing and fetching ([`FeedParser`], [`RateSource`])
//! - [`notify`]: change notification delivery ([`Notifier`])
//! - [`error`]: [`TraitError`] shared by all implementations

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod notify;
pub mod source;

// Re-export commonly used types
pub use error::TraitError;
pub use notify::{ChangeNotice, Notifier, RateChange};
pub use source::{DocumentSource, FeedParser, RateSource, SourceType};
