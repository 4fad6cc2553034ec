//! # Kiwi Engine
//!
//! Runs the rate history pipeline for each configured bank.
//!
//! ## Architecture
//!
//! ```text
//! RateSource ─> ObservedBatch ─┐
//!                              ├─> apply_batch ─> RateStore::save ─> Notifier
//! RateStore::load ─────────────┘
//!
//! RateStore::load_many ─> project ─> render ─> RenderedView
//! ```
//!
//! Banks are independent: one bank's failure is recorded in the
//! [`RunReport`] and the remaining banks still run.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod error;
pub mod pipeline;

pub use error::{EngineError, EngineResult};
pub use pipeline::{BankRunOutcome, BankRunResult, Pipeline, RunReport};
