//! Ingest command implementation.
//!
//! Runs the pipeline on a feed document saved earlier, without network access.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use kiwi_core::BankId;
use kiwi_engine::{BankRunResult, RunReport};

use crate::commands::Context;
use crate::output::print_run_report;
use crate::registry::offline_source;

/// Arguments for the ingest command.
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Bank the feed belongs to
    #[arg(short, long)]
    pub bank: String,

    /// Saved feed document
    #[arg(long)]
    pub feed: PathBuf,
}

/// Runs the ingest command.
pub fn execute(args: IngestArgs, ctx: &Context) -> Result<()> {
    let bank = BankId::new(&args.bank)?;
    let document = std::fs::read_to_string(&args.feed)
        .with_context(|| format!("reading feed {}", args.feed.display()))?;
    let source = offline_source(&bank, document)?;

    let pipeline = ctx.pipeline()?;
    let result = pipeline.run_source(source.as_ref(), ctx.now);
    let report = RunReport {
        results: vec![BankRunResult {
            bank: bank.clone(),
            result,
        }],
    };
    print_run_report(&report, ctx.format, ctx.quiet)?;

    if let Some((_, err)) = report.failures().next() {
        anyhow::bail!("{}: {err}", bank.display_name());
    }
    Ok(())
}
