//! Scrape command implementation.
//!
//! Fetches every requested bank live and records changes.

use anyhow::{bail, Result};
use clap::Args;

use crate::commands::Context;
use crate::output::print_run_report;
use crate::registry::live_source;

/// Arguments for the scrape command.
#[derive(Args, Debug)]
pub struct ScrapeArgs {
    /// Bank to scrape (repeatable). Defaults to all configured banks.
    #[arg(short, long = "bank")]
    pub banks: Vec<String>,
}

/// Runs the scrape command.
///
/// Every bank runs even if an earlier one fails; the command fails afterwards
/// if any bank did.
pub fn execute(args: ScrapeArgs, ctx: &Context) -> Result<()> {
    let banks = ctx.banks(&args.banks)?;
    let policy = ctx.config.retry_policy();
    let sources = banks
        .iter()
        .map(|bank| live_source(bank, policy))
        .collect::<Result<Vec<_>, _>>()?;

    let pipeline = ctx.pipeline()?;
    tracing::info!(banks = sources.len(), now = %ctx.now, "Starting scrape");
    let report = pipeline.run_all(&sources, ctx.now);

    print_run_report(&report, ctx.format, ctx.quiet)?;

    let failed = report.failures().count();
    if failed > 0 {
        bail!("{failed} of {} banks failed", report.results.len());
    }
    Ok(())
}
