//! Kiwi Rates CLI - NZ home loan rate history tracker.
//!
//! # Usage
//!
//! ```bash
//! # Fetch every configured bank and record changes
//! kiwi-rates scrape
//!
//! # Record changes from a saved feed
//! kiwi-rates ingest --bank bnz --feed bnz_rates.xml
//!
//! # Show the latest rates
//! kiwi-rates show --format json
//!
//! # Write the HTML page
//! kiwi-rates generate --output docs/index.html
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;
mod error;
mod html;
mod output;
mod registry;

use cli::{Cli, Commands};
use commands::Context;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let default_filter = if cli.quiet { "error" } else { "warn,kiwi=info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ctx = Context::from_cli(&cli)?;

    match cli.command {
        Commands::Scrape(args) => commands::scrape::execute(args, &ctx)?,
        Commands::Ingest(args) => commands::ingest::execute(args, &ctx)?,
        Commands::Show(args) => commands::show::execute(args, &ctx)?,
        Commands::Generate(args) => commands::generate::execute(args, &ctx)?,
    }

    Ok(())
}
