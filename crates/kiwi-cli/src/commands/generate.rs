//! Generate command implementation.
//!
//! Writes the static HTML rates page.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;

use crate::commands::Context;
use crate::html::{render_page, write_page};
use crate::output::print_success;

/// Arguments for the generate command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output file (default: `output_file` from the configuration)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Runs the generate command.
pub fn execute(args: GenerateArgs, ctx: &Context) -> Result<()> {
    let banks = ctx.config.bank_ids()?;
    let view = ctx
        .reader()
        .render(&banks, ctx.now, &ctx.config.render_config())?;

    let path = args.output.unwrap_or_else(|| ctx.config.output_file.clone());
    write_page(&path, &render_page(&view))
        .with_context(|| format!("writing {}", path.display()))?;

    tracing::info!(path = %path.display(), rows = view.rows().count(), "HTML page written");
    if !ctx.quiet {
        print_success(&format!("HTML generated successfully: {}", path.display()));
    }
    Ok(())
}
