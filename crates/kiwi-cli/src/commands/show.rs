//! Show command implementation.

use anyhow::Result;
use clap::Args;

use crate::commands::Context;
use crate::output::print_view;

/// Arguments for the show command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Bank to show (repeatable). Defaults to all configured banks.
    #[arg(short, long = "bank")]
    pub banks: Vec<String>,
}

/// Runs the show command.
pub fn execute(args: ShowArgs, ctx: &Context) -> Result<()> {
    let banks = ctx.banks(&args.banks)?;
    let view = ctx
        .reader()
        .render(&banks, ctx.now, &ctx.config.render_config())?;
    print_view(&view, ctx.format)
}
