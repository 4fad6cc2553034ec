//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{GenerateArgs, IngestArgs, ScrapeArgs, ShowArgs};

/// Kiwi Rates - NZ home loan rate history tracker
#[derive(Parser)]
#[command(name = "kiwi-rates")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (default: config/kiwi-rates.toml if present)
    #[arg(short, long, global = true, env = "KIWI_RATES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Reference time (RFC 3339) instead of the current time
    #[arg(long, global = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch current rates from each bank and record changes
    Scrape(ScrapeArgs),

    /// Record changes from a saved feed document
    Ingest(IngestArgs),

    /// Show the latest rate of every product
    Show(ShowArgs),

    /// Write the static HTML rates page
    Generate(GenerateArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}
