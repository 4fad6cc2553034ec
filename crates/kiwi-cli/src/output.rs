//! Output formatting utilities.

use colored::Colorize;
use kiwi_core::render::{Direction, RateRow, RenderedView};
use kiwi_core::{BankId, Timestamp};
use kiwi_engine::RunReport;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::cli::OutputFormat;
use crate::html::last_change_label;

/// Formats and prints output based on the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(data),
        OutputFormat::Json => print_json(data),
        OutputFormat::Csv => print_csv(data),
    }
}

/// Prints data as a formatted table.
fn print_table<T: Tabled>(data: &[T]) -> anyhow::Result<()> {
    if data.is_empty() {
        println!("No rate data available.");
        return Ok(());
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{}", table);
    Ok(())
}

/// Prints data as JSON.
fn print_json<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints data as CSV.
fn print_csv<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for item in data {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Prints an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Prints an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

fn date(ts: Timestamp) -> String {
    ts.format("%Y-%m-%d").to_string()
}

// =============================================================================
// Rate rows
// =============================================================================

/// One rate row for table display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct RateRowDisplay {
    #[tabled(rename = "Bank")]
    pub bank: String,
    #[tabled(rename = "Product")]
    pub product: String,
    #[tabled(rename = "Term")]
    pub term: String,
    #[tabled(rename = "Rate")]
    pub rate: String,
    #[tabled(rename = "Change")]
    pub change: String,
    #[tabled(rename = "Last Updated")]
    pub updated: String,
    #[tabled(rename = "")]
    pub flags: String,
}

impl RateRowDisplay {
    fn new(bank: &BankId, row: &RateRow) -> Self {
        let change = format!("({})", row.delta_display());
        let change = match row.direction {
            Direction::Increase => change.red().to_string(),
            Direction::Decrease => change.green().to_string(),
            Direction::Unchanged => change.dimmed().to_string(),
        };
        let mut flags = Vec::new();
        if row.is_new_product {
            flags.push("NEW".bold().green().to_string());
        }
        if row.is_recent_change {
            flags.push("recent".yellow().to_string());
        }
        Self {
            bank: bank.display_name(),
            product: row.product_name.clone(),
            term: row.term.clone(),
            rate: format!("{}%", row.rate_display()),
            change,
            updated: format!("{} ({}d)", date(row.updated_at), row.days_since_update),
            flags: flags.join(" "),
        }
    }
}

/// One rate row for CSV export.
#[derive(Debug, Clone, Serialize)]
pub struct RateRowRecord {
    pub bank: String,
    pub product_name: String,
    pub term: String,
    pub rate_percentage: Decimal,
    pub previous_rate: Option<Decimal>,
    pub change: String,
    pub direction: Direction,
    pub updated_at: Timestamp,
    pub days_since_update: i64,
    pub recent_change: bool,
    pub new_product: bool,
}

impl RateRowRecord {
    fn new(bank: &BankId, row: &RateRow) -> Self {
        Self {
            bank: bank.to_string(),
            product_name: row.product_name.clone(),
            term: row.term.clone(),
            rate_percentage: row.rate_percentage,
            previous_rate: row.previous_rate,
            change: row.delta_display(),
            direction: row.direction,
            updated_at: row.updated_at,
            days_since_update: row.days_since_update,
            recent_change: row.is_recent_change,
            new_product: row.is_new_product,
        }
    }
}

/// Prints a rendered view in the requested format.
pub fn print_view(view: &RenderedView, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            print_header("Kiwi Rates");
            print_info(&format!(
                "Last rate change: {}",
                last_change_label(&view.last_change)
            ));
            let rows: Vec<_> = view.rows().map(|(b, r)| RateRowDisplay::new(b, r)).collect();
            print_table(&rows)
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(view)?);
            Ok(())
        }
        OutputFormat::Csv => {
            let rows: Vec<_> = view.rows().map(|(b, r)| RateRowRecord::new(b, r)).collect();
            print_csv(&rows)
        }
    }
}

// =============================================================================
// Run reports
// =============================================================================

/// One bank's run result.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct RunSummary {
    #[tabled(rename = "Bank")]
    pub bank: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Observed")]
    pub observed: usize,
    #[tabled(rename = "Changed")]
    pub changed: usize,
    #[tabled(rename = "Notified")]
    pub notified: bool,
    #[tabled(rename = "Scraped At")]
    pub scraped_at: String,
    #[tabled(skip)]
    pub error: Option<String>,
}

impl RunSummary {
    fn from_report(report: &RunReport) -> Vec<Self> {
        report
            .results
            .iter()
            .map(|r| match &r.result {
                Ok(outcome) => Self {
                    bank: r.bank.display_name(),
                    status: if outcome.rates_changed() {
                        "changed".into()
                    } else {
                        "unchanged".into()
                    },
                    observed: outcome.observed,
                    changed: outcome.accepted.len(),
                    notified: outcome.notified,
                    scraped_at: outcome.scraped_at.to_rfc3339(),
                    error: None,
                },
                Err(e) => Self {
                    bank: r.bank.display_name(),
                    status: "failed".into(),
                    observed: 0,
                    changed: 0,
                    notified: false,
                    scraped_at: String::new(),
                    error: Some(e.to_string()),
                },
            })
            .collect()
    }
}

/// Prints the outcome of a pipeline run.
pub fn print_run_report(report: &RunReport, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    let summaries = RunSummary::from_report(report);
    match format {
        OutputFormat::Table => {
            for (summary, result) in summaries.iter().zip(&report.results) {
                match &result.result {
                    Ok(outcome) if !quiet => {
                        print_success(&format!("{}: scrape completed", summary.bank));
                        println!("  Rates changed: {}", outcome.rates_changed());
                        println!("  Number of rates: {}", outcome.observed);
                        println!("  Scraped at: {}", summary.scraped_at);
                        for change in &outcome.accepted {
                            let reading = &change.reading;
                            match change.previous_rate {
                                Some(old) => println!(
                                    "    {} {}: {old}% -> {}%",
                                    reading.product_name, reading.term, reading.rate_percentage
                                ),
                                None => println!(
                                    "    {} {}: {}% (new)",
                                    reading.product_name, reading.term, reading.rate_percentage
                                ),
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(e) => print_error(&format!("{}: scrape failed: {e}", summary.bank)),
                }
            }
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Csv => print_output(&summaries, format),
    }
}
