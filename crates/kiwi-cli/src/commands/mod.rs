//! CLI command implementations.

pub mod generate;
pub mod ingest;
pub mod scrape;
pub mod show;

// Re-export submodules for convenience
pub use generate::GenerateArgs;
pub use ingest::IngestArgs;
pub use scrape::ScrapeArgs;
pub use show::ShowArgs;

use chrono::{DateTime, Utc};
use kiwi_core::{BankId, Timestamp};
use kiwi_engine::Pipeline;
use kiwi_ext_ntfy::NtfyNotifier;
use kiwi_storage::JsonFileStore;
use kiwi_traits::Notifier;

use crate::cli::{Cli, OutputFormat};
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Everything a command needs, resolved once from flags and config.
pub struct Context {
    /// Effective configuration.
    pub config: AppConfig,
    /// Output format.
    pub format: OutputFormat,
    /// Reference time for stamping and rendering.
    pub now: Timestamp,
    /// Suppress non-essential output.
    pub quiet: bool,
}

impl Context {
    /// Resolves configuration, overrides and the reference time.
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let mut config = AppConfig::load(cli.config.as_deref())?;
        config.apply_env();
        if let Some(dir) = &cli.data_dir {
            config.data_dir = dir.clone();
        }

        let now = match &cli.now {
            Some(raw) => parse_timestamp(raw)?,
            None => Utc::now().with_timezone(&config.tz()?).fixed_offset(),
        };

        Ok(Self {
            config,
            format: cli.format,
            now,
            quiet: cli.quiet,
        })
    }

    /// Pipeline over the configured data directory.
    pub fn pipeline(&self) -> CliResult<Pipeline<JsonFileStore>> {
        let notifier = NtfyNotifier::from_topic(&self.config.notify.server, self.config.ntfy_topic())
            .map_err(|e| CliError::Config(e.to_string()))?
            .map(|n| Box::new(n) as Box<dyn Notifier>);
        Ok(Pipeline::new(JsonFileStore::new(&self.config.data_dir)).with_optional_notifier(notifier))
    }

    /// Pipeline for reading history only; never notifies.
    pub fn reader(&self) -> Pipeline<JsonFileStore> {
        Pipeline::new(JsonFileStore::new(&self.config.data_dir))
    }

    /// Banks named on the command line, or all configured banks.
    pub fn banks(&self, requested: &[String]) -> CliResult<Vec<BankId>> {
        if requested.is_empty() {
            return self.config.bank_ids();
        }
        requested
            .iter()
            .map(|b| BankId::new(b).map_err(|e| CliError::Config(e.to_string())))
            .collect()
    }
}

/// Parses an RFC 3339 timestamp, keeping its offset.
pub fn parse_timestamp(raw: &str) -> CliResult<Timestamp> {
    DateTime::parse_from_rfc3339(raw.trim()).map_err(|_| CliError::InvalidTimestamp(raw.to_string()))
}
