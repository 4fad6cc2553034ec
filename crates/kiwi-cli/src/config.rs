//! Tracker configuration.
//!
//! Loaded from TOML; every field has a default so an absent file is valid.
//!
//! ```toml
//! data_dir = "data"
//! output_file = "docs/index.html"
//! timezone = "Pacific/Auckland"
//! banks = ["bnz"]
//! recency_window_days = 14
//! new_product_window_days = 30
//!
//! [http]
//! max_retries = 5
//! backoff_secs = 2.0
//! timeout_secs = 60
//!
//! [notify]
//! server = "https://ntfy.sh"
//! topic = "my-kiwi-rates"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use kiwi_core::render::{RenderConfig, NEW_PRODUCT_WINDOW_DAYS, RECENCY_WINDOW_DAYS};
use kiwi_core::BankId;
use kiwi_ext_bnz::RetryPolicy;
use kiwi_ext_ntfy::DEFAULT_SERVER;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "config/kiwi-rates.toml";

/// Environment variable overriding `notify.topic`.
pub const NTFY_TOPIC_ENV: &str = "NTFY_TOPIC";

const MAX_WINDOW_DAYS: i64 = 36_500;
const MAX_BACKOFF_SECS: f64 = 3_600.0;

/// Tracker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Directory holding `<bank>_rates.json` files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// HTML page written by `generate`
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    /// IANA timezone used for "now"
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Banks to scrape and display
    #[serde(default = "default_banks")]
    pub banks: Vec<String>,

    /// Days a change stays highlighted
    #[serde(default = "default_recency_window")]
    pub recency_window_days: i64,

    /// Days a new product keeps its badge
    #[serde(default = "default_new_product_window")]
    pub new_product_window_days: i64,

    /// Upstream fetch settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Push notification settings
    #[serde(default)]
    pub notify: NotifySettings,
}

/// Upstream fetch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSettings {
    /// Total attempts per request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay after the first failure, doubled each retry
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: f64,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Push notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifySettings {
    /// ntfy server base URL
    #[serde(default = "default_ntfy_server")]
    pub server: String,

    /// Topic; notifications are off when unset or empty
    pub topic: Option<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_output_file() -> PathBuf {
    PathBuf::from("docs/index.html")
}

fn default_timezone() -> String {
    "Pacific/Auckland".to_string()
}

fn default_banks() -> Vec<String> {
    vec!["bnz".to_string()]
}

fn default_recency_window() -> i64 {
    RECENCY_WINDOW_DAYS
}

fn default_new_product_window() -> i64 {
    NEW_PRODUCT_WINDOW_DAYS
}

fn default_max_retries() -> u32 {
    5
}

fn default_backoff_secs() -> f64 {
    2.0
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_ntfy_server() -> String {
    DEFAULT_SERVER.to_string()
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_secs: default_backoff_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            server: default_ntfy_server(),
            topic: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_file: default_output_file(),
            timezone: default_timezone(),
            banks: default_banks(),
            recency_window_days: default_recency_window(),
            new_product_window_days: default_new_product_window(),
            http: HttpSettings::default(),
            notify: NotifySettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| match e {
            CliError::Config(msg) => CliError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parse and validate TOML content.
    pub fn from_toml(content: &str) -> CliResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| CliError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration for a run.
    ///
    /// An explicit path must exist. The default path is optional and
    /// defaults apply when it is absent.
    pub fn load(explicit: Option<&Path>) -> CliResult<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    tracing::debug!(path = %path.display(), "Loading configuration");
                    Self::from_file(path)
                } else {
                    tracing::debug!("Using default configuration");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Overrides the notification topic. An empty topic disables
    /// notification even if the file sets one.
    pub fn override_topic(&mut self, topic: Option<String>) {
        if let Some(topic) = topic {
            self.notify.topic = Some(topic);
        }
    }

    /// Applies the `NTFY_TOPIC` environment variable, if set.
    pub fn apply_env(&mut self) {
        self.override_topic(std::env::var(NTFY_TOPIC_ENV).ok());
    }

    /// Checks invariants that serde cannot express.
    pub fn validate(&self) -> CliResult<()> {
        if self.banks.is_empty() {
            return Err(CliError::Config("banks must list at least one bank".into()));
        }
        for bank in &self.banks {
            BankId::new(bank).map_err(|e| CliError::Config(e.to_string()))?;
        }
        self.tz()?;
        for (name, days) in [
            ("recency_window_days", self.recency_window_days),
            ("new_product_window_days", self.new_product_window_days),
        ] {
            if !(1..=MAX_WINDOW_DAYS).contains(&days) {
                return Err(CliError::Config(format!(
                    "{name} must be between 1 and {MAX_WINDOW_DAYS}, got {days}"
                )));
            }
        }
        if !(0.0..=MAX_BACKOFF_SECS).contains(&self.http.backoff_secs) {
            return Err(CliError::Config(format!(
                "http.backoff_secs must be between 0 and {MAX_BACKOFF_SECS}, got {}",
                self.http.backoff_secs
            )));
        }
        if self.http.timeout_secs == 0 {
            return Err(CliError::Config("http.timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// Configured timezone.
    pub fn tz(&self) -> CliResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| CliError::Config(format!("unknown timezone '{}'", self.timezone)))
    }

    /// Configured banks as ids.
    pub fn bank_ids(&self) -> CliResult<Vec<BankId>> {
        self.banks
            .iter()
            .map(|b| BankId::new(b).map_err(|e| CliError::Config(e.to_string())))
            .collect()
    }

    /// Renderer windows.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig::from_days(self.recency_window_days, self.new_product_window_days)
    }

    /// Retry policy for upstream fetches.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.http.max_retries,
            backoff: Duration::from_secs_f64(self.http.backoff_secs),
            timeout: Duration::from_secs(self.http.timeout_secs),
        }
    }

    /// Effective notification topic, `None` when disabled.
    pub fn ntfy_topic(&self) -> Option<&str> {
        self.notify
            .topic
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
