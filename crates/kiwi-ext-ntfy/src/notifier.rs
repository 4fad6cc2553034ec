//! ntfy.sh delivery.

use std::time::Duration;

use kiwi_traits::{ChangeNotice, Notifier, TraitError};
use reqwest::blocking::Client;

use crate::message::format_notification;

/// Public ntfy server.
pub const DEFAULT_SERVER: &str = "https://ntfy.sh";

/// Tag shown as an emoji next to the notification.
pub const TAGS: &str = "chart_with_upwards_trend";

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts change notices to an ntfy topic.
#[derive(Debug, Clone)]
pub struct NtfyNotifier {
    client: Client,
    server: String,
    topic: String,
}

impl NtfyNotifier {
    /// Creates a notifier for `topic` on `server`.
    ///
    /// # Errors
    ///
    /// Fails if the topic is blank or the HTTP client cannot be built.
    pub fn new(server: impl Into<String>, topic: impl Into<String>) -> Result<Self, TraitError> {
        let topic = topic.into().trim().to_string();
        if topic.is_empty() {
            return Err(TraitError::InvalidInput("ntfy topic is empty".into()));
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TraitError::ConnectionFailed(e.to_string()))?;
        Ok(Self {
            client,
            server: server.into().trim_end_matches('/').to_string(),
            topic,
        })
    }

    /// Creates a notifier only when a non-blank topic is configured.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn from_topic(server: &str, topic: Option<&str>) -> Result<Option<Self>, TraitError> {
        match topic.map(str::trim) {
            Some(topic) if !topic.is_empty() => Self::new(server, topic).map(Some),
            _ => Ok(None),
        }
    }

    /// URL notices are posted to.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.server, self.topic)
    }
}

impl Notifier for NtfyNotifier {
    fn name(&self) -> &'static str {
        "ntfy"
    }

    fn notify(&self, notice: &ChangeNotice) -> Result<(), TraitError> {
        let (title, body) = format_notification(notice);
        let url = self.endpoint();

        let response = self
            .client
            .post(&url)
            .header("Title", title)
            .header("Tags", TAGS)
            .header("Markdown", "yes")
            .body(body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    TraitError::Timeout
                } else {
                    TraitError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TraitError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }
        tracing::debug!(url = %url, "Posted ntfy notification");
        Ok(())
    }
}
