//! Blocking HTTP fetch with retry and exponential backoff.

use std::time::Duration;

use kiwi_traits::TraitError;
use reqwest::blocking::Client;

/// Browser-like user agent; the BNZ site rejects obvious bots.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:147.0) \
                              Gecko/20100101 Firefox/147.0";

/// Retry settings for upstream requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts.
    pub max_retries: u32,
    /// Delay after the first failed attempt; doubles after each further one.
    pub backoff: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff: Duration::from_secs(2),
            timeout: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Delay after failed attempt `attempt` (0-based): `backoff * 2^attempt`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.backoff.saturating_mul(factor)
    }

    fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

/// Runs `op` until it succeeds or the policy's attempts are used up.
///
/// `sleep` is called between attempts, never after the last one. The error
/// of the last attempt is returned.
///
/// # Errors
///
/// Returns the final attempt's error when every attempt fails.
pub fn retry_with_backoff<T, F, S>(
    policy: &RetryPolicy,
    mut sleep: S,
    mut op: F,
) -> Result<T, TraitError>
where
    F: FnMut(u32) -> Result<T, TraitError>,
    S: FnMut(Duration),
{
    let attempts = policy.attempts();
    let mut attempt = 0;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(e) if attempt + 1 >= attempts => return Err(e),
            Err(e) => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    retry_in_secs = delay.as_secs_f64(),
                    error = %e,
                    "Request failed, retrying"
                );
                sleep(delay);
                attempt += 1;
            }
        }
    }
}

/// Blocking HTTP client applying a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    policy: RetryPolicy,
}

impl HttpClient {
    /// Creates a client with the policy's timeout.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn new(policy: RetryPolicy) -> Result<Self, TraitError> {
        let client = Client::builder()
            .timeout(policy.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TraitError::ConnectionFailed(e.to_string()))?;
        Ok(Self { client, policy })
    }

    /// The retry policy in use.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// GETs `url` and returns the body, retrying failures.
    ///
    /// Non-2xx responses count as failures.
    ///
    /// # Errors
    ///
    /// Returns the last error once all attempts have failed.
    pub fn get_text(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, TraitError> {
        retry_with_backoff(&self.policy, std::thread::sleep, |_| self.get_once(url, headers))
    }

    fn get_once(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, TraitError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TraitError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().map_err(map_reqwest_error)?;
        tracing::debug!(url, status = status.as_u16(), bytes = body.len(), "Fetched");
        Ok(body)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TraitError {
    if e.is_timeout() {
        TraitError::Timeout
    } else {
        TraitError::ConnectionFailed(e.to_string())
    }
}
