//! Shared HTTP client for chat-completions providers
//!
//! One `reqwest::Client` per backend, with a capped per-request timeout and a
//! small retry budget for server errors and network failures.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::LlmError;

/// Upper bound on any single request (5 minutes)
const DEFAULT_MAX_HTTP_TIMEOUT: Duration = Duration::from_secs(300);

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Retries after the first attempt, for 5xx and network failures only
const MAX_RETRIES: u32 = 2;

/// Backoff unit; attempt `n` waits `n * INITIAL_BACKOFF`
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Longest provider error body quoted in an error message
const MAX_ERROR_DETAIL_CHARS: usize = 300;

#[derive(Clone)]
pub(crate) struct HttpClient {
    client: Arc<Client>,
    max_timeout: Duration,
    backoff_unit: Duration,
}

impl HttpClient {
    pub fn new() -> Result<Self, LlmError> {
        Self::with_max_timeout(DEFAULT_MAX_HTTP_TIMEOUT)
    }

    pub fn with_max_timeout(max_timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| LlmError::Misconfiguration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client: Arc::new(client),
            max_timeout,
            backoff_unit: INITIAL_BACKOFF,
        })
    }

    /// Shorter backoff for tests against a local server.
    #[cfg(test)]
    pub fn with_backoff_unit(mut self, backoff_unit: Duration) -> Self {
        self.backoff_unit = backoff_unit;
        self
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    /// Send `request_builder`, retrying server errors and network failures.
    ///
    /// - timeout per attempt: `min(request_timeout, max_timeout)`
    /// - 401/403 → `ProviderAuth`, 429 → `ProviderQuota`, other 4xx →
    ///   `Transport`; 4xx responses are never retried
    /// - 5xx → `ProviderOutage` once retries are exhausted
    /// - a timed-out attempt → `Timeout`, not retried
    pub async fn execute_with_retry(
        &self,
        request_builder: RequestBuilder,
        request_timeout: Duration,
        provider_name: &str,
    ) -> Result<Response, LlmError> {
        let effective_timeout = request_timeout.min(self.max_timeout);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let request = request_builder
                .try_clone()
                .ok_or_else(|| LlmError::Transport("Failed to clone request for retry".to_string()))?
                .timeout(effective_timeout)
                .build()
                .map_err(|e| LlmError::Transport(format!("Failed to build request: {e}")))?;

            debug!(
                provider = provider_name,
                attempt,
                timeout_secs = effective_timeout.as_secs(),
                "Executing HTTP request"
            );

            let error = match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_client_error() {
                        let detail = response.text().await.unwrap_or_default();
                        return Err(map_client_error(status, provider_name, &detail));
                    }
                    if !status.is_server_error() {
                        return Ok(response);
                    }

                    warn!(
                        provider = provider_name,
                        attempt,
                        status = status.as_u16(),
                        "Server error"
                    );
                    LlmError::ProviderOutage(format!(
                        "{provider_name} returned server error: {status}"
                    ))
                }
                Err(e) if e.is_timeout() => {
                    return Err(LlmError::Timeout {
                        duration: effective_timeout,
                    });
                }
                Err(e) => {
                    let message = redact_error_message(&e.to_string());
                    warn!(provider = provider_name, attempt, error = %message, "Network error");
                    LlmError::Transport(format!("{provider_name} request failed: {message}"))
                }
            };

            if attempt > MAX_RETRIES {
                return Err(error);
            }
            tokio::time::sleep(self.backoff_unit * attempt).await;
        }
    }
}

/// Map a 4xx status (plus the provider's error body) to an `LlmError`.
fn map_client_error(status: StatusCode, provider_name: &str, body: &str) -> LlmError {
    let detail = error_detail(body);
    let suffix = if detail.is_empty() {
        String::new()
    } else {
        format!(" ({detail})")
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::ProviderAuth(format!(
            "{provider_name} authentication failed: {status}{suffix}"
        )),
        StatusCode::TOO_MANY_REQUESTS => LlmError::ProviderQuota(format!(
            "{provider_name} rate limit exceeded: {status}{suffix}"
        )),
        _ => LlmError::Transport(format!(
            "{provider_name} returned client error: {status}{suffix}"
        )),
    }
}

/// Provider error text: `error.message` from an OpenAI-style body, else the raw
/// body; redacted and shortened.
fn error_detail(body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    redact_error_message(&message)
        .chars()
        .take(MAX_ERROR_DETAIL_CHARS)
        .collect()
}

static URL_WITH_CREDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(https?://)[^:@\s/]+:[^@\s/]+@").expect("credential URL pattern is valid")
});

static BEARER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bbearer\s+\S+").expect("bearer pattern is valid"));

/// Runs of 32+ key-like characters (e.g. `gsk_...`, `sk-...`).
static POTENTIAL_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9_-]{32,}").expect("key pattern is valid"));

/// Strip credentials and key-like tokens from text that may be logged or shown.
pub(crate) fn redact_error_message(message: &str) -> String {
    let redacted = URL_WITH_CREDS.replace_all(message, "$1[REDACTED]@");
    let redacted = BEARER_TOKEN.replace_all(&redacted, "Bearer [REDACTED]");
    POTENTIAL_KEY
        .replace_all(&redacted, "[REDACTED_KEY]")
        .into_owned()
}
