//! Client for the result endpoint
//!
//! The backend exposes results on a separate origin, keyed by request id.
//! The poll loop queries at a fixed interval until output appears, the
//! attempt budget runs out, the caller cancels, or an error terminates it.
//! Errors are terminal: the loop never retries past a failed attempt.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::correlator::RequestId;
use crate::errors::ExecutionError;
use crate::protocol::ExecutionResult;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);
const DEFAULT_MAX_ATTEMPTS: u32 = 150;

/// Polls `GET {base}/api/v1/submissions/{request_id}` until a result is ready.
#[derive(Debug, Clone)]
pub struct PollingClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    interval: Duration,
    max_attempts: u32,
}

impl PollingClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        PollingClient {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// One query against the result endpoint.
    ///
    /// A result echoing some other request id fails the attempt: the
    /// endpoint is keyed by id, and a foreign result must never be
    /// associated with this poll.
    pub async fn poll_once(
        &self,
        request_id: &RequestId,
    ) -> Result<ExecutionResult, ExecutionError> {
        let url = format!("{}/api/v1/submissions/{}", self.base_url, request_id);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ExecutionError::PollingError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ExecutionError::PollingError(format!(
                "HTTP {} error: {}",
                status, error_text
            )));
        }

        let result: ExecutionResult = response
            .json()
            .await
            .map_err(|e| ExecutionError::PollingError(format!("Failed to parse response: {}", e)))?;

        if let Some(echoed) = &result.request_id {
            if echoed != request_id {
                return Err(ExecutionError::PollingError(format!(
                    "Result belongs to request {} but {} was polled",
                    echoed, request_id
                )));
            }
        }

        Ok(result)
    }

    /// Poll until the result carries non-empty output.
    ///
    /// Once a non-empty output is observed it is returned and polling for
    /// this request id stops permanently. The attempt budget turns a job the
    /// backend lost into a `TimeoutError` instead of an endless loop, and
    /// the inter-attempt sleep races `cancel` so an abandoned run releases
    /// its task promptly.
    pub async fn poll_until_ready(
        &self,
        request_id: &RequestId,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult, ExecutionError> {
        for attempt in 1..=self.max_attempts {
            if cancel.is_cancelled() {
                log::debug!("Poll loop for {} cancelled", request_id);
                return Err(ExecutionError::Cancelled);
            }

            let result = self.poll_once(request_id).await?;
            if result.is_ready() {
                log::debug!(
                    "Result for {} ready after {} attempt(s)",
                    request_id,
                    attempt
                );
                return Ok(result);
            }

            log::debug!(
                "No output yet for {} (attempt {}/{})",
                request_id,
                attempt,
                self.max_attempts
            );

            if attempt < self.max_attempts {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        log::debug!("Poll loop for {} cancelled while waiting", request_id);
                        return Err(ExecutionError::Cancelled);
                    }
                    _ = tokio::time::sleep(self.interval) => {}
                }
            }
        }

        Err(ExecutionError::TimeoutError(format!(
            "No output for request {} after {} attempts",
            request_id, self.max_attempts
        )))
    }
}
