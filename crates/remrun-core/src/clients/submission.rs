//! Client for the submission endpoint

use std::time::Duration;

use serde_json::Value;

use crate::errors::ExecutionError;
use crate::protocol::{Acknowledgement, ExecutionRequest};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts execution requests to `POST {base}/api/v1/submission`.
///
/// A single network call per submission: transport failures and non-success
/// responses surface as `SubmissionError` and are never retried here. Success
/// means the job was accepted, not that it has started running.
#[derive(Debug, Clone)]
pub struct SubmissionClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl SubmissionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        SubmissionClient {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn submit(
        &self,
        request: &ExecutionRequest,
    ) -> Result<Acknowledgement, ExecutionError> {
        let url = format!("{}/api/v1/submission", self.base_url);
        log::debug!(
            "Submitting request {} (language {}) to {}",
            request.request_id,
            request.language_id,
            url
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| ExecutionError::SubmissionError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ExecutionError::SubmissionError(format!(
                "HTTP {} error: {}",
                status, error_text
            )));
        }

        // The acknowledgement shape is not part of the contract; keep
        // whatever JSON came back so callers can log it.
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        log::debug!("Request {} accepted", request.request_id);

        Ok(Acknowledgement { body })
    }
}
