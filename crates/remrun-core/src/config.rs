//! Client configuration
//!
//! The submission and result endpoints live on distinct origins, so both are
//! configured separately. Optional fields default to the values the hosted
//! backend has always used: a two second poll interval and a five minute
//! attempt budget.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ExecutionError;

fn default_submission_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_result_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_max_poll_attempts() -> u32 {
    150
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Origin of the submission endpoint (POST /api/v1/submission).
    #[serde(default = "default_submission_url")]
    pub submission_url: String,
    /// Origin of the result endpoint (GET /api/v1/submissions/{id}).
    #[serde(default = "default_result_url")]
    pub result_url: String,
    /// Delay between poll attempts.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Poll attempts before the run is declared timed out.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
    /// Per-request HTTP timeout for both endpoints.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            submission_url: default_submission_url(),
            result_url: default_result_url(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from a YAML file.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<RunnerConfig, ExecutionError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ExecutionError::ConfigError(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: RunnerConfig = serde_yaml::from_str(&content).map_err(|e| {
            ExecutionError::ConfigError(format!(
                "Failed to parse configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ExecutionError> {
        if self.submission_url.trim().is_empty() {
            return Err(ExecutionError::ConfigError(
                "submission_url must not be empty".to_string(),
            ));
        }
        if self.result_url.trim().is_empty() {
            return Err(ExecutionError::ConfigError(
                "result_url must not be empty".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(ExecutionError::ConfigError(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.max_poll_attempts == 0 {
            return Err(ExecutionError::ConfigError(
                "max_poll_attempts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RunnerConfig::default();
        assert_eq!(config.submission_url, "http://localhost:8080");
        assert_eq!(config.result_url, "http://localhost:8081");
        assert_eq!(config.poll_interval_ms, 2000);
        assert_eq!(config.max_poll_attempts, 150);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: RunnerConfig =
            serde_yaml::from_str("submission_url: http://runner.example.com\n").unwrap();
        assert_eq!(config.submission_url, "http://runner.example.com");
        assert_eq!(config.result_url, "http://localhost:8081");
        assert_eq!(config.poll_interval_ms, 2000);
    }

    #[tokio::test]
    async fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "submission_url: http://submit.example.com").unwrap();
        writeln!(file, "result_url: http://results.example.com").unwrap();
        writeln!(file, "poll_interval_ms: 500").unwrap();

        let config = RunnerConfig::from_file(file.path()).await.unwrap();
        assert_eq!(config.submission_url, "http://submit.example.com");
        assert_eq!(config.result_url, "http://results.example.com");
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.max_poll_attempts, 150);
    }

    #[tokio::test]
    async fn test_from_missing_file_fails() {
        let result = RunnerConfig::from_file("/nonexistent/remrun.yaml").await;
        assert!(matches!(result, Err(ExecutionError::ConfigError(_))));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = RunnerConfig {
            poll_interval_ms: 0,
            ..RunnerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ExecutionError::ConfigError(_))
        ));
    }

    #[test]
    fn test_empty_url_rejected() {
        let config = RunnerConfig {
            result_url: "".to_string(),
            ..RunnerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ExecutionError::ConfigError(_))
        ));
    }
}
