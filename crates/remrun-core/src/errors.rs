//! Error types for failure handling across the execution client
//!
//! Every failure in the pipeline is converted into one of these variants at
//! the boundary of the component that produced it. Submission and polling
//! failures are kept distinct so callers can tell which half of the
//! decoupled submit/poll protocol gave up; neither is retried automatically.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("Submission failed: {0}")]
    SubmissionError(String),
    #[error("Polling failed: {0}")]
    PollingError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Timed out waiting for result: {0}")]
    TimeoutError(String),
    #[error("Execution cancelled")]
    Cancelled,
    #[error("I/O error: {0}")]
    IoError(String),
}

impl ExecutionError {
    /// Text shown to the user when this error terminates an execution
    /// attempt. Submission and polling failures keep the wording the
    /// backend's frontends have always displayed.
    pub fn display_text(&self) -> String {
        match self {
            ExecutionError::SubmissionError(msg) => format!("Error: {}", msg),
            ExecutionError::PollingError(msg) => format!("Polling Error: {}", msg),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for ExecutionError {
    fn from(err: std::io::Error) -> Self {
        ExecutionError::IoError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_error_display_text() {
        let err = ExecutionError::SubmissionError("connection refused".to_string());
        assert_eq!(err.display_text(), "Error: connection refused");
    }

    #[test]
    fn test_polling_error_display_text() {
        let err = ExecutionError::PollingError("invalid response body".to_string());
        assert_eq!(err.display_text(), "Polling Error: invalid response body");
    }

    #[test]
    fn test_other_errors_use_display_impl() {
        let err = ExecutionError::TimeoutError("gave up after 150 attempts".to_string());
        assert_eq!(
            err.display_text(),
            "Timed out waiting for result: gave up after 150 attempts"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let err: ExecutionError = io_err.into();
        assert!(matches!(err, ExecutionError::IoError(_)));
    }
}
