//! Wire types shared by the submission and result endpoints
//!
//! The two endpoints live on different origins but agree on the same
//! correlation key. Code and stdin travel base64-encoded; the result carries
//! plain text. An empty or absent `output` field is the "not ready yet"
//! signal, there is no separate pending flag.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec;
use crate::correlator::RequestId;
use crate::errors::ExecutionError;

/// Body of `POST /api/v1/submission`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub code: String,
    pub language_id: u32,
    pub request_id: RequestId,
    pub stdin: String,
}

impl ExecutionRequest {
    /// Build a request from plain source text, encoding the bodies for
    /// transport.
    pub fn encode(
        request_id: RequestId,
        language_id: u32,
        source_code: &str,
        stdin: &str,
    ) -> Self {
        ExecutionRequest {
            code: codec::encode(source_code),
            language_id,
            request_id,
            stdin: codec::encode(stdin),
        }
    }

    /// Recover the plain source text from the transport form.
    pub fn source_code(&self) -> Result<String, ExecutionError> {
        codec::decode(&self.code)
    }

    /// Recover the plain stdin text from the transport form.
    pub fn stdin_text(&self) -> Result<String, ExecutionError> {
        codec::decode(&self.stdin)
    }
}

/// Body of `GET /api/v1/submissions/{request_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    #[serde(default)]
    pub output: String,
    /// Echo of the request this result answers. Optional on the wire; when
    /// present it must match the id that was polled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
}

impl ExecutionResult {
    /// Absence of output is the pending signal.
    pub fn is_ready(&self) -> bool {
        !self.output.is_empty()
    }
}

/// Opaque acknowledgement returned by the submission endpoint. The contract
/// does not constrain its shape, so the raw JSON body is kept for logging;
/// non-JSON bodies collapse to `Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Acknowledgement {
    pub body: Value,
}
