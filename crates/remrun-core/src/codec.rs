//! Transport encoding for source code and stdin payloads
//!
//! Both bodies may contain characters that are unsafe for the submission
//! transport's framing, so they travel base64-encoded. The backend decodes
//! with standard base64; `encode` here must stay its exact inverse.

use base64::{engine::general_purpose, Engine as _};

use crate::errors::ExecutionError;

/// Encode arbitrary text into its transport form.
pub fn encode(text: &str) -> String {
    general_purpose::STANDARD.encode(text.as_bytes())
}

/// Decode a transport string back into text.
///
/// Fails when the payload is not valid base64 or does not decode to UTF-8.
pub fn decode(transport: &str) -> Result<String, ExecutionError> {
    let bytes = general_purpose::STANDARD
        .decode(transport)
        .map_err(|e| ExecutionError::ValidationError(format!("Invalid base64 payload: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|e| ExecutionError::ValidationError(format!("Payload is not UTF-8: {}", e)))
}
