//! Request identifier generation
//!
//! Every execution attempt gets a fresh v4 UUID that correlates the
//! submission with its later result across the two endpoints. Ids are never
//! reused; a collision would be an assumption violation, not a handled case.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation key linking a submission to the result it will produce.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Issue a fresh identifier for a new execution attempt.
    pub fn generate() -> Self {
        RequestId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        RequestId(value.to_string())
    }
}
