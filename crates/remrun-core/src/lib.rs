//! Client library for a remote code-execution backend.
//!
//! This crate implements the asynchronous execution-request lifecycle:
//! encoding a request, submitting it to the submission endpoint, correlating
//! it with a generated request identifier, and polling the separate result
//! endpoint until output is available or an unrecoverable error occurs.
//!
//! # Architecture Overview
//!
//! The pipeline is organized around a handful of small components:
//!
//! - **Payload codec**: lossless base64 transport encoding for code and stdin
//! - **Correlator**: collision-free request identifiers linking submit to poll
//! - **Language catalog**: the fixed runtime table, validated before use
//! - **Submission client**: one POST per attempt, no retries
//! - **Polling client**: bounded fixed-interval poll loop with cancellation
//! - **Execution session**: the state machine sequencing the above and
//!   exposing phase and latest output to frontends
//! - **Configuration**: endpoint origins and timing, loadable from YAML

pub mod catalog;
pub mod clients;
pub mod codec;
pub mod config;
pub mod correlator;
pub mod errors;
pub mod protocol;
pub mod session;

pub use catalog::{Language, LanguageCatalog};
pub use clients::{PollingClient, SubmissionClient};
pub use config::RunnerConfig;
pub use correlator::RequestId;
pub use errors::ExecutionError;
pub use protocol::{Acknowledgement, ExecutionRequest, ExecutionResult};
pub use session::{ExecutionPhase, ExecutionSession, SessionEvent};

#[cfg(test)]
pub mod test_utils;
