//! HTTP clients for the two backend endpoints
//!
//! Submission and polling are deliberately separate clients: the endpoints
//! live on different origins and fail independently. Neither client retries;
//! retry policy, if any, belongs to the caller.

pub mod polling;
pub mod submission;

pub use polling::PollingClient;
pub use submission::SubmissionClient;
