//! # Together Resilience
//!
//! Transport-level plumbing shared by every Together API call:
//! - [`Context`] for caller-driven cancellation and deadlines
//! - Retry policy with bounded exponential backoff
//! - [`RetryingTransport`], a `reqwest` client wrapper that retries transient failures

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod retry;
pub mod transport;

// Re-export main types
pub use context::Context;
pub use error::TransportError;
pub use retry::{RetryConfig, RetryPolicy, RetryPolicyBuilder};
pub use transport::RetryingTransport;
