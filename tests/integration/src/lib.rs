//! Integration tests for the Together SDK
//!
//! Every test runs the real client against a wiremock server:
//! - End-to-end endpoint behavior and argument validation
//! - Header composition and credential redaction on the wire and in logs
//! - Retry, backoff and cancellation
//! - Concurrent use of a shared client

pub mod helpers;

// Re-export commonly used items
pub use fixtures::*;
pub use helpers::*;
pub use mock_service::*;

#[cfg(test)]
mod resilience_tests;
#[cfg(test)]
mod scenario_tests;
