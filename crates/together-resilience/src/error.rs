//! Transport-level failures.

use reqwest::StatusCode;
use thiserror::Error;

/// A failure below the HTTP status layer: the request could not be built,
/// could not be delivered, or was abandoned.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be constructed (bad URL, bad header, ...).
    #[error("HTTP request creation failed: {message}")]
    Build {
        /// What went wrong while building the request.
        message: String,
    },

    /// The underlying HTTP client failed to deliver the request or read the response.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a status that is treated as transient.
    #[error("server responded with retryable status {0}")]
    Status(StatusCode),

    /// Every allowed attempt failed with a retryable condition.
    #[error("giving up after {attempts} attempt(s): {last}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The failure observed on the final attempt.
        #[source]
        last: Box<TransportError>,
    },

    /// The caller's context was cancelled.
    #[error("request cancelled: context cancelled")]
    Cancelled,

    /// The caller's context deadline passed.
    #[error("request cancelled: context deadline exceeded")]
    DeadlineExceeded,
}

impl TransportError {
    /// Create a request-construction error.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    /// Whether the failure came from the caller's context rather than the network.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }

    /// Whether another attempt could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => {
                !e.is_builder() && !e.is_redirect() && !e.is_decode() && !e.is_status()
            }
            Self::Status(_) => true,
            Self::Build { .. }
            | Self::RetriesExhausted { .. }
            | Self::Cancelled
            | Self::DeadlineExceeded => false,
        }
    }

    /// Number of attempts made, when the failure went through the retry loop.
    #[must_use]
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::RetriesExhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}
