//! Error types for the Together SDK.

use thiserror::Error;
use together_resilience::TransportError;

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when using the Together SDK.
///
/// Match on [`Error::kind`] to branch on the failure category instead of
/// inspecting messages.
#[derive(Error, Debug)]
pub enum Error {
    /// The client was built or called incorrectly (missing context, empty credential, ...).
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// A required argument is missing or out of range. No request was sent.
    #[error("Invalid argument `{field}`: {message}")]
    Validation {
        /// The argument that failed validation.
        field: &'static str,
        /// Error message describing the problem.
        message: String,
    },

    /// The request could not be built, delivered, or was cancelled.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service answered with a non-200 status.
    #[error("HTTP request failed ({status}): {body}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Raw response body, verbatim.
        body: String,
    },

    /// A 200 response body did not match the expected shape.
    #[error("Failed to decode response: {message}")]
    Decode {
        /// Error message from the decoder.
        message: String,
        /// Raw response body.
        body: String,
    },
}

/// Failure category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::Configuration`].
    Configuration,
    /// See [`Error::Validation`].
    Validation,
    /// See [`Error::Transport`].
    Transport,
    /// See [`Error::Remote`].
    Remote,
    /// See [`Error::Decode`].
    Decode,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Validation => write!(f, "validation"),
            Self::Transport => write!(f, "transport"),
            Self::Remote => write!(f, "remote"),
            Self::Decode => write!(f, "decode"),
        }
    }
}

impl Error {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// The error returned when a call is made without a context.
    pub fn no_context() -> Self {
        Self::configuration("no context provided")
    }

    /// Create a validation error for `field`.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a validation error for a missing required argument.
    pub fn missing(field: &'static str) -> Self {
        Self::validation(field, format!("no {field} provided"))
    }

    /// Create a remote error from a status code and raw body.
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::Remote {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            body: body.into(),
        }
    }

    /// The failure category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Remote { .. } => ErrorKind::Remote,
            Self::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// Get the HTTP status code if the service answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The argument that failed validation, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Check if calling again later could plausibly succeed.
    ///
    /// True for network failures, exhausted retries, 429 and 5xx responses.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => {
                e.is_retryable() || matches!(e, TransportError::RetriesExhausted { .. })
            }
            Self::Remote { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Check if the call was abandoned because its context finished.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_cancellation())
    }
}
