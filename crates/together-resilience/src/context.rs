//! Per-call cancellation and deadlines.
//!
//! A [`Context`] travels with every API call. Cancelling it, or letting its
//! deadline pass, aborts the in-flight attempt and any pending backoff.
//!
//! ```rust
//! use std::time::Duration;
//! use together_resilience::Context;
//!
//! let root = Context::background();
//! let call = root.with_timeout(Duration::from_secs(30));
//! assert!(call.deadline().is_some());
//! assert!(root.deadline().is_none());
//! ```

use crate::error::TransportError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation token plus optional deadline.
///
/// Clones share the same token. Derived contexts ([`Context::with_cancel`],
/// [`Context::with_timeout`], [`Context::with_deadline`]) use a child token:
/// cancelling the parent cancels them, cancelling them leaves the parent
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A root context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context that can be cancelled independently of this one.
    #[must_use]
    pub fn with_cancel(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Derive a context that expires after `timeout`.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a context that expires at `deadline`. An earlier parent deadline is kept.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current <= deadline => current,
            _ => deadline,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    /// Cancel this context and every context derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether [`Context::cancel`] was called on this context or an ancestor.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The reason this context is done, or `None` while it is still live.
    #[must_use]
    pub fn err(&self) -> Option<TransportError> {
        if self.token.is_cancelled() {
            return Some(TransportError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(TransportError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolve once the context is cancelled or its deadline passes.
    pub async fn done(&self) -> TransportError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                () = self.token.cancelled() => TransportError::Cancelled,
                () = tokio::time::sleep_until(deadline) => TransportError::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                TransportError::Cancelled
            }
        }
    }

    /// Drive `operation` unless the context finishes first.
    ///
    /// # Errors
    /// Returns [`TransportError::Cancelled`] or [`TransportError::DeadlineExceeded`]
    /// when the context wins, otherwise whatever `operation` returns.
    pub async fn run<F, T>(&self, operation: F) -> Result<T, TransportError>
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }

        tokio::select! {
            biased;
            err = self.done() => Err(err),
            result = operation => result,
        }
    }

    /// Sleep for `delay`, waking early with an error if the context finishes.
    ///
    /// # Errors
    /// Returns the cancellation reason if the context finishes first.
    pub async fn sleep(&self, delay: Duration) -> Result<(), TransportError> {
        self.run(async {
            tokio::time::sleep(delay).await;
            Ok(())
        })
        .await
    }
}
