//! HTTP transport with bounded automatic retry.

use crate::context::Context;
use crate::error::TransportError;
use crate::retry::RetryPolicy;
use reqwest::{Request, Response};
use tracing::{debug, warn};

/// A `reqwest` client that retries transient failures.
///
/// Network failures, 429 and 5xx (except 501) are retried according to the
/// [`RetryPolicy`]. Any other response is handed back after the first
/// attempt, whatever its status. Each call yields exactly one outcome: a
/// response, or an error once retries are used up or the context finishes.
#[derive(Debug, Clone)]
pub struct RetryingTransport {
    http: reqwest::Client,
    policy: RetryPolicy,
}

impl RetryingTransport {
    /// Wrap an HTTP client with a retry policy.
    #[must_use]
    pub fn new(http: reqwest::Client, policy: RetryPolicy) -> Self {
        Self { http, policy }
    }

    /// The underlying HTTP client, used to build requests.
    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The retry policy.
    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Send `request`, retrying transient failures until the policy or the
    /// context says stop.
    ///
    /// Requests whose body cannot be cloned get a single attempt.
    ///
    /// # Errors
    /// - [`TransportError::Cancelled`] / [`TransportError::DeadlineExceeded`] when `ctx` finishes first
    /// - [`TransportError::RetriesExhausted`] when the final attempt still failed transiently
    /// - [`TransportError::Request`] for failures that are not worth retrying
    pub async fn send(&self, ctx: &Context, request: Request) -> Result<Response, TransportError> {
        let max_retries = self.policy.max_retries();
        let mut request = request;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let next = if attempt <= max_retries {
                request.try_clone()
            } else {
                None
            };

            let outcome = ctx
                .run(async { self.http.execute(request).await.map_err(TransportError::from) })
                .await;

            let failure = match outcome {
                Ok(response) if self.policy.should_retry_status(response.status()) => {
                    TransportError::Status(response.status())
                }
                Ok(response) => {
                    if attempt > 1 {
                        debug!(attempt = attempt, "Retry succeeded");
                    }
                    return Ok(response);
                }
                Err(error) if !self.policy.is_retryable(&error) => return Err(error),
                Err(error) => error,
            };

            let Some(next) = next else {
                return Err(TransportError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(failure),
                });
            };

            let delay = self.policy.delay_for_attempt(attempt - 1);
            warn!(
                attempt = attempt,
                max_retries = max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %failure,
                "Retrying after transient failure"
            );

            ctx.sleep(delay).await?;
            request = next;
        }
    }
}
