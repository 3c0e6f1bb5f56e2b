//! Retry policy with exponential backoff.
//!
//! Backoff grows by a fixed multiplier from `base_delay` and is capped at
//! `max_delay`, so successive delays never shrink and never exceed the cap.

use crate::error::TransportError;
use reqwest::StatusCode;
use std::time::Duration;

/// Retry configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Backoff multiplier (values below 1.0 are treated as 1.0)
    pub multiplier: f64,
}

impl RetryConfig {
    /// Default number of retries.
    pub const DEFAULT_MAX_RETRIES: u32 = 5;
    /// Default delay before the first retry (1 second).
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
    /// Default cap on a single delay (30 seconds).
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);
    /// Default backoff multiplier.
    pub const DEFAULT_MULTIPLIER: f64 = 2.0;
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            base_delay: Self::DEFAULT_BASE_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            multiplier: Self::DEFAULT_MULTIPLIER,
        }
    }
}

/// Retry policy implementation
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a new retry policy with the given configuration
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Create a builder
    #[must_use]
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::new()
    }

    /// Maximum number of retries after the first attempt
    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.config.max_retries
    }

    /// Calculate delay before retry number `retry` (0-indexed)
    #[must_use]
    pub fn delay_for_attempt(&self, retry: u32) -> Duration {
        let base = self.config.base_delay.as_millis() as f64;
        let max = self.config.max_delay.as_millis() as f64;
        let multiplier = self.config.multiplier.max(1.0);
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);

        let delay = (base * multiplier.powi(exponent)).min(max);
        if delay.is_finite() {
            Duration::from_millis(delay.max(0.0) as u64)
        } else {
            self.config.max_delay
        }
    }

    /// Check if a response status should be retried.
    ///
    /// 429 and every 5xx except 501 are transient.
    #[must_use]
    pub fn should_retry_status(&self, status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS
            || (status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED)
    }

    /// Check if a transport failure should be retried
    #[must_use]
    pub fn is_retryable(&self, error: &TransportError) -> bool {
        error.is_retryable()
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

/// Builder for retry policy
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    config: RetryConfig,
}

impl RetryPolicyBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max retries
    #[must_use]
    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    /// Set base delay
    #[must_use]
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.config.base_delay = delay;
        self
    }

    /// Set max delay
    #[must_use]
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.config.max_delay = delay;
        self
    }

    /// Set backoff multiplier
    #[must_use]
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.config.multiplier = multiplier.max(1.0);
        self
    }

    /// Build the policy
    #[must_use]
    pub fn build(self) -> RetryPolicy {
        RetryPolicy::new(self.config)
    }
}
