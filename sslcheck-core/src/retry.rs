//! Retry logic with exponential backoff for transient API failures.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use crate::error::{Result, SslCheckError};

/// Configuration for retry behavior with exponential backoff.
///
/// All fields are public; the handful of builder methods cover the
/// settings callers adjust most often.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    pub max_attempts: usize,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on the delay between retries.
    pub max_delay: Duration,
    /// Backoff multiplier applied after each retry.
    pub multiplier: f64,
    /// Whether to randomize delays to avoid thundering herd.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Creates a new retry policy with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of attempts.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Sets the delay before the first retry.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Creates a policy that disables retries (single attempt only).
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Calculates the delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        if attempt == 0 {
            return self.initial_delay;
        }

        // Cap the exponent so powi() stays finite for huge attempt counts
        let exponent = attempt.min(20) as i32;
        let backoff = self.initial_delay.as_millis() as f64 * self.multiplier.powi(exponent);
        let capped = backoff.min(self.max_delay.as_millis() as f64);

        let millis = if self.jitter {
            // Random point between 50% and 100% of the computed delay
            capped * rand::thread_rng().gen_range(0.5..1.0)
        } else {
            capped
        };

        Duration::from_millis(millis as u64)
    }
}

/// Trait for classifying whether an error is retryable.
pub trait RetryClassifier: Send + Sync {
    /// Returns true if the error is transient and the operation should be retried.
    fn is_retryable(&self, error: &SslCheckError) -> bool;
}

/// Default classifier for certificate check API calls.
///
/// Retryable: timeouts, connection failures, rate limiting (429) and
/// server errors (5xx). Not retryable: invalid input, missing or
/// rejected API keys, and decode failures.
#[derive(Debug, Clone, Default)]
pub struct ApiRetryClassifier;

impl ApiRetryClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl RetryClassifier for ApiRetryClassifier {
    fn is_retryable(&self, error: &SslCheckError) -> bool {
        match error {
            // Transient errors - worth retrying
            SslCheckError::Timeout(_) => true,
            SslCheckError::RateLimited(_) => true,

            // Reqwest errors need deeper inspection
            SslCheckError::HttpError(e) => is_transient_reqwest_error(e),

            // API errors might be transient server-side failures
            SslCheckError::ApiError(msg) => {
                let lower = msg.to_lowercase();
                lower.contains("status 5") || lower.contains("timeout")
            }

            // Not retryable - permanent failures
            SslCheckError::MissingDomain => false,
            SslCheckError::InvalidDomain(_) => false,
            SslCheckError::MissingApiKey => false,
            SslCheckError::Unauthorized(_) => false,
            SslCheckError::JsonError(_) => false,
            SslCheckError::RetryExhausted { .. } => false,
            SslCheckError::Other(_) => false,
        }
    }
}

/// Checks if a reqwest error is transient and worth retrying.
fn is_transient_reqwest_error(error: &reqwest::Error) -> bool {
    if error.is_connect() || error.is_timeout() {
        return true;
    }

    if let Some(status) = error.status() {
        // 429 retries with backoff, 5xx is transient, other 4xx is not
        return status.as_u16() == 429 || status.is_server_error();
    }

    if error.is_request() || error.is_body() {
        return false;
    }

    // Default: assume transient for unknown errors
    true
}

/// Executes operations with retry logic using exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryExecutor<C: RetryClassifier> {
    policy: RetryPolicy,
    classifier: C,
}

impl RetryExecutor<ApiRetryClassifier> {
    /// Creates a new executor with the default API retry classifier.
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            classifier: ApiRetryClassifier::new(),
        }
    }
}

impl<C: RetryClassifier> RetryExecutor<C> {
    /// Creates a new executor with a custom classifier.
    pub fn with_classifier(policy: RetryPolicy, classifier: C) -> Self {
        Self { policy, classifier }
    }

    /// Executes an async operation, retrying up to `max_attempts` times
    /// on retryable errors with backoff delays in between.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_error: Option<SslCheckError> = None;
        let mut attempt = 0;

        while attempt < self.policy.max_attempts {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    let is_retryable = self.classifier.is_retryable(&e);
                    let attempts_remaining = self.policy.max_attempts - attempt - 1;

                    if !is_retryable || attempts_remaining == 0 {
                        if attempt > 0 {
                            warn!(
                                attempt = attempt + 1,
                                max_attempts = self.policy.max_attempts,
                                error = %e,
                                "Operation failed after retries"
                            );
                        }
                        return Err(if attempt > 0 {
                            SslCheckError::RetryExhausted {
                                attempts: attempt + 1,
                                last_error: e.to_string(),
                            }
                        } else {
                            e
                        });
                    }

                    let delay = self.policy.delay_for_attempt(attempt);
                    debug!(
                        attempt = attempt + 1,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "Retrying after transient error"
                    );

                    last_error = Some(e);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }

        // Should not reach here, but handle it gracefully
        Err(last_error
            .unwrap_or_else(|| SslCheckError::Other("retry loop exited unexpectedly".into())))
    }
}
