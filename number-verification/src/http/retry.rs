//! Bounded exponential backoff for transient transport failures.

use std::time::{Duration, SystemTime};

use reqwest_retry::{RetryDecision, RetryPolicy};

/// Exponential backoff retry policy.
///
/// Delays double from `base_delay` up to `max_delay`. Retrying stops after
/// `max_retries` attempts or once `max_elapsed` has passed since the first
/// request was sent, whichever comes first.
#[derive(Debug, Clone)]
pub(crate) struct BackoffPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
    max_elapsed: Duration,
}

impl BackoffPolicy {
    /// Create a new retry policy with default delays.
    ///
    /// # Arguments
    ///
    /// * `max_retries` - Maximum number of retry attempts
    pub(crate) fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            max_elapsed: Duration::from_secs(60),
        }
    }

    fn delay_for(&self, n_past_retries: u32) -> Duration {
        let factor = 2_u32.saturating_pow(n_past_retries);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

impl RetryPolicy for BackoffPolicy {
    fn should_retry(&self, request_start_time: SystemTime, n_past_retries: u32) -> RetryDecision {
        if n_past_retries >= self.max_retries {
            return RetryDecision::DoNotRetry;
        }

        let elapsed = request_start_time.elapsed().unwrap_or_default();
        let delay = self.delay_for(n_past_retries);
        if elapsed + delay > self.max_elapsed {
            return RetryDecision::DoNotRetry;
        }

        RetryDecision::Retry {
            execute_after: SystemTime::now() + delay,
        }
    }
}
