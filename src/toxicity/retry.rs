// Bounded retry for the provider's "model is loading" condition.
//
// Hosted models are evicted when idle and take a while to come back. By
// default nothing is retried and ModelLoading goes straight back to the
// caller; setting HF_LOADING_RETRIES > 0 makes the classifier wait and try
// again a fixed number of times before giving up.

use tokio::time::Duration;

/// Retry settings for ModelLoading responses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadingRetry {
    /// Extra attempts after the first call. 0 disables retrying.
    pub max_retries: u32,
    /// Delay before the first retry when the provider gives no estimate.
    pub base_delay: Duration,
    /// Upper bound on any single wait.
    pub max_delay: Duration,
}

impl Default for LoadingRetry {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
        }
    }
}

impl LoadingRetry {
    pub fn is_enabled(&self) -> bool {
        self.max_retries > 0
    }

    /// How long to wait before retry number `attempt` (0-based).
    ///
    /// Uses the provider's `estimated_time` when it sent one, otherwise
    /// doubles `base_delay` per attempt. Always capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32, estimated_time: Option<f64>) -> Duration {
        let delay = match estimated_time {
            Some(secs) if secs.is_finite() && secs > 0.0 => {
                Duration::from_secs_f64(secs.min(self.max_delay.as_secs_f64()))
            }
            _ => self
                .base_delay
                .saturating_mul(2u32.saturating_pow(attempt.min(16))),
        };
        delay.min(self.max_delay)
    }

    /// Sleep for the computed delay.
    pub async fn wait(&self, attempt: u32, estimated_time: Option<f64>) {
        tokio::time::sleep(self.delay_for(attempt, estimated_time)).await;
    }
}
