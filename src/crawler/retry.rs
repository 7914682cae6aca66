//! Retry decisions, kept apart from the actual sleeping

use crate::config::FetcherConfig;
use crate::FetchFailure;
use std::time::Duration;

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait this long, then try again
    Retry(Duration),
    /// Stop and report the failure
    GiveUp,
}

/// Bounded retry with linear backoff
///
/// | Condition | Action |
/// |-----------|--------|
/// | Transport failure, attempts left | Retry after `base_backoff * attempt` |
/// | Transport failure, last attempt | Give up |
/// | Unexpected status | Give up immediately |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_backoff,
        }
    }

    pub fn from_config(config: &FetcherConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.base_backoff_ms),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decides what follows failed attempt number `attempt` (1-based)
    pub fn after_failure(&self, attempt: u32, failure: &FetchFailure) -> RetryDecision {
        if !failure.is_retryable() || attempt >= self.max_attempts {
            return RetryDecision::GiveUp;
        }
        RetryDecision::Retry(self.base_backoff * attempt)
    }
}
