//! Bounded retry policy for confirmation polling
//!
//! Confirmation waits are always bounded: a fixed number of attempts with
//! exponentially growing, capped delays. No unbounded loops.

use std::time::Duration;

/// Retry schedule for polling operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of polls before giving up
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    pub initial_delay: Duration,
    /// Ceiling on the per-attempt delay
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Schedule for waiting on transaction confirmation: polls for roughly
    /// five minutes (2s, 4s, 8s, 16s, then 30s steps).
    pub const CONFIRMATION: Self = Self {
        max_attempts: 14,
        initial_delay: Duration::from_secs(2),
        max_delay: Duration::from_secs(30),
    };

    /// Delay to sleep after the given zero-based attempt: doubles each
    /// attempt, capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }

    /// Total time spent sleeping if every attempt fails
    pub fn max_wait(&self) -> Duration {
        (0..self.max_attempts).map(|a| self.delay_for(a)).sum()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::CONFIRMATION
    }
}
