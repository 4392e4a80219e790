use std::time::Duration;

use crate::config::BackoffConfig;

/// Delay schedule for reconnects after keepalive failures.
///
/// The first reconnect is immediate; each further one without a completed
/// ping round-trip in between waits `base * 2^(n-1)`, capped at `max`.
#[derive(Clone, Debug)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    failures: u32,
}

impl Backoff {
    pub fn new(config: &BackoffConfig) -> Self {
        Self {
            base: config.base(),
            max: config.max(),
            failures: 0,
        }
    }

    /// Delay before the next reconnect; counts one failure.
    pub fn next_delay(&mut self) -> Duration {
        let delay = match self.failures {
            0 => Duration::ZERO,
            n => {
                let factor = 2u32.checked_pow(n - 1).unwrap_or(u32::MAX);
                self.base.saturating_mul(factor).min(self.max)
            }
        };
        self.failures = self.failures.saturating_add(1);
        delay
    }

    /// Forget past failures.
    pub fn reset(&mut self) {
        self.failures = 0;
    }

    /// Consecutive failures so far.
    pub fn failures(&self) -> u32 {
        self.failures
    }
}
