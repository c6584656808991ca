use std::time::Duration;

use backon::ExponentialBuilder;

/// Exponential backoff settings shared by the HTTP providers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_times: usize,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_times: 2,
            min_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(4),
        }
    }
}

impl RetryPolicy {
    /// No waiting between attempts, for tests against local mocks
    pub fn immediate(max_times: usize) -> Self {
        Self {
            max_times,
            min_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
        }
    }

    /// Upper bound for a whole retried call when each attempt may take up to
    /// `per_attempt`
    pub fn deadline(&self, per_attempt: Duration) -> Duration {
        let attempts = self.max_times as u32 + 1;
        per_attempt * attempts + self.max_delay * self.max_times as u32
    }

    pub fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_times)
    }
}
