//! Backoff schedule between faucet polls.

use std::time::Duration;

// ---------------------------------------------------------------------------
// RetryPolicy
// ---------------------------------------------------------------------------

/// Exponential backoff between attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Maximum delay between retries.
    pub max_backoff: Duration,
    /// Multiplier applied to the backoff after each retry.
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// No delay between attempts.
    pub const fn immediate() -> Self {
        Self::fixed(Duration::ZERO)
    }

    /// Fixed delay between attempts.
    pub const fn fixed(delay: Duration) -> Self {
        Self {
            initial_backoff: delay,
            max_backoff: delay,
            backoff_multiplier: 1.0,
        }
    }

    /// Compute the backoff duration for the given attempt number (0-indexed).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return self.initial_backoff.min(self.max_backoff);
        }
        let factor = self.backoff_multiplier.powi(attempt.min(i32::MAX as u32) as i32);
        let ms = (self.initial_backoff.as_millis() as f64 * factor) as u64;
        Duration::from_millis(ms).min(self.max_backoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_for(0), Duration::from_secs(1));
        assert_eq!(policy.backoff_for(1), Duration::from_secs(2));
        assert_eq!(policy.backoff_for(3), Duration::from_secs(8));
        assert_eq!(policy.backoff_for(4), Duration::from_secs(10));
        assert_eq!(policy.backoff_for(200), Duration::from_secs(10));
    }

    #[test]
    fn immediate_never_waits() {
        let policy = RetryPolicy::immediate();
        assert_eq!(policy.backoff_for(0), Duration::ZERO);
        assert_eq!(policy.backoff_for(7), Duration::ZERO);
    }

    #[test]
    fn fixed_delay_is_constant() {
        let policy = RetryPolicy::fixed(Duration::from_millis(250));
        assert_eq!(policy.backoff_for(0), Duration::from_millis(250));
        assert_eq!(policy.backoff_for(5), Duration::from_millis(250));
    }
}
