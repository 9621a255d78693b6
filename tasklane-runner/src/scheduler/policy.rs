//! Polling policy
//!
//! The cadence at which a submitted job is polled and how many polls it gets
//! before the orchestrator gives up. The budget is fixed up front and never
//! derived from backend responses.

use std::time::Duration;

/// Fixed-interval polling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait between two consecutive polls
    pub interval: Duration,
    /// Maximum number of polls for one job
    pub max_attempts: u32,
}

impl PollPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Nominal polling budget, `interval * max_attempts`
    ///
    /// No wait follows the final poll, so the time actually spent sleeping is
    /// one interval shorter. Saturates at `Duration::MAX`.
    pub fn budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }

    /// Delay to wait after the given (1-based) poll attempt
    ///
    /// Constant for this policy. Kept as a method so a backoff policy can be
    /// swapped in without touching the state machine.
    pub fn delay_after(&self, _attempt: u32) -> Duration {
        self.interval
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.interval.is_zero() {
            anyhow::bail!("poll interval must be greater than 0");
        }

        if self.max_attempts == 0 {
            anyhow::bail!("max poll attempts must be greater than 0");
        }

        Ok(())
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL, Self::DEFAULT_MAX_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_five_minutes() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(5));
        assert_eq!(policy.max_attempts, 60);
        assert_eq!(policy.budget(), Duration::from_secs(300));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_delay_is_constant() {
        let policy = PollPolicy::new(Duration::from_secs(2), 10);
        assert_eq!(policy.delay_after(1), Duration::from_secs(2));
        assert_eq!(policy.delay_after(9), Duration::from_secs(2));
    }

    #[test]
    fn test_budget_saturates_on_huge_interval() {
        let policy = PollPolicy::new(Duration::from_secs(u64::MAX), 60);
        assert_eq!(policy.budget(), Duration::MAX);
    }

    #[test]
    fn test_validation_rejects_zero_values() {
        assert!(PollPolicy::new(Duration::ZERO, 60).validate().is_err());
        assert!(PollPolicy::new(Duration::from_secs(5), 0).validate().is_err());
    }
}
