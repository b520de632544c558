use std::time::Duration;

/// Exponential backoff policy for prefetch attempts.
///
/// There is deliberately no delay cap: the attempt budget bounds the total
/// wait, and the reference behavior lets the delay grow freely within one
/// acquisition call.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Growth factor applied after each failed attempt.
    pub multiplier: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(5),
            multiplier: 2.0,
        }
    }
}

impl BackoffPolicy {
    /// Delay to sleep after the failure of attempt `failures` (0-indexed):
    /// `base_delay * multiplier^failures`, saturating at `Duration::MAX`
    /// once the growth overflows what a `Duration` can represent.
    ///
    /// Derived purely from the failure count rather than a running value, so
    /// rounding never feeds back into later delays.
    pub fn delay_for(&self, failures: u32) -> Duration {
        let secs = self.base_delay.as_secs_f64() * self.multiplier.powi(failures as i32);
        if secs.is_finite() && secs < Duration::MAX.as_secs_f64() {
            Duration::from_secs_f64(secs)
        } else {
            Duration::MAX
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_schedule_doubles_from_five_seconds() {
        let p = BackoffPolicy::default();
        assert_eq!(p.delay_for(0), Duration::from_secs(5));
        assert_eq!(p.delay_for(1), Duration::from_secs(10));
        assert_eq!(p.delay_for(2), Duration::from_secs(20));
    }

    #[test]
    fn multiplier_is_honored_generically() {
        let p = BackoffPolicy {
            max_attempts: 5,
            base_delay: Duration::from_secs(2),
            multiplier: 3.0,
        };
        assert_eq!(p.delay_for(0), Duration::from_secs(2));
        assert_eq!(p.delay_for(1), Duration::from_secs(6));
        assert_eq!(p.delay_for(2), Duration::from_secs(18));
    }

    #[test]
    fn growth_is_uncapped() {
        let p = BackoffPolicy::default();
        assert_eq!(p.delay_for(10), Duration::from_secs(5 * 1024));
    }

    #[test]
    fn overflowing_growth_saturates_instead_of_panicking() {
        let p = BackoffPolicy::default();
        // 5s * 2^10000 overflows any Duration.
        assert_eq!(p.delay_for(10_000), Duration::MAX);
    }
}
