//! Capped exponential backoff.

use std::time::Duration;

/// Delay owed before retry number `attempt` (zero-based).
///
/// `min * 2^attempt`, capped at `max`. Attempt 0 waits exactly `min`.
/// Overflow saturates to `max`.
pub fn delay_for_attempt(attempt: u32, min: Duration, max: Duration) -> Duration {
    let scaled = 2u32
        .checked_pow(attempt)
        .and_then(|factor| min.checked_mul(factor))
        .unwrap_or(max);

    scaled.min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Duration = Duration::from_millis(250);
    const MAX: Duration = Duration::from_secs(8);

    #[test]
    fn test_backoff_calculation() {
        assert_eq!(delay_for_attempt(0, MIN, MAX), Duration::from_millis(250));
        assert_eq!(delay_for_attempt(1, MIN, MAX), Duration::from_millis(500));
        assert_eq!(delay_for_attempt(2, MIN, MAX), Duration::from_secs(1));
        assert_eq!(delay_for_attempt(5, MIN, MAX), Duration::from_secs(8));
        assert_eq!(delay_for_attempt(6, MIN, MAX), MAX);
    }

    #[test]
    fn test_monotonic_and_capped() {
        let mut previous = Duration::ZERO;
        for attempt in 0..64 {
            let delay = delay_for_attempt(attempt, MIN, MAX);
            assert!(delay >= previous);
            assert!(delay <= MAX);
            previous = delay;
        }
    }

    #[test]
    fn test_huge_attempt_saturates() {
        assert_eq!(delay_for_attempt(u32::MAX, MIN, MAX), MAX);
        assert_eq!(
            delay_for_attempt(40, Duration::from_secs(u64::MAX / 2), Duration::MAX),
            Duration::MAX
        );
    }
}
