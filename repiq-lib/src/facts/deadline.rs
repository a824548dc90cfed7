use core::time::Duration;
use tokio::time::Instant;

/// The point in time by which an invocation must have produced all of its results.
///
/// A single deadline is created per run and copied into every task and every HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Instant);

/// Timeouts too large to represent are clamped to roughly thirty years.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

impl Deadline {
    /// A deadline `timeout` from now.
    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        let now = Instant::now();
        Self(now.checked_add(timeout).or_else(|| now.checked_add(FAR_FUTURE)).unwrap_or(now))
    }

    #[must_use]
    pub const fn instant(self) -> Instant {
        self.0
    }

    /// Time left before the deadline, zero once it has passed.
    #[must_use]
    pub fn remaining(self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }

    #[must_use]
    pub fn is_expired(self) -> bool {
        self.remaining().is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_is_bounded_by_timeout() {
        let deadline = Deadline::after(Duration::from_secs(30));
        assert!(deadline.remaining() <= Duration::from_secs(30));
        assert!(!deadline.is_expired());
    }

    #[test]
    fn huge_timeout_is_clamped() {
        let deadline = Deadline::after(Duration::MAX);
        assert!(!deadline.is_expired());
        assert!(deadline.remaining() > Duration::from_secs(86_400 * 365));
    }

    #[test]
    fn zero_timeout_is_expired() {
        let deadline = Deadline::after(Duration::ZERO);
        assert_eq!(deadline.remaining(), Duration::ZERO);
        assert!(deadline.is_expired());
    }
}
