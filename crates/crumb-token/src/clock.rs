//! Time source used for issuance and expiry checks.

use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of "now" for token timestamps.
///
/// Implementations must be cheap and safe to call concurrently.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to, with one-second resolution.
///
/// Intended for tests that need to cross expiry boundaries without sleeping.
#[derive(Debug)]
pub struct ManualClock {
    seconds: AtomicI64,
}

impl ManualClock {
    /// Start at the given instant, truncated to whole seconds.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self::at_timestamp(start.timestamp())
    }

    /// Start at the given epoch second.
    pub fn at_timestamp(seconds: i64) -> Self {
        Self {
            seconds: AtomicI64::new(seconds),
        }
    }

    /// Start at the current wall-clock second.
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }

    /// Move the clock forward (or back, for a negative duration).
    pub fn advance(&self, by: Duration) {
        self.seconds.fetch_add(by.num_seconds(), Ordering::SeqCst);
    }

    pub fn set(&self, to: DateTime<Utc>) {
        self.seconds.store(to.timestamp(), Ordering::SeqCst);
    }

    pub fn timestamp(&self) -> i64 {
        self.seconds.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.timestamp(), 0).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::at_timestamp(1_000);
        assert_eq!(clock.now().timestamp(), 1_000);

        clock.advance(Duration::seconds(2));
        assert_eq!(clock.now().timestamp(), 1_002);

        clock.advance(Duration::seconds(-5));
        assert_eq!(clock.now().timestamp(), 997);
    }

    #[test]
    fn test_manual_clock_set() {
        let clock = ManualClock::at_timestamp(0);
        let target = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        clock.set(target);
        assert_eq!(clock.now(), target);
    }

    #[test]
    fn test_manual_clock_shared_across_threads() {
        let clock = Arc::new(ManualClock::at_timestamp(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let clock = Arc::clone(&clock);
                thread::spawn(move || clock.advance(Duration::seconds(1)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(clock.timestamp(), 8);
    }

    #[test]
    fn test_system_clock_is_close_to_now() {
        let delta = Utc::now() - SystemClock.now();
        assert!(delta.num_seconds().abs() < 5);
    }
}
