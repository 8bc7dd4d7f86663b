//! Monotonic time source used to measure hashing duration.
//!
//! Production code uses [`MonotonicClock`], backed by [`std::time::Instant`].
//! Tests swap in a virtual clock (see `testing::SimulatedClock`) so that hash
//! durations are deterministic.

use std::time::Instant;

/// A source of monotonic timers.
///
/// # Invariants
///
/// - Monotonicity: a timer's `elapsed_millis` never decreases between calls.
pub trait TimeSource: Send + Sync {
    /// Handle returned by [`TimeSource::start`].
    type Timer: Timer;

    /// Starts a new timer at the current instant.
    fn start(&self) -> Self::Timer;
}

/// A running timer.
pub trait Timer {
    /// Whole milliseconds since the timer was started.
    fn elapsed_millis(&self) -> u64;
}

/// Wall-clock time source backed by the OS monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl TimeSource for MonotonicClock {
    type Timer = Instant;

    fn start(&self) -> Instant {
        Instant::now()
    }
}

impl Timer for Instant {
    fn elapsed_millis(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    type Timer = T::Timer;

    fn start(&self) -> Self::Timer {
        (**self).start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_timer_never_goes_backwards() {
        let timer = MonotonicClock.start();
        let first = timer.elapsed_millis();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = timer.elapsed_millis();
        assert!(second >= first);
        assert!(second >= 2);
    }
}
