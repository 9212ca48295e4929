#![forbid(unsafe_code)]

//! Monotonic time sources for the playback timer.
//!
//! The controller never calls `Instant::now()` directly; all time flows
//! through [`PlaybackClock`], so tests and browser hosts can drive it.

use std::time::Duration;

/// Monotonic clock abstraction.
pub trait PlaybackClock {
    /// Elapsed time since an unspecified epoch, monotonically increasing.
    fn now(&self) -> Duration;
}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time. Earlier values are ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    /// Advance by `ms` milliseconds.
    pub fn advance_ms(&mut self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl PlaybackClock for DeterministicClock {
    fn now(&self) -> Duration {
        self.now
    }
}

/// Wall clock backed by `web_time::Instant` (native and `wasm32`).
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: web_time::Instant,
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackClock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_clock_advances() {
        let mut clock = DeterministicClock::new();
        clock.advance_ms(50);
        clock.advance(Duration::from_millis(25));
        assert_eq!(clock.now(), Duration::from_millis(75));
    }

    #[test]
    fn deterministic_clock_never_goes_backwards() {
        let mut clock = DeterministicClock::new();
        clock.set(Duration::from_secs(2));
        clock.set(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(2));
    }

    #[test]
    fn monotonic_clock_is_monotonic() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
