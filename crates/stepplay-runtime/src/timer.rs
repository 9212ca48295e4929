#![forbid(unsafe_code)]

//! The single repeating timer behind auto-advance.
//!
//! # Invariants
//!
//! 1. At most one arming is live. [`IntervalTimer::arm`] replaces any prior
//!    arming; there is no way to hold two.
//! 2. Every arming gets a fresh [`TimerToken`]. A token from a cancelled or
//!    replaced arming is stale forever, so a late callback cannot tick.
//! 3. [`IntervalTimer::poll`] yields at most one tick per call. When the host
//!    stalls past several intervals the missed ones are dropped and the
//!    schedule realigns to the original grid; ticks never burst.
//!
//! # Failure Modes
//!
//! - **Zero interval**: clamped to [`MIN_INTERVAL`] to keep the schedule finite.

use std::time::Duration;

/// Smallest interval the timer accepts.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
#[must_use]
pub fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Identity of one arming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    generation: u64,
}

impl TimerToken {
    /// Arming generation (monotonically increasing per timer).
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    token: TimerToken,
    interval: Duration,
    next_due: Duration,
}

/// Cancellable repeating timer owned by the playback controller.
#[derive(Debug, Default, Clone)]
pub struct IntervalTimer {
    generation: u64,
    armed: Option<Armed>,
    ticks_fired: u64,
    missed_coalesced: u64,
    stale_rejected: u64,
}

impl IntervalTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm at `interval`, first tick due at `now + interval`.
    ///
    /// Any previous arming is cancelled first.
    pub fn arm(&mut self, now: Duration, interval: Duration) -> TimerToken {
        let interval = interval.max(MIN_INTERVAL);
        if let Some(prev) = self.armed.take() {
            tracing::debug!(
                playback_event = "timer_cancel",
                generation = prev.token.generation,
                reason = "rearm",
            );
        }
        self.generation += 1;
        let token = TimerToken {
            generation: self.generation,
        };
        self.armed = Some(Armed {
            token,
            interval,
            next_due: now.saturating_add(interval),
        });
        tracing::debug!(
            playback_event = "timer_arm",
            generation = token.generation,
            interval_ms = duration_ms(interval),
        );
        token
    }

    /// Cancel the live arming. Returns `true` if one existed.
    pub fn cancel(&mut self) -> bool {
        match self.armed.take() {
            Some(prev) => {
                tracing::debug!(
                    playback_event = "timer_cancel",
                    generation = prev.token.generation,
                    reason = "cancel",
                );
                true
            }
            None => false,
        }
    }

    /// Whether an arming is live.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Token of the live arming.
    #[must_use]
    pub fn token(&self) -> Option<TimerToken> {
        self.armed.map(|a| a.token)
    }

    /// Interval of the live arming.
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.armed.map(|a| a.interval)
    }

    /// When the next tick is due.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.armed.map(|a| a.next_due)
    }

    /// Whether `token` belongs to the live arming.
    #[must_use]
    pub fn is_current(&self, token: TimerToken) -> bool {
        self.armed.is_some_and(|a| a.token == token)
    }

    /// Accept a host-delivered tick. Stale tokens are counted and refused.
    pub fn accept(&mut self, token: TimerToken) -> bool {
        if self.is_current(token) {
            self.ticks_fired += 1;
            true
        } else {
            self.stale_rejected += 1;
            tracing::debug!(
                playback_event = "timer_stale",
                generation = token.generation,
                current = self.token().map(|t| t.generation),
            );
            false
        }
    }

    /// Return the live token if a tick is due at `now`, and schedule the next.
    pub fn poll(&mut self, now: Duration) -> Option<TimerToken> {
        let armed = self.armed.as_mut()?;
        if now < armed.next_due {
            return None;
        }
        let behind = now - armed.next_due;
        let missed = behind.as_nanos() / armed.interval.as_nanos();
        if missed > 0 {
            self.missed_coalesced += u64::try_from(missed).unwrap_or(u64::MAX);
        }
        let skip = u32::try_from(missed.saturating_add(1)).unwrap_or(u32::MAX);
        armed.next_due = armed
            .next_due
            .saturating_add(armed.interval.saturating_mul(skip));
        self.ticks_fired += 1;
        Some(armed.token)
    }

    /// Ticks delivered since construction.
    #[must_use]
    pub fn ticks_fired(&self) -> u64 {
        self.ticks_fired
    }

    /// Intervals dropped because the host polled late.
    #[must_use]
    pub fn missed_coalesced(&self) -> u64 {
        self.missed_coalesced
    }

    /// Stale tokens refused by [`accept`](Self::accept).
    #[must_use]
    pub fn stale_rejected(&self) -> u64 {
        self.stale_rejected
    }
}
