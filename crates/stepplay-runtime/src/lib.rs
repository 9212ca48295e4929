#![forbid(unsafe_code)]

//! Playback runtime for stepplay.
//!
//! # Key Components
//!
//! - [`PlaybackController`]: Idle/Playing/Paused/Finished state machine
//!   owning one sequence, one cursor, and one timer.
//! - [`PlaybackCursor`]: position within a sequence; forward, backward, seek.
//! - [`VisualApplier`]: the rendering boundary, with a declared
//!   [`BackwardStrategy`].
//! - [`IntervalTimer`]: generation-tokened repeating timer that coalesces
//!   stalls instead of bursting.
//! - [`PlaybackClock`]: [`DeterministicClock`] for tests and hosts that push
//!   time, [`MonotonicClock`] for native loops.
//! - [`PlaybackConfig`]: speeds, manual-step policy, log size, input limits.
//! - [`StepLog`]: bounded JSONL-exportable log.
//!
//! # Role in stepplay
//!
//! `stepplay-core` describes what happened; this crate decides when the
//! host sees it.

pub mod applier;
pub mod clock;
pub mod config;
pub mod controller;
pub mod cursor;
pub mod log;
pub mod state;
pub mod timer;

pub use applier::{BackwardStrategy, Direction, NullApplier, VisualApplier};
pub use clock::{DeterministicClock, MonotonicClock, PlaybackClock};
pub use config::{ConfigError, ManualStepPolicy, PlaybackConfig};
pub use controller::PlaybackController;
pub use cursor::{CursorMove, PlaybackCursor};
pub use log::{LogEntry, StepLog};
pub use state::{ControlOutcome, NoOpReason, PlaybackState, Progress};
pub use timer::{IntervalTimer, TimerToken, duration_ms};
