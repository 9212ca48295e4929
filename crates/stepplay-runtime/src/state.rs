#![forbid(unsafe_code)]

//! Playback states and control outcomes.

use std::fmt;

use serde::Serialize;

/// Playback state machine.
///
/// ```text
///            start/play              pos == len
///   Idle ─────────────────▶ Playing ───────────▶ Finished
///    │                       │   ▲                  │
///    │ step                  │   │ play             │ step back / seek
///    ▼               pause   ▼   │                  ▼
///  Paused ◀──────────────────────┘               Paused
///
///   any ──reset──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// Nothing played yet (a sequence may be loaded at position 0).
    #[default]
    Idle,
    /// Timer-driven auto-advance.
    Playing,
    /// Manual stepping; the timer is not armed.
    Paused,
    /// Every step applied.
    Finished,
}

impl PlaybackState {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Finished => "Finished",
        }
    }

    #[must_use]
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a control request changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOpReason {
    /// Already at position 0.
    AtStart,
    /// Already past the last step.
    AtEnd,
    /// Play requested while playing.
    AlreadyPlaying,
    /// Pause requested while not playing, or a tick arrived outside Playing.
    NotPlaying,
    /// No sequence loaded.
    NoSequence,
    /// Manual step while playing under the `ignore` policy.
    IgnoredWhilePlaying,
    /// Target equals the current value.
    Unchanged,
    /// Poll found no tick due.
    NotDue,
    /// Tick token belongs to a cancelled arming.
    StaleTick,
}

impl NoOpReason {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AtStart => "already at the first step",
            Self::AtEnd => "no more steps",
            Self::AlreadyPlaying => "already playing",
            Self::NotPlaying => "not playing",
            Self::NoSequence => "nothing loaded",
            Self::IgnoredWhilePlaying => "ignored while playing",
            Self::Unchanged => "unchanged",
            Self::NotDue => "no tick due",
            Self::StaleTick => "stale tick",
        }
    }
}

/// Result of a control request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOutcome {
    /// The cursor moved; `state` is the state afterwards.
    Moved {
        from: usize,
        to: usize,
        state: PlaybackState,
    },
    /// State changed without moving the cursor.
    Transition {
        from: PlaybackState,
        to: PlaybackState,
    },
    /// Nothing changed.
    NoOp(NoOpReason),
}

impl ControlOutcome {
    /// True for anything but [`ControlOutcome::NoOp`].
    #[must_use]
    pub const fn changed(self) -> bool {
        !matches!(self, Self::NoOp(_))
    }
}

/// Cursor position and sequence length, rendered as `"pos / len"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Progress {
    pub pos: usize,
    /// `None` while a lazy sequence is still producing.
    pub len: Option<usize>,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.len {
            Some(len) => write!(f, "{} / {}", self.pos, len),
            None => write!(f, "{} / ?", self.pos),
        }
    }
}
