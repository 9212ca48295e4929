#![forbid(unsafe_code)]

//! Playback cursor: which prefix of a sequence is on screen.
//!
//! # Invariants
//!
//! 1. `0 <= pos <= len` at all times.
//! 2. After every public call, the applier shows exactly the effect of
//!    records `[0, pos)` applied in order, and nothing beyond.
//! 3. The backward strategy never changes for the lifetime of a cursor.
//!
//! # Failure Modes
//!
//! - **Step past either end**: reported as [`CursorMove::AtEnd`] /
//!   [`CursorMove::AtStart`]; position and visual are untouched.
//! - **Seek past the end**: clamps to the last position.

use stepplay_core::{StepRecord, StepSequence};

use crate::applier::{BackwardStrategy, Direction, VisualApplier};

/// Result of a cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    /// The cursor moved.
    Moved { from: usize, to: usize },
    /// Already at position 0.
    AtStart,
    /// Already at the end of the sequence.
    AtEnd,
    /// Seek target equals the current position.
    Unchanged,
}

/// Position within one [`StepSequence`].
#[derive(Debug)]
pub struct PlaybackCursor {
    sequence: StepSequence,
    pos: usize,
    strategy: BackwardStrategy,
}

impl PlaybackCursor {
    /// Take ownership of `sequence` and render its initial visual.
    pub fn new<A: VisualApplier + ?Sized>(mut sequence: StepSequence, applier: &mut A) -> Self {
        sequence.fetch(1);
        let strategy = applier.backward_strategy();
        if let Some(start) = sequence.peek(0) {
            applier.reset(start);
        }
        Self {
            sequence,
            pos: 0,
            strategy,
        }
    }

    /// Number of records applied.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length once known.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        self.sequence.len()
    }

    /// Records produced so far.
    #[must_use]
    pub fn known_len(&self) -> usize {
        self.sequence.known_len()
    }

    /// Backward strategy in use.
    #[must_use]
    pub fn strategy(&self) -> BackwardStrategy {
        self.strategy
    }

    /// The underlying sequence.
    #[must_use]
    pub fn sequence(&self) -> &StepSequence {
        &self.sequence
    }

    /// Last applied record, if any.
    #[must_use]
    pub fn last_applied(&self) -> Option<&StepRecord> {
        self.pos.checked_sub(1).and_then(|i| self.sequence.peek(i))
    }

    /// Whether every record has been applied.
    ///
    /// Pulls one record from a lazy source if that is the only way to know.
    pub fn is_at_end(&mut self) -> bool {
        self.sequence.fetch(self.pos + 1) <= self.pos
    }

    /// Apply record `pos` and advance.
    pub fn step_forward<A: VisualApplier + ?Sized>(&mut self, applier: &mut A) -> CursorMove {
        let from = self.pos;
        let Some(step) = self.sequence.get(from) else {
            return CursorMove::AtEnd;
        };
        applier.apply(step, Direction::Forward);
        self.pos += 1;
        tracing::debug!(
            playback_event = "apply",
            pos = self.pos,
            kind = %step.kind(),
        );
        CursorMove::Moved { from, to: self.pos }
    }

    /// Retreat by one record.
    pub fn step_backward<A: VisualApplier + ?Sized>(&mut self, applier: &mut A) -> CursorMove {
        if self.pos == 0 {
            return CursorMove::AtStart;
        }
        let from = self.pos;
        self.rewind_to(from - 1, applier);
        CursorMove::Moved { from, to: self.pos }
    }

    /// Jump to `target`, clamped to the sequence length.
    pub fn seek<A: VisualApplier + ?Sized>(&mut self, target: usize, applier: &mut A) -> CursorMove {
        let available = self.sequence.fetch(target);
        let target = target.min(available);
        let from = self.pos;
        if target == from {
            return CursorMove::Unchanged;
        }
        if target < from {
            self.rewind_to(target, applier);
        } else {
            for step in &self.sequence.records()[from..target] {
                applier.apply(step, Direction::Forward);
            }
            self.pos = target;
        }
        tracing::debug!(playback_event = "seek", from, to = target);
        CursorMove::Moved { from, to: target }
    }

    /// Return to position 0 and redraw the initial visual.
    pub fn reset<A: VisualApplier + ?Sized>(&mut self, applier: &mut A) {
        if let Some(start) = self.sequence.peek(0) {
            applier.reset(start);
        }
        self.pos = 0;
    }

    fn rewind_to<A: VisualApplier + ?Sized>(&mut self, target: usize, applier: &mut A) {
        let records = self.sequence.records();
        match self.strategy {
            BackwardStrategy::Recompute => {
                if let Some(start) = records.first() {
                    applier.reset(start);
                }
                for step in &records[..target] {
                    applier.apply(step, Direction::Forward);
                }
            }
            BackwardStrategy::Inverse => {
                for step in records[target..self.pos].iter().rev() {
                    applier.apply(step, Direction::Backward);
                }
            }
        }
        self.pos = target;
    }
}
