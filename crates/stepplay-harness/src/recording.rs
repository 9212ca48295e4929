#![forbid(unsafe_code)]

//! Visual applier that records every call.

use stepplay_core::{StepKind, StepRecord};
use stepplay_runtime::{BackwardStrategy, Direction, VisualApplier};

/// One call received by a [`RecordingApplier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplierCall {
    Reset,
    Clear,
    Apply {
        kind: StepKind,
        note: String,
        direction: Direction,
    },
    Finished {
        kind: StepKind,
    },
}

/// Records calls and keeps the visible prefix they imply.
///
/// `visible()` is what a correct applier would be showing: `reset` empties
/// it, forward applies append, backward applies pop (and must pop the record
/// that was last appended). A mismatch is counted in `violations()`.
#[derive(Debug, Clone, Default)]
pub struct RecordingApplier {
    strategy: BackwardStrategy,
    calls: Vec<ApplierCall>,
    visible: Vec<StepRecord>,
    violations: usize,
}

impl RecordingApplier {
    /// Recompute-strategy recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder that declares `strategy`.
    #[must_use]
    pub fn with_strategy(strategy: BackwardStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn calls(&self) -> &[ApplierCall] {
        &self.calls
    }

    /// Records currently shown, in application order.
    #[must_use]
    pub fn visible(&self) -> &[StepRecord] {
        &self.visible
    }

    /// Backward applies that did not undo the most recent record.
    #[must_use]
    pub fn violations(&self) -> usize {
        self.violations
    }

    /// Number of `apply` calls in `direction`.
    #[must_use]
    pub fn apply_count(&self, direction: Direction) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ApplierCall::Apply { direction: d, .. } if *d == direction))
            .count()
    }

    /// Number of `on_finished` calls.
    #[must_use]
    pub fn finished_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ApplierCall::Finished { .. }))
            .count()
    }

    /// Forget recorded calls, keeping the visible prefix.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl VisualApplier for RecordingApplier {
    fn reset(&mut self, _start: &StepRecord) {
        self.calls.push(ApplierCall::Reset);
        self.visible.clear();
    }

    fn clear(&mut self) {
        self.calls.push(ApplierCall::Clear);
        self.visible.clear();
    }

    fn apply(&mut self, step: &StepRecord, direction: Direction) {
        self.calls.push(ApplierCall::Apply {
            kind: step.kind(),
            note: step.note().to_owned(),
            direction,
        });
        match direction {
            Direction::Forward => self.visible.push(step.clone()),
            Direction::Backward => {
                if self.visible.last() == Some(step) {
                    self.visible.pop();
                } else {
                    self.violations += 1;
                    tracing::warn!(
                        playback_event = "inverse_mismatch",
                        kind = %step.kind(),
                        visible = self.visible.len(),
                    );
                }
            }
        }
    }

    fn backward_strategy(&self) -> BackwardStrategy {
        self.strategy
    }

    fn on_finished(&mut self, terminal: &StepRecord) {
        self.calls.push(ApplierCall::Finished {
            kind: terminal.kind(),
        });
    }
}
