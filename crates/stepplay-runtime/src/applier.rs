#![forbid(unsafe_code)]

//! The boundary between playback and drawing.
//!
//! A [`VisualApplier`] owns whatever represents the algorithm on screen (DOM
//! nodes, SVG, a terminal buffer, an in-memory model). The runtime decides
//! *which* steps are applied and in what order; the applier decides what
//! that looks like.

use stepplay_core::StepRecord;

/// Direction in which a step is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Apply the step's effect.
    Forward,
    /// Undo the step's effect (only used with [`BackwardStrategy::Inverse`]).
    Backward,
}

/// How backward movement is realized.
///
/// A cursor reads the strategy once, from its applier, and uses it for every
/// backward move for the lifetime of its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackwardStrategy {
    /// Reset the visual, then replay the new prefix forward.
    #[default]
    Recompute,
    /// Call `apply(step, Backward)` for each undone step, newest first.
    Inverse,
}

/// Renders the effect of steps.
///
/// # Contract
///
/// - `apply` is synchronous and complete when it returns.
/// - During forward playback `apply(step, Forward)` is called exactly once
///   per step, in increasing index order.
/// - After `reset(start)` followed by `apply(r, Forward)` for each record of
///   a prefix, the visual must depend only on that prefix.
pub trait VisualApplier {
    /// Restore the pre-algorithm visual for a sequence whose start marker is
    /// `start`.
    fn reset(&mut self, start: &StepRecord);

    /// Remove everything (the sequence has been discarded).
    fn clear(&mut self);

    /// Apply one step.
    fn apply(&mut self, step: &StepRecord, direction: Direction);

    /// Backward strategy this applier supports.
    fn backward_strategy(&self) -> BackwardStrategy {
        BackwardStrategy::Recompute
    }

    /// Called once each time playback enters `Finished`.
    fn on_finished(&mut self, _terminal: &StepRecord) {}
}

impl<A: VisualApplier + ?Sized> VisualApplier for &mut A {
    fn reset(&mut self, start: &StepRecord) {
        (**self).reset(start);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn apply(&mut self, step: &StepRecord, direction: Direction) {
        (**self).apply(step, direction);
    }

    fn backward_strategy(&self) -> BackwardStrategy {
        (**self).backward_strategy()
    }

    fn on_finished(&mut self, terminal: &StepRecord) {
        (**self).on_finished(terminal);
    }
}

impl<A: VisualApplier + ?Sized> VisualApplier for Box<A> {
    fn reset(&mut self, start: &StepRecord) {
        (**self).reset(start);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn apply(&mut self, step: &StepRecord, direction: Direction) {
        (**self).apply(step, direction);
    }

    fn backward_strategy(&self) -> BackwardStrategy {
        (**self).backward_strategy()
    }

    fn on_finished(&mut self, terminal: &StepRecord) {
        (**self).on_finished(terminal);
    }
}

/// Applier that draws nothing. Useful for headless step counting.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullApplier;

impl VisualApplier for NullApplier {
    fn reset(&mut self, _start: &StepRecord) {}

    fn clear(&mut self) {}

    fn apply(&mut self, _step: &StepRecord, _direction: Direction) {}
}
