#![forbid(unsafe_code)]

//! Deterministic playback fixture.
//!
//! Wraps a [`PlaybackController`] on a [`DeterministicClock`] so tests can
//! advance virtual time tick by tick and collect what happened.

use stepplay_core::StepProducer;
use stepplay_runtime::{
    ControlOutcome, DeterministicClock, PlaybackConfig, PlaybackController, PlaybackState,
    VisualApplier, duration_ms,
};

/// A controller on virtual time.
pub struct PlaybackFixture<P: StepProducer, A: VisualApplier> {
    controller: PlaybackController<P, A, DeterministicClock>,
    ticks: usize,
}

impl<P: StepProducer, A: VisualApplier> PlaybackFixture<P, A> {
    /// Default configuration.
    pub fn new(producer: P, applier: A) -> Self {
        Self::with_config(producer, applier, PlaybackConfig::default())
    }

    pub fn with_config(producer: P, applier: A, config: PlaybackConfig) -> Self {
        Self {
            controller: PlaybackController::with_config(
                producer,
                applier,
                DeterministicClock::new(),
                config,
            ),
            ticks: 0,
        }
    }

    pub fn controller(&self) -> &PlaybackController<P, A, DeterministicClock> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController<P, A, DeterministicClock> {
        &mut self.controller
    }

    /// Steps applied by `advance` and `run_to_end` so far.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Advance virtual time by `ms` and poll once.
    pub fn advance(&mut self, ms: u64) -> ControlOutcome {
        self.controller.clock_mut().advance_ms(ms);
        let outcome = self.controller.poll();
        if matches!(outcome, ControlOutcome::Moved { .. }) {
            self.ticks += 1;
        }
        outcome
    }

    /// Advance one current interval at a time until playback stops or
    /// `max_ticks` intervals have elapsed. Returns the intervals consumed.
    pub fn run_to_end(&mut self, max_ticks: usize) -> usize {
        let mut elapsed = 0;
        while self.controller.state() == PlaybackState::Playing && elapsed < max_ticks {
            let ms = duration_ms(self.controller.speed());
            self.advance(ms);
            elapsed += 1;
        }
        elapsed
    }

    /// Step forward manually until the end, returning the steps taken.
    pub fn step_to_end(&mut self) -> usize {
        let mut steps = 0;
        while let ControlOutcome::Moved { .. } = self.controller.step_forward() {
            steps += 1;
        }
        steps
    }

    pub fn into_controller(self) -> PlaybackController<P, A, DeterministicClock> {
        self.controller
    }
}
