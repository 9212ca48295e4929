#![forbid(unsafe_code)]

//! Playback controller: the state machine that owns the sequence, the
//! cursor, and the single interval timer.
//!
//! # Driving the timer
//!
//! The controller never spawns threads or sleeps. A host drives it in one of
//! two ways:
//!
//! - **Polling**: call [`PlaybackController::poll`] from a frame loop; the
//!   controller reads its [`PlaybackClock`] and advances at most one step.
//! - **Callbacks**: after `play`, read [`IntervalTimer::token`] from
//!   [`PlaybackController::timer`], hand it to the host's repeating timer,
//!   and pass it back through [`PlaybackController::on_tick`]. Tokens from a
//!   cancelled arming are refused.
//!
//! # Invariants
//!
//! 1. At most one timer arming is live; `Playing` iff the timer is armed.
//! 2. Every path that leaves `Playing` cancels the timer before touching the
//!    cursor.
//! 3. A rejected `start`/`load` leaves the previous run, state, and timer
//!    exactly as they were.
//! 4. `Finished` is entered only when every record has been applied, and
//!    [`VisualApplier::on_finished`] fires once per entry.
//!
//! # Failure Modes
//!
//! - **Invalid input**: `start`/`load` return the producer's
//!   [`ValidationError`]; the message is kept in [`last_error`] and the
//!   status line until the next successful load.
//! - **Boundary requests** (step past either end, pause while paused, tick
//!   after cancel): [`ControlOutcome::NoOp`] with the reason.
//!
//! [`last_error`]: PlaybackController::last_error

use std::time::Duration;

use stepplay_core::{StepProducer, StepRecord, ValidationError};
use tracing::{info, info_span};

use crate::applier::VisualApplier;
use crate::clock::{MonotonicClock, PlaybackClock};
use crate::config::{ManualStepPolicy, PlaybackConfig};
use crate::cursor::{CursorMove, PlaybackCursor};
use crate::log::StepLog;
use crate::state::{ControlOutcome, NoOpReason, PlaybackState, Progress};
use crate::timer::{IntervalTimer, TimerToken, duration_ms};

/// Plays sequences from one producer into one applier.
pub struct PlaybackController<P, A, C = MonotonicClock>
where
    P: StepProducer,
    A: VisualApplier,
    C: PlaybackClock,
{
    producer: P,
    applier: A,
    clock: C,
    config: PlaybackConfig,
    cursor: Option<PlaybackCursor>,
    state: PlaybackState,
    timer: IntervalTimer,
    speed: Duration,
    log: StepLog,
    last_error: Option<ValidationError>,
}

impl<P, A, C> std::fmt::Debug for PlaybackController<P, A, C>
where
    P: StepProducer,
    A: VisualApplier,
    C: PlaybackClock,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("producer", &self.producer.name())
            .field("state", &self.state)
            .field("progress", &self.progress())
            .field("speed", &self.speed)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

impl<P, A, C> PlaybackController<P, A, C>
where
    P: StepProducer,
    A: VisualApplier,
    C: PlaybackClock,
{
    /// Create a controller with the default configuration.
    pub fn new(producer: P, applier: A, clock: C) -> Self {
        Self::with_config(producer, applier, clock, PlaybackConfig::default())
    }

    /// Create a controller with an explicit configuration.
    pub fn with_config(producer: P, applier: A, clock: C, config: PlaybackConfig) -> Self {
        let speed = config.clamp_speed(config.speed_ms);
        let log = StepLog::new(config.log_capacity);
        Self {
            producer,
            applier,
            clock,
            config,
            cursor: None,
            state: PlaybackState::Idle,
            timer: IntervalTimer::new(),
            speed,
            log,
            last_error: None,
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Produce a fresh sequence and park it at position 0 without playing.
    ///
    /// On success any previous run is discarded and the state is `Idle`.
    pub fn load(&mut self, input: &P::Input) -> Result<Progress, ValidationError> {
        let sequence = match self.producer.produce(input, &self.config.limits) {
            Ok(sequence) => sequence,
            Err(err) => {
                info!(
                    playback_event = "rejected",
                    producer = self.producer.name(),
                    message = %err,
                );
                self.log.record_rejection(err.to_string());
                self.last_error = Some(err.clone());
                return Err(err);
            }
        };

        self.timer.cancel();
        if self.cursor.take().is_some() {
            self.applier.clear();
        }
        let cursor = PlaybackCursor::new(sequence, &mut self.applier);
        info!(
            playback_event = "load",
            producer = self.producer.name(),
            len = cursor.len(),
            strategy = ?cursor.strategy(),
        );
        self.cursor = Some(cursor);
        self.last_error = None;
        self.set_state(PlaybackState::Idle);
        Ok(self.progress())
    }

    /// Validate `input`, load its sequence, and begin playing.
    pub fn start(&mut self, input: &P::Input) -> Result<ControlOutcome, ValidationError> {
        let _span = info_span!("playback.start", producer = self.producer.name()).entered();
        self.load(input)?;
        Ok(self.play())
    }

    /// Redraw the initial visual, discard the sequence, cancel the timer, and
    /// return to `Idle`.
    ///
    /// The applier keeps showing the pre-algorithm picture of the dropped
    /// run; it is only cleared when a later load replaces it.
    pub fn reset(&mut self) -> ControlOutcome {
        let had_timer = self.timer.cancel();
        let from = self.state;
        let Some(mut cursor) = self.cursor.take() else {
            return if from == PlaybackState::Idle {
                ControlOutcome::NoOp(NoOpReason::NoSequence)
            } else {
                self.set_state(PlaybackState::Idle);
                ControlOutcome::Transition {
                    from,
                    to: PlaybackState::Idle,
                }
            };
        };
        let from_pos = cursor.position();
        cursor.reset(&mut self.applier);
        self.log.record_navigation("reset", from_pos, 0);
        info!(playback_event = "reset", pos = from_pos, had_timer);
        self.set_state(PlaybackState::Idle);
        ControlOutcome::Transition {
            from,
            to: PlaybackState::Idle,
        }
    }

    /// Return to position 0 of the current sequence, keeping it loaded.
    pub fn rewind(&mut self) -> ControlOutcome {
        self.timer.cancel();
        let Some(cursor) = self.cursor.as_mut() else {
            return ControlOutcome::NoOp(NoOpReason::NoSequence);
        };
        let from_pos = cursor.position();
        cursor.reset(&mut self.applier);
        self.log.record_navigation("rewind", from_pos, 0);
        let from = self.state;
        self.set_state(PlaybackState::Idle);
        if from_pos == 0 && from == PlaybackState::Idle {
            ControlOutcome::NoOp(NoOpReason::AtStart)
        } else {
            ControlOutcome::Moved {
                from: from_pos,
                to: 0,
                state: PlaybackState::Idle,
            }
        }
    }

    // ------------------------------------------------------------------
    // Play / pause
    // ------------------------------------------------------------------

    /// Arm the timer at the current speed.
    pub fn play(&mut self) -> ControlOutcome {
        if self.cursor.is_none() {
            return ControlOutcome::NoOp(NoOpReason::NoSequence);
        }
        match self.state {
            PlaybackState::Playing => ControlOutcome::NoOp(NoOpReason::AlreadyPlaying),
            PlaybackState::Finished => ControlOutcome::NoOp(NoOpReason::AtEnd),
            PlaybackState::Idle | PlaybackState::Paused => {
                let token = self.timer.arm(self.clock.now(), self.speed);
                let from = self.set_state(PlaybackState::Playing);
                info!(
                    playback_event = "play",
                    interval_ms = duration_ms(self.speed),
                    generation = token.generation(),
                    pos = self.position(),
                );
                ControlOutcome::Transition {
                    from,
                    to: PlaybackState::Playing,
                }
            }
        }
    }

    /// Alias of [`play`](Self::play) for a paused run.
    pub fn resume(&mut self) -> ControlOutcome {
        self.play()
    }

    /// Cancel the timer, keeping the position.
    pub fn pause(&mut self) -> ControlOutcome {
        if self.state != PlaybackState::Playing {
            return ControlOutcome::NoOp(NoOpReason::NotPlaying);
        }
        self.timer.cancel();
        let from = self.set_state(PlaybackState::Paused);
        ControlOutcome::Transition {
            from,
            to: PlaybackState::Paused,
        }
    }

    /// Play/Pause button.
    pub fn toggle(&mut self) -> ControlOutcome {
        if self.state == PlaybackState::Playing {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Change the tick interval, clamped to the configured range.
    ///
    /// While playing the timer is re-armed from now, so the next tick lands
    /// one new interval later. Returns the effective interval.
    pub fn set_speed(&mut self, ms: u64) -> Duration {
        let speed = self.config.clamp_speed(ms);
        self.speed = speed;
        if self.state == PlaybackState::Playing {
            let token = self.timer.arm(self.clock.now(), speed);
            tracing::debug!(
                playback_event = "speed_rearm",
                interval_ms = duration_ms(speed),
                generation = token.generation(),
            );
        }
        speed
    }

    // ------------------------------------------------------------------
    // Manual navigation
    // ------------------------------------------------------------------

    /// Apply the next record.
    pub fn step_forward(&mut self) -> ControlOutcome {
        if let Some(refused) = self.prepare_manual() {
            return refused;
        }
        self.advance()
    }

    /// Undo the last applied record.
    pub fn step_backward(&mut self) -> ControlOutcome {
        if let Some(refused) = self.prepare_manual() {
            return refused;
        }
        let Some(cursor) = self.cursor.as_mut() else {
            return ControlOutcome::NoOp(NoOpReason::NoSequence);
        };
        match cursor.step_backward(&mut self.applier) {
            CursorMove::Moved { from, to } => {
                self.log.record_navigation("step_back", from, to);
                let state = self.settle_after_navigation();
                ControlOutcome::Moved { from, to, state }
            }
            _ => ControlOutcome::NoOp(NoOpReason::AtStart),
        }
    }

    /// Jump to `target` (clamped to the sequence length).
    pub fn seek(&mut self, target: usize) -> ControlOutcome {
        if let Some(refused) = self.prepare_manual() {
            return refused;
        }
        let Some(cursor) = self.cursor.as_mut() else {
            return ControlOutcome::NoOp(NoOpReason::NoSequence);
        };
        match cursor.seek(target, &mut self.applier) {
            CursorMove::Moved { from, to } => {
                self.log.record_navigation("seek", from, to);
                let state = self.settle_after_navigation();
                ControlOutcome::Moved { from, to, state }
            }
            _ => ControlOutcome::NoOp(NoOpReason::Unchanged),
        }
    }

    // ------------------------------------------------------------------
    // Timer delivery
    // ------------------------------------------------------------------

    /// Advance one step if the timer is due on the controller's clock.
    pub fn poll(&mut self) -> ControlOutcome {
        if self.state != PlaybackState::Playing {
            return ControlOutcome::NoOp(NoOpReason::NotPlaying);
        }
        let now = self.clock.now();
        match self.timer.poll(now) {
            Some(_) => self.advance(),
            None => ControlOutcome::NoOp(NoOpReason::NotDue),
        }
    }

    /// Host-delivered tick carrying the token it was armed with.
    pub fn on_tick(&mut self, token: TimerToken) -> ControlOutcome {
        if !self.timer.accept(token) {
            return ControlOutcome::NoOp(NoOpReason::StaleTick);
        }
        if self.state != PlaybackState::Playing {
            return ControlOutcome::NoOp(NoOpReason::NotPlaying);
        }
        self.advance()
    }

    // ------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Records applied so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor.as_ref().map_or(0, PlaybackCursor::position)
    }

    /// `pos / len` for the status bar.
    #[must_use]
    pub fn progress(&self) -> Progress {
        match &self.cursor {
            Some(cursor) => Progress {
                pos: cursor.position(),
                len: cursor.len(),
            },
            None => Progress {
                pos: 0,
                len: Some(0),
            },
        }
    }

    /// Current tick interval.
    #[must_use]
    pub fn speed(&self) -> Duration {
        self.speed
    }

    /// Most recently applied record.
    #[must_use]
    pub fn last_step(&self) -> Option<&StepRecord> {
        self.cursor.as_ref().and_then(PlaybackCursor::last_applied)
    }

    /// Whether a sequence is loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cursor.is_some()
    }

    /// `"<state> · step pos / len · <note>"`.
    ///
    /// The note is the last validation message if the most recent load was
    /// rejected, else the note of the last applied record.
    #[must_use]
    pub fn status_line(&self) -> String {
        let head = format!("{} · step {}", self.state, self.progress());
        let note = match &self.last_error {
            Some(err) => Some(err.to_string()),
            None => self
                .last_step()
                .map(|r| r.note().to_owned())
                .filter(|n| !n.is_empty()),
        };
        match note {
            Some(note) => format!("{head} · {note}"),
            None => head,
        }
    }

    #[must_use]
    pub fn log(&self) -> &StepLog {
        &self.log
    }

    #[must_use]
    pub fn applier(&self) -> &A {
        &self.applier
    }

    pub fn applier_mut(&mut self) -> &mut A {
        &mut self.applier
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mutable clock access (advance a [`DeterministicClock`]).
    ///
    /// [`DeterministicClock`]: crate::DeterministicClock
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    #[must_use]
    pub fn timer(&self) -> &IntervalTimer {
        &self.timer
    }

    #[must_use]
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    #[must_use]
    pub fn producer(&self) -> &P {
        &self.producer
    }

    /// Message of the last rejected load, cleared by the next successful one.
    #[must_use]
    pub fn last_error(&self) -> Option<&ValidationError> {
        self.last_error.as_ref()
    }

    /// Tear down, returning the applier.
    pub fn into_applier(self) -> A {
        self.applier
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn set_state(&mut self, to: PlaybackState) -> PlaybackState {
        let from = self.state;
        if from != to {
            self.state = to;
            info!(
                playback_event = "transition",
                from = from.label(),
                to = to.label(),
                pos = self.position(),
            );
            self.log.record_transition(from, to, self.position());
        }
        from
    }

    /// Apply the manual-step policy. `Some` means the request is refused.
    fn prepare_manual(&mut self) -> Option<ControlOutcome> {
        if self.cursor.is_none() {
            return Some(ControlOutcome::NoOp(NoOpReason::NoSequence));
        }
        if self.state == PlaybackState::Playing {
            match self.config.manual_step {
                ManualStepPolicy::Ignore => {
                    return Some(ControlOutcome::NoOp(NoOpReason::IgnoredWhilePlaying));
                }
                ManualStepPolicy::PauseFirst => {
                    self.pause();
                }
            }
        }
        None
    }

    /// Forward step shared by manual stepping and ticks.
    fn advance(&mut self) -> ControlOutcome {
        let Some(cursor) = self.cursor.as_mut() else {
            return ControlOutcome::NoOp(NoOpReason::NoSequence);
        };
        match cursor.step_forward(&mut self.applier) {
            CursorMove::Moved { from, to } => {
                if let Some(step) = cursor.last_applied() {
                    self.log.record_step(to, step.kind(), step.note());
                }
                let state = if cursor.is_at_end() {
                    self.finish();
                    PlaybackState::Finished
                } else {
                    if self.state != PlaybackState::Playing {
                        self.set_state(PlaybackState::Paused);
                    }
                    self.state
                };
                ControlOutcome::Moved { from, to, state }
            }
            _ => {
                if self.state == PlaybackState::Playing {
                    // Lazy source ended exactly at the cursor.
                    self.finish();
                    ControlOutcome::Transition {
                        from: PlaybackState::Playing,
                        to: PlaybackState::Finished,
                    }
                } else {
                    ControlOutcome::NoOp(NoOpReason::AtEnd)
                }
            }
        }
    }

    /// State after a backward step or seek: `Finished` at the end, else `Paused`.
    fn settle_after_navigation(&mut self) -> PlaybackState {
        let at_end = self.cursor.as_mut().is_some_and(PlaybackCursor::is_at_end);
        if at_end {
            self.finish();
        } else {
            self.set_state(PlaybackState::Paused);
        }
        self.state
    }

    fn finish(&mut self) {
        self.timer.cancel();
        if self.state == PlaybackState::Finished {
            return;
        }
        self.set_state(PlaybackState::Finished);
        let Some(cursor) = self.cursor.as_ref() else {
            return;
        };
        info!(
            playback_event = "finished",
            pos = cursor.position(),
            len = cursor.len(),
        );
        if let Some(terminal) = cursor.last_applied() {
            self.applier.on_finished(terminal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applier::{Direction, NullApplier};
    use crate::clock::DeterministicClock;
    use stepplay_core::{Limits, Payload, StepKind, StepRecorder, StepSequence};

    /// Produces `n` highlight steps; negative `n` is invalid.
    struct Count;

    impl StepProducer for Count {
        type Input = i64;

        fn name(&self) -> &'static str {
            "count"
        }

        fn produce(&self, n: &i64, _limits: &Limits) -> Result<StepSequence, ValidationError> {
            let n = usize::try_from(*n).map_err(|_| ValidationError::InvalidArray)?;
            let mut r = StepRecorder::start(Payload::None, "begin");
            for index in 0..n {
                r.push(
                    StepKind::Highlight,
                    Payload::Index { index },
                    format!("highlight {index}"),
                );
            }
            Ok(r.done(Payload::None, "done"))
        }
    }

    #[derive(Default)]
    struct Tally {
        applied: Vec<usize>,
        finished: usize,
        clears: usize,
        resets: usize,
    }

    impl VisualApplier for Tally {
        fn reset(&mut self, _start: &StepRecord) {
            self.applied.clear();
            self.resets += 1;
        }

        fn clear(&mut self) {
            self.applied.clear();
            self.clears += 1;
        }

        fn apply(&mut self, step: &StepRecord, _direction: Direction) {
            if let Payload::Index { index } = step.payload() {
                self.applied.push(*index);
            }
        }

        fn on_finished(&mut self, _terminal: &StepRecord) {
            self.finished += 1;
        }
    }

    fn controller() -> PlaybackController<Count, Tally, DeterministicClock> {
        let config = PlaybackConfig::default().with_speed_ms(100);
        PlaybackController::with_config(Count, Tally::default(), DeterministicClock::new(), config)
    }

    #[test]
    fn start_arms_and_ticks_advance() {
        let mut c = controller();
        let out = c.start(&2).unwrap();
        assert_eq!(
            out,
            ControlOutcome::Transition {
                from: PlaybackState::Idle,
                to: PlaybackState::Playing
            }
        );
        assert_eq!(c.poll(), ControlOutcome::NoOp(NoOpReason::NotDue));
        c.clock_mut().advance_ms(100);
        assert!(matches!(c.poll(), ControlOutcome::Moved { from: 0, to: 1, .. }));
        assert_eq!(c.progress().to_string(), "1 / 4");
    }

    #[test]
    fn plays_to_finished_and_fires_hook_once() {
        let mut c = controller();
        c.start(&2).unwrap();
        for _ in 0..10 {
            c.clock_mut().advance_ms(100);
            c.poll();
        }
        assert_eq!(c.state(), PlaybackState::Finished);
        assert_eq!(c.position(), 4);
        assert!(!c.timer().is_armed());
        assert_eq!(c.applier().finished, 1);
        assert_eq!(c.applier().applied, vec![0, 1]);
    }

    #[test]
    fn rejected_start_keeps_previous_run() {
        let mut c = controller();
        c.start(&3).unwrap();
        c.clock_mut().advance_ms(100);
        c.poll();
        let token = c.timer().token();
        let err = c.start(&-1).unwrap_err();
        assert_eq!(err, ValidationError::InvalidArray);
        assert_eq!(c.state(), PlaybackState::Playing);
        assert_eq!(c.position(), 1);
        assert_eq!(c.timer().token(), token);
        assert!(c.status_line().ends_with("Please enter a valid array of numbers."));
    }

    #[test]
    fn rejected_first_start_stays_idle() {
        let mut c = controller();
        assert!(c.start(&-5).is_err());
        assert_eq!(c.state(), PlaybackState::Idle);
        assert_eq!(c.position(), 0);
        assert!(!c.timer().is_armed());
    }

    #[test]
    fn manual_step_pauses_first_by_default() {
        let mut c = controller();
        c.start(&3).unwrap();
        let out = c.step_forward();
        assert_eq!(
            out,
            ControlOutcome::Moved {
                from: 0,
                to: 1,
                state: PlaybackState::Paused
            }
        );
        assert!(!c.timer().is_armed());
    }

    #[test]
    fn manual_step_ignored_when_configured() {
        let config = PlaybackConfig::default().with_manual_step(ManualStepPolicy::Ignore);
        let mut c = PlaybackController::with_config(
            Count,
            Tally::default(),
            DeterministicClock::new(),
            config,
        );
        c.start(&3).unwrap();
        assert_eq!(
            c.step_forward(),
            ControlOutcome::NoOp(NoOpReason::IgnoredWhilePlaying)
        );
        assert_eq!(c.state(), PlaybackState::Playing);
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn stepping_back_from_finished_pauses() {
        let mut c = controller();
        c.load(&1).unwrap();
        for _ in 0..3 {
            c.step_forward();
        }
        assert_eq!(c.state(), PlaybackState::Finished);
        assert_eq!(c.step_forward(), ControlOutcome::NoOp(NoOpReason::AtEnd));
        assert!(matches!(
            c.step_backward(),
            ControlOutcome::Moved {
                from: 3,
                to: 2,
                state: PlaybackState::Paused
            }
        ));
    }

    #[test]
    fn reset_discards_sequence() {
        let mut c = controller();
        c.start(&2).unwrap();
        assert!(c.reset().changed());
        assert_eq!(c.state(), PlaybackState::Idle);
        assert!(!c.is_loaded());
        assert!(!c.timer().is_armed());
        assert_eq!(c.applier().clears, 0);
        assert_eq!(c.applier().resets, 2);
        assert!(c.applier().applied.is_empty());
        assert_eq!(c.reset(), ControlOutcome::NoOp(NoOpReason::NoSequence));
        assert_eq!(c.step_forward(), ControlOutcome::NoOp(NoOpReason::NoSequence));
    }

    #[test]
    fn rewind_keeps_sequence() {
        let mut c = controller();
        c.load(&2).unwrap();
        c.seek(3);
        assert_eq!(
            c.rewind(),
            ControlOutcome::Moved {
                from: 3,
                to: 0,
                state: PlaybackState::Idle
            }
        );
        assert!(c.is_loaded());
        assert!(c.applier().applied.is_empty());
    }

    #[test]
    fn toggle_alternates() {
        let mut c = controller();
        c.load(&2).unwrap();
        assert_eq!(c.toggle(), ControlOutcome::Transition {
            from: PlaybackState::Idle,
            to: PlaybackState::Playing
        });
        assert_eq!(c.toggle(), ControlOutcome::Transition {
            from: PlaybackState::Playing,
            to: PlaybackState::Paused
        });
        assert_eq!(c.pause(), ControlOutcome::NoOp(NoOpReason::NotPlaying));
    }

    #[test]
    fn speed_is_clamped() {
        let mut c = PlaybackController::new(Count, NullApplier, DeterministicClock::new());
        assert_eq!(c.set_speed(0), Duration::from_millis(10));
        assert_eq!(c.set_speed(99_999), Duration::from_millis(5_000));
    }

    #[test]
    fn status_line_shows_last_note() {
        let mut c = controller();
        c.load(&2).unwrap();
        assert_eq!(c.status_line(), "Idle · step 0 / 4");
        c.step_forward();
        c.step_forward();
        assert_eq!(c.status_line(), "Paused · step 2 / 4 · highlight 0");
    }
}
