#![forbid(unsafe_code)]

//! Single-timer guarantees under a deterministic clock.
//!
//! 1. Double play never stacks timers: exactly one tick per interval.
//! 2. A tick delivered after pause/reset/re-arm is refused.
//! 3. Speed changes take effect on the next tick, measured from the change.
//! 4. A stalled host gets one step, not a burst.
//!
//! Run:
//!   cargo test -p stepplay-runtime --test timer_exclusivity

use stepplay_algorithms::{ArrayView, BubbleSort};
use stepplay_core::ArrayForm;
use stepplay_harness::PlaybackFixture;
use stepplay_runtime::{ControlOutcome, NoOpReason, PlaybackConfig, PlaybackState};

const INPUT: &str = "9 8 7 6 5 4 3 2 1";

fn fixture(speed_ms: u64) -> PlaybackFixture<BubbleSort, ArrayView> {
    let config = PlaybackConfig::default().with_speed_ms(speed_ms);
    PlaybackFixture::with_config(BubbleSort, ArrayView::new(), config)
}

/// Advance 1ms at a time for `ms` ms, counting steps applied.
fn steps_over(fx: &mut PlaybackFixture<BubbleSort, ArrayView>, ms: u64) -> usize {
    (0..ms)
        .filter(|_| matches!(fx.advance(1), ControlOutcome::Moved { .. }))
        .count()
}

#[test]
fn double_play_keeps_one_timer() {
    let mut fx = fixture(100);
    fx.controller_mut().start(&ArrayForm::new(INPUT)).unwrap();
    let token = fx.controller().timer().token();
    assert_eq!(
        fx.controller_mut().play(),
        ControlOutcome::NoOp(NoOpReason::AlreadyPlaying)
    );
    assert_eq!(fx.controller().timer().token(), token);
    assert_eq!(steps_over(&mut fx, 1_000), 10);
}

#[test]
fn late_tick_after_pause_is_refused() {
    let mut fx = fixture(100);
    fx.controller_mut().start(&ArrayForm::new(INPUT)).unwrap();
    let token = fx.controller().timer().token().unwrap();
    fx.controller_mut().clock_mut().advance_ms(100);
    assert!(matches!(
        fx.controller_mut().on_tick(token),
        ControlOutcome::Moved { to: 1, .. }
    ));
    fx.controller_mut().pause();
    assert_eq!(
        fx.controller_mut().on_tick(token),
        ControlOutcome::NoOp(NoOpReason::StaleTick)
    );
    assert_eq!(fx.controller().position(), 1);
    assert_eq!(fx.controller().timer().stale_rejected(), 1);

    // Resuming issues a fresh token; the old one stays dead.
    fx.controller_mut().resume();
    let fresh = fx.controller().timer().token().unwrap();
    assert_ne!(fresh, token);
    assert_eq!(
        fx.controller_mut().on_tick(token),
        ControlOutcome::NoOp(NoOpReason::StaleTick)
    );
    assert!(fx.controller_mut().on_tick(fresh).changed());
}

#[test]
fn late_tick_after_reset_is_refused() {
    let mut fx = fixture(100);
    fx.controller_mut().start(&ArrayForm::new(INPUT)).unwrap();
    let token = fx.controller().timer().token().unwrap();
    fx.controller_mut().reset();
    assert_eq!(
        fx.controller_mut().on_tick(token),
        ControlOutcome::NoOp(NoOpReason::StaleTick)
    );
    assert_eq!(fx.controller().state(), PlaybackState::Idle);
}

#[test]
fn speed_change_fires_at_new_interval() {
    let mut fx = fixture(500);
    fx.controller_mut().start(&ArrayForm::new(INPUT)).unwrap();
    assert_eq!(steps_over(&mut fx, 300), 0);
    fx.controller_mut().set_speed(100);
    // Next tick is 100ms after the change, not at 500 or 600.
    assert_eq!(steps_over(&mut fx, 99), 0);
    assert_eq!(steps_over(&mut fx, 1), 1);
    assert_eq!(steps_over(&mut fx, 300), 3);
}

#[test]
fn speed_change_while_paused_applies_on_resume() {
    let mut fx = fixture(500);
    fx.controller_mut().start(&ArrayForm::new(INPUT)).unwrap();
    fx.controller_mut().pause();
    fx.controller_mut().set_speed(50);
    assert!(!fx.controller().timer().is_armed());
    fx.controller_mut().resume();
    assert_eq!(
        fx.controller().timer().interval(),
        Some(std::time::Duration::from_millis(50))
    );
    assert_eq!(steps_over(&mut fx, 100), 2);
}

#[test]
fn stalled_host_gets_one_step() {
    let mut fx = fixture(100);
    fx.controller_mut().start(&ArrayForm::new(INPUT)).unwrap();
    assert!(matches!(fx.advance(1_000), ControlOutcome::Moved { to: 1, .. }));
    assert_eq!(
        fx.controller_mut().poll(),
        ControlOutcome::NoOp(NoOpReason::NotDue)
    );
    assert_eq!(fx.controller().timer().missed_coalesced(), 9);
    assert_eq!(steps_over(&mut fx, 100), 1);
}

#[test]
fn manual_step_while_playing_cancels_timer_first() {
    let mut fx = fixture(100);
    fx.controller_mut().start(&ArrayForm::new(INPUT)).unwrap();
    let token = fx.controller().timer().token().unwrap();
    fx.controller_mut().step_forward();
    assert_eq!(fx.controller().state(), PlaybackState::Paused);
    assert_eq!(steps_over(&mut fx, 500), 0);
    assert_eq!(
        fx.controller_mut().on_tick(token),
        ControlOutcome::NoOp(NoOpReason::StaleTick)
    );
}
