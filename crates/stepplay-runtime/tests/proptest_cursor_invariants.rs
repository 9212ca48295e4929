#![forbid(unsafe_code)]

//! Property-based invariant tests for cursor navigation.
//!
//! ## Invariants
//!
//! 1. Bounds: `0 <= pos <= len` after any operation sequence.
//! 2. Prefix: the visual shows exactly records `[0, pos)` in order.
//! 3. Monotonic replay: N forward steps equal a direct seek to N.
//! 4. Round-trip: forward then backward restores the prior visual.
//! 5. Inverse appliers see a consistent undo order.

use proptest::prelude::*;
use stepplay_algorithms::{ArrayView, BubbleSort, HeapSort, MergeSort};
use stepplay_core::{ArrayForm, Limits, StepProducer, StepSequence};
use stepplay_harness::RecordingApplier;
use stepplay_runtime::{BackwardStrategy, PlaybackCursor};

// ── Strategies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Op {
    Forward,
    Backward,
    Seek(usize),
    Reset,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Forward),
        3 => Just(Op::Backward),
        2 => (0usize..80).prop_map(Op::Seek),
        1 => Just(Op::Reset),
    ]
}

fn arb_values() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-50i64..50, 1..10)
}

fn sequence(which: u8, values: &[i64]) -> StepSequence {
    let form = ArrayForm::from_values(values);
    let limits = Limits::default();
    let seq = match which % 3 {
        0 => BubbleSort.produce(&form, &limits),
        1 => HeapSort.produce(&form, &limits),
        _ => MergeSort.produce(&form, &limits),
    };
    seq.unwrap()
}

fn run(cursor: &mut PlaybackCursor, applier: &mut RecordingApplier, op: Op) {
    match op {
        Op::Forward => {
            cursor.step_forward(applier);
        }
        Op::Backward => {
            cursor.step_backward(applier);
        }
        Op::Seek(target) => {
            cursor.seek(target, applier);
        }
        Op::Reset => cursor.reset(applier),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn visual_is_always_the_applied_prefix(
        which in any::<u8>(),
        values in arb_values(),
        ops in prop::collection::vec(arb_op(), 0..60),
        inverse in any::<bool>(),
    ) {
        let strategy = if inverse { BackwardStrategy::Inverse } else { BackwardStrategy::Recompute };
        let mut applier = RecordingApplier::with_strategy(strategy);
        let mut cursor = PlaybackCursor::new(sequence(which, &values), &mut applier);
        let len = cursor.len().unwrap();
        for op in ops {
            run(&mut cursor, &mut applier, op);
            let pos = cursor.position();
            prop_assert!(pos <= len);
            prop_assert_eq!(applier.visible(), &cursor.sequence().records()[..pos]);
        }
        prop_assert_eq!(applier.violations(), 0);
    }

    #[test]
    fn forward_n_equals_seek_n(which in any::<u8>(), values in arb_values()) {
        let mut stepped = ArrayView::new();
        let mut a = PlaybackCursor::new(sequence(which, &values), &mut stepped);
        let len = a.len().unwrap();
        for _ in 0..len {
            a.step_forward(&mut stepped);
        }

        let mut sought = ArrayView::new();
        let mut b = PlaybackCursor::new(sequence(which, &values), &mut sought);
        b.seek(len, &mut sought);

        prop_assert_eq!(a.position(), b.position());
        prop_assert_eq!(&stepped, &sought);
        prop_assert!(stepped.all_sorted());
    }

    #[test]
    fn forward_then_backward_round_trips(
        which in any::<u8>(),
        values in arb_values(),
        at in 0usize..40,
    ) {
        let mut view = ArrayView::new();
        let mut cursor = PlaybackCursor::new(sequence(which, &values), &mut view);
        let len = cursor.len().unwrap();
        let at = at % len;
        cursor.seek(at, &mut view);
        let before = view.clone();
        cursor.step_forward(&mut view);
        cursor.step_backward(&mut view);
        prop_assert_eq!(cursor.position(), at);
        prop_assert_eq!(&view, &before);
    }

    #[test]
    fn end_is_idempotent(which in any::<u8>(), values in arb_values(), extra in 1usize..5) {
        let mut view = ArrayView::new();
        let mut cursor = PlaybackCursor::new(sequence(which, &values), &mut view);
        let len = cursor.len().unwrap();
        cursor.seek(len, &mut view);
        let terminal = view.clone();
        for _ in 0..extra {
            cursor.step_forward(&mut view);
        }
        prop_assert_eq!(cursor.position(), len);
        prop_assert_eq!(&view, &terminal);
    }
}
