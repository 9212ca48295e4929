#![forbid(unsafe_code)]

//! End-to-end playback scenarios against the reference visual models.
//!
//! Run:
//!   cargo test -p stepplay-algorithms --test scenarios

use stepplay_algorithms::{
    ArrayView, BinarySearch, DepthFirstSearch, GraphView, HeapSort, MinimumSpanningTree,
    NodeMark, RadixSort, SlidingWindow, TopologicalSort, TwoPointers,
};
use stepplay_core::{
    ArrayForm, GraphForm, Limits, Payload, SearchForm, StepKind, StepProducer, WindowForm,
};
use stepplay_harness::{PlaybackFixture, fingerprint, sequence_fingerprint};
use stepplay_runtime::{ControlOutcome, PlaybackConfig, PlaybackState};

#[test]
fn heap_sort_of_eight_finishes_within_n_log_n_ticks() {
    let config = PlaybackConfig::default().with_speed_ms(50);
    let mut fx = PlaybackFixture::with_config(HeapSort, ArrayView::new(), config);
    let out = fx
        .controller_mut()
        .start(&ArrayForm::new("5, 2, 9, 1, 7, 3, 8, 6"))
        .unwrap();
    assert_eq!(
        out,
        ControlOutcome::Transition {
            from: PlaybackState::Idle,
            to: PlaybackState::Playing
        }
    );
    let ticks = fx.run_to_end(24);
    assert!(ticks <= 24, "took {ticks} ticks");
    let c = fx.controller();
    assert_eq!(c.state(), PlaybackState::Finished);
    assert!(c.applier().all_sorted());
    assert_eq!(c.applier().values(), &[1, 2, 3, 5, 6, 7, 8, 9]);
    assert!(c.applier().is_finished());
}

#[test]
fn binary_search_step_through() {
    let mut fx = PlaybackFixture::new(BinarySearch, ArrayView::new());
    fx.controller_mut()
        .start(&SearchForm::new("1,3,5,7,9,11,13", "7"))
        .unwrap();
    fx.controller_mut().step_forward();
    assert_eq!(fx.controller().position(), 1);
    assert_eq!(fx.controller().applier().range(), Some((0, 6)));
    fx.controller_mut().step_forward();
    assert_eq!(fx.controller().applier().highlighted(), &[3]);
    fx.controller_mut().step_forward();
    let c = fx.controller();
    assert_eq!(c.progress().to_string(), "3 / 3");
    assert_eq!(c.state(), PlaybackState::Finished);
    let last = c.last_step().unwrap();
    assert_eq!(last.kind(), StepKind::Found);
    assert_eq!(last.payload(), &Payload::Index { index: 3 });
}

#[test]
fn empty_array_reports_fixed_message() {
    let mut fx = PlaybackFixture::new(HeapSort, ArrayView::new());
    let err = fx.controller_mut().start(&ArrayForm::new("")).unwrap_err();
    assert_eq!(err.to_string(), "Please enter a valid array of numbers.");
    assert_eq!(fx.controller().position(), 0);
    assert_eq!(fx.controller().state(), PlaybackState::Idle);
    assert!(!fx.controller().timer().is_armed());
}

#[test]
fn input_limits_come_from_config() {
    let mut config = PlaybackConfig::default();
    config.limits.max_len = 3;
    let mut fx = PlaybackFixture::with_config(RadixSort, ArrayView::new(), config);
    let err = fx
        .controller_mut()
        .load(&ArrayForm::new("1 2 3 4"))
        .unwrap_err();
    assert_eq!(err.to_string(), "Please enter no more than 3 numbers.");
}

#[test]
fn lazy_dfs_reports_unknown_length_until_exhausted() {
    let mut fx = PlaybackFixture::new(DepthFirstSearch, GraphView::new());
    fx.controller_mut()
        .load(&GraphForm::new("A-B B-C A-D", "A"))
        .unwrap();
    fx.controller_mut().step_forward();
    let line = fx.controller().status_line();
    assert!(line.starts_with("Paused · step 1 / ?"), "{line}");
    fx.step_to_end();
    let c = fx.controller();
    assert_eq!(c.state(), PlaybackState::Finished);
    let len = c.progress().len.unwrap();
    assert_eq!(c.position(), len);
    assert_eq!(c.applier().label_list(c.applier().order()), "A, B, C, D");
    assert!(
        c.applier()
            .node_marks()
            .iter()
            .all(|m| *m == NodeMark::Visited)
    );

    // Backward over a lazily built prefix rebuilds the same graph state.
    fx.controller_mut().seek(3);
    let mid = fx.controller().applier().clone();
    fx.controller_mut().seek(len);
    fx.controller_mut().seek(3);
    assert_eq!(fx.controller().applier(), &mid);
}

#[test]
fn topological_cycle_ends_not_found() {
    let mut fx = PlaybackFixture::new(TopologicalSort, GraphView::new());
    fx.controller_mut()
        .load(&GraphForm::new("A-B B-C C-A C-D", ""))
        .unwrap();
    fx.step_to_end();
    let c = fx.controller();
    assert_eq!(c.applier().outcome(), Some(StepKind::NotFound));
    assert!(c.status_line().contains("Cycle detected"));
}

#[test]
fn kruskal_marks_tree_edges() {
    let mut fx = PlaybackFixture::new(MinimumSpanningTree, GraphView::new());
    fx.controller_mut()
        .start(&GraphForm::new("A-B:4 A-C:1 B-C:2 C-D:5 B-D:7", ""))
        .unwrap();
    fx.run_to_end(64);
    let view = fx.controller().applier();
    let classes: Vec<_> = view.edge_marks().iter().map(|m| m.class_name()).collect();
    assert_eq!(classes, vec!["rejected", "accepted", "accepted", "accepted", ""]);
}

#[test]
fn two_pointers_and_window_highlight_their_regions() {
    let mut fx = PlaybackFixture::new(TwoPointers, ArrayView::new());
    fx.controller_mut()
        .load(&SearchForm::new("1 2 4 7 11 15", "15"))
        .unwrap();
    fx.controller_mut().seek(2);
    assert_eq!(fx.controller().applier().pointers(), Some((0, 5)));

    let mut fx = PlaybackFixture::new(SlidingWindow, ArrayView::new());
    fx.controller_mut()
        .load(&WindowForm::new("2 1 5 1 3 2", "3"))
        .unwrap();
    fx.step_to_end();
    assert_eq!(fx.controller().applier().range(), Some((2, 4)));
}

#[test]
fn producers_are_deterministic() {
    let limits = Limits::default();
    let form = ArrayForm::new("9 4 7 1 8 2");
    let a = sequence_fingerprint(&mut HeapSort.produce(&form, &limits).unwrap());
    let b = sequence_fingerprint(&mut HeapSort.produce(&form, &limits).unwrap());
    assert_eq!(a, b);

    let graph = GraphForm::new("A-B A-C B-D C-D", "");
    let mut lazy = DepthFirstSearch.produce(&graph, &limits).unwrap();
    let mut again = DepthFirstSearch.produce(&graph, &limits).unwrap();
    lazy.materialize();
    again.materialize();
    assert_eq!(fingerprint(lazy.records()), fingerprint(again.records()));
}
