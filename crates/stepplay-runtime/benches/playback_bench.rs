//! Benchmarks for producing and replaying step sequences.
//!
//! Run with: cargo bench -p stepplay-runtime --bench playback_bench
//!
//! Measures:
//! - producer cost for eager sorts at the input limit
//! - full timed playback through the controller
//! - backward stepping cost under recompute (prefix replay per step)

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use stepplay_algorithms::{ArrayView, HeapSort, MergeSort};
use stepplay_core::{ArrayForm, Limits, StepProducer};
use stepplay_runtime::{DeterministicClock, PlaybackController, PlaybackCursor, PlaybackState};

fn descending(n: usize) -> ArrayForm {
    let values: Vec<i64> = (0..n as i64).rev().collect();
    ArrayForm::from_values(&values)
}

fn bench_produce(c: &mut Criterion) {
    let mut group = c.benchmark_group("produce");
    let limits = Limits::default();
    for n in [8usize, 32, 64] {
        let form = descending(n);
        group.bench_with_input(BenchmarkId::new("heap_sort", n), &form, |b, form| {
            b.iter(|| black_box(HeapSort.produce(form, &limits)))
        });
        group.bench_with_input(BenchmarkId::new("merge_sort", n), &form, |b, form| {
            b.iter(|| black_box(MergeSort.produce(form, &limits)))
        });
    }
    group.finish();
}

fn bench_timed_playback(c: &mut Criterion) {
    let mut group = c.benchmark_group("timed_playback");
    for n in [8usize, 64] {
        let form = descending(n);
        group.bench_with_input(BenchmarkId::new("heap_sort", n), &form, |b, form| {
            b.iter(|| {
                let mut player =
                    PlaybackController::new(HeapSort, ArrayView::new(), DeterministicClock::new());
                player.set_speed(10);
                let _ = player.start(form);
                while player.state() == PlaybackState::Playing {
                    player.clock_mut().advance_ms(10);
                    player.poll();
                }
                black_box(player.position())
            })
        });
    }
    group.finish();
}

fn bench_recompute_backward(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute_backward");
    let limits = Limits::default();
    for n in [8usize, 64] {
        let form = descending(n);
        group.bench_with_input(BenchmarkId::new("heap_sort", n), &form, |b, form| {
            b.iter(|| {
                let mut view = ArrayView::new();
                let Ok(seq) = HeapSort.produce(form, &limits) else {
                    return;
                };
                let mut cursor = PlaybackCursor::new(seq, &mut view);
                let len = cursor.len().unwrap_or(0);
                cursor.seek(len, &mut view);
                while cursor.position() > 0 {
                    cursor.step_backward(&mut view);
                }
                black_box(view.values().len());
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_produce,
    bench_timed_playback,
    bench_recompute_backward
);
criterion_main!(benches);
