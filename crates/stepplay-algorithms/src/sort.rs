#![forbid(unsafe_code)]

//! Sorting producers.
//!
//! Every sort starts with `Start(Values)` holding the parsed input and ends
//! with `Done(Values)` holding the sorted array.

use stepplay_core::{
    ArrayForm, Limits, Payload, StepKind, StepProducer, StepRecorder, StepSequence,
    ValidationError, parse_values,
};

fn start(values: &[i64]) -> StepRecorder {
    StepRecorder::start(
        Payload::Values {
            values: values.to_vec(),
        },
        format!("Start with {} values", values.len()),
    )
}

fn done(recorder: StepRecorder, values: Vec<i64>) -> StepSequence {
    recorder.done(Payload::Values { values }, "Array is sorted")
}

/// Bubble sort with early exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct BubbleSort;

impl StepProducer for BubbleSort {
    type Input = ArrayForm;

    fn name(&self) -> &'static str {
        "bubble_sort"
    }

    fn produce(&self, input: &ArrayForm, limits: &Limits) -> Result<StepSequence, ValidationError> {
        let mut a = parse_values(&input.array, limits)?;
        let n = a.len();
        let mut rec = start(&a);
        for pass in 0..n.saturating_sub(1) {
            let last = n - 1 - pass;
            let mut swapped = false;
            for j in 0..last {
                rec.push(
                    StepKind::Compare,
                    Payload::Pair { i: j, j: j + 1 },
                    format!("Compare {} and {}", a[j], a[j + 1]),
                );
                if a[j] > a[j + 1] {
                    a.swap(j, j + 1);
                    swapped = true;
                    rec.push(
                        StepKind::Swap,
                        Payload::Pair { i: j, j: j + 1 },
                        format!("Swap {} and {}", a[j + 1], a[j]),
                    );
                }
            }
            if !swapped {
                rec.push(
                    StepKind::MarkSorted,
                    Payload::Indices {
                        indices: (0..=last).collect(),
                    },
                    "No swaps in this pass; remaining slots are sorted",
                );
                return Ok(done(rec, a));
            }
            rec.push(
                StepKind::MarkSorted,
                Payload::Index { index: last },
                format!("{} is in place", a[last]),
            );
        }
        rec.push(
            StepKind::MarkSorted,
            Payload::Index { index: 0 },
            format!("{} is in place", a[0]),
        );
        Ok(done(rec, a))
    }
}

/// Heap sort with one step per sift-down.
///
/// For `n` values the sequence holds `n / 2` heapify sifts, `n - 1`
/// extractions, `n - 2` re-sifts, and three bookends, which stays under
/// `n * log2(n)` for `n >= 8`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapSort;

/// Sift `root` down within `a[..end]`, returning the swaps performed.
fn sift_down(a: &mut [i64], mut root: usize, end: usize) -> Vec<(usize, usize)> {
    let mut swaps = Vec::new();
    loop {
        let left = 2 * root + 1;
        if left >= end {
            break;
        }
        let right = left + 1;
        let child = if right < end && a[right] > a[left] {
            right
        } else {
            left
        };
        if a[child] <= a[root] {
            break;
        }
        a.swap(root, child);
        swaps.push((root, child));
        root = child;
    }
    swaps
}

impl StepProducer for HeapSort {
    type Input = ArrayForm;

    fn name(&self) -> &'static str {
        "heap_sort"
    }

    fn produce(&self, input: &ArrayForm, limits: &Limits) -> Result<StepSequence, ValidationError> {
        let mut a = parse_values(&input.array, limits)?;
        let n = a.len();
        let mut rec = start(&a);
        for root in (0..n / 2).rev() {
            let swaps = sift_down(&mut a, root, n);
            let note = if swaps.is_empty() {
                format!("Heapify node {root}: already a heap")
            } else {
                format!("Heapify node {root}: {} swaps", swaps.len())
            };
            rec.push(StepKind::Sift, Payload::Swaps { swaps }, note);
        }
        for end in (1..n).rev() {
            a.swap(0, end);
            rec.push(
                StepKind::MarkSorted,
                Payload::Pair { i: 0, j: end },
                format!("Move max {} to slot {end}", a[end]),
            );
            if end > 1 {
                let swaps = sift_down(&mut a, 0, end);
                let note = format!("Restore heap of size {end}");
                rec.push(StepKind::Sift, Payload::Swaps { swaps }, note);
            }
        }
        rec.push(
            StepKind::MarkSorted,
            Payload::Index { index: 0 },
            format!("{} is in place", a[0]),
        );
        Ok(done(rec, a))
    }
}

/// Top-down merge sort; one `Merge` step per merge of two runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeSort;

fn merge_sort(a: &mut [i64], offset: usize, rec: &mut StepRecorder) {
    let n = a.len();
    if n < 2 {
        return;
    }
    let mid = n / 2;
    merge_sort(&mut a[..mid], offset, rec);
    merge_sort(&mut a[mid..], offset + mid, rec);

    let previous = a.to_vec();
    let (left, right) = previous.split_at(mid);
    let (mut i, mut j) = (0, 0);
    let mut merged = Vec::with_capacity(n);
    while i < left.len() && j < right.len() {
        if left[i] <= right[j] {
            merged.push(left[i]);
            i += 1;
        } else {
            merged.push(right[j]);
            j += 1;
        }
    }
    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);
    a.copy_from_slice(&merged);
    rec.push(
        StepKind::Merge,
        Payload::Merge {
            start: offset,
            mid: offset + mid,
            end: offset + n,
            values: merged,
            previous,
        },
        format!(
            "Merge [{}, {}) and [{}, {})",
            offset,
            offset + mid,
            offset + mid,
            offset + n
        ),
    );
}

impl StepProducer for MergeSort {
    type Input = ArrayForm;

    fn name(&self) -> &'static str {
        "merge_sort"
    }

    fn produce(&self, input: &ArrayForm, limits: &Limits) -> Result<StepSequence, ValidationError> {
        let mut a = parse_values(&input.array, limits)?;
        let mut rec = start(&a);
        merge_sort(&mut a, 0, &mut rec);
        Ok(done(rec, a))
    }
}

/// LSD radix sort, base 10, non-negative integers only.
#[derive(Debug, Clone, Copy, Default)]
pub struct RadixSort;

impl StepProducer for RadixSort {
    type Input = ArrayForm;

    fn name(&self) -> &'static str {
        "radix_sort"
    }

    fn produce(&self, input: &ArrayForm, limits: &Limits) -> Result<StepSequence, ValidationError> {
        let mut a = parse_values(&input.array, limits)?;
        if a.iter().any(|&v| v < 0) {
            return Err(ValidationError::NegativeValue);
        }
        let max = a.iter().copied().max().unwrap_or(0);
        let mut rec = start(&a);
        let mut digit = 0u32;
        let mut place = 1i64;
        while max / place > 0 {
            let previous = a.clone();
            let mut buckets: [Vec<i64>; 10] = Default::default();
            for &v in &previous {
                // v >= 0, so the digit is in 0..10.
                buckets[((v / place) % 10) as usize].push(v);
            }
            a = buckets.concat();
            rec.push(
                StepKind::Write,
                Payload::Pass {
                    digit,
                    values: a.clone(),
                    previous,
                },
                format!("Distribute by digit {} (place {place})", digit + 1),
            );
            digit += 1;
            match place.checked_mul(10) {
                Some(next) => place = next,
                None => break,
            }
        }
        Ok(done(rec, a))
    }
}
