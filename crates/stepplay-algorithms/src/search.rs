#![forbid(unsafe_code)]

//! Array search producers: binary search, two pointers, sliding window.

use stepplay_core::{
    Limits, Payload, SearchForm, StepKind, StepProducer, StepRecorder, StepSequence,
    ValidationError, WindowForm, parse_target, parse_values, parse_window_size,
};

fn require_sorted(values: &[i64]) -> Result<(), ValidationError> {
    if values.windows(2).all(|w| w[0] <= w[1]) {
        Ok(())
    } else {
        Err(ValidationError::NotSorted)
    }
}

/// Binary search over an ascending array.
///
/// `Start` carries the full bounds, each probe is one `Compare`, and the
/// sequence ends in `Found(Index)` or `NotFound`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinarySearch;

impl StepProducer for BinarySearch {
    type Input = SearchForm;

    fn name(&self) -> &'static str {
        "binary_search"
    }

    fn produce(&self, input: &SearchForm, limits: &Limits) -> Result<StepSequence, ValidationError> {
        let values = parse_values(&input.array, limits)?;
        require_sorted(&values)?;
        let target = parse_target(&input.target, limits)?;

        let mut low = 0usize;
        let mut high = values.len() - 1;
        let mut rec = StepRecorder::start(
            Payload::Bounds {
                values: values.clone(),
                low,
                high,
            },
            format!("Search for {target} in [{low}, {high}]"),
        );
        loop {
            let mid = low + (high - low) / 2;
            let value = values[mid];
            rec.push(
                StepKind::Compare,
                Payload::Probe {
                    low,
                    mid,
                    high,
                    value,
                    target,
                },
                format!("Compare arr[{mid}] = {value} with target {target}"),
            );
            if value == target {
                return Ok(rec.found(
                    Payload::Index { index: mid },
                    format!("Found {target} at index {mid}"),
                ));
            }
            if value < target {
                low = mid + 1;
            } else if mid == 0 {
                break;
            } else {
                high = mid - 1;
            }
            if low > high {
                break;
            }
        }
        Ok(rec.not_found(Payload::None, format!("{target} is not in the array")))
    }
}

/// Pair-sum search with two pointers over an ascending array.
///
/// The target field holds the sum to find.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoPointers;

impl StepProducer for TwoPointers {
    type Input = SearchForm;

    fn name(&self) -> &'static str {
        "two_pointers"
    }

    fn produce(&self, input: &SearchForm, limits: &Limits) -> Result<StepSequence, ValidationError> {
        let values = parse_values(&input.array, limits)?;
        require_sorted(&values)?;
        let target = parse_target(&input.target, limits)?;

        let mut rec = StepRecorder::start(
            Payload::Values {
                values: values.clone(),
            },
            format!("Find two values summing to {target}"),
        );
        let (mut left, mut right) = (0usize, values.len() - 1);
        while left < right {
            let sum = limits.checked_add(values[left], values[right])?;
            rec.push(
                StepKind::Compare,
                Payload::Pointers { left, right, sum },
                format!(
                    "arr[{left}] + arr[{right}] = {} + {} = {sum}",
                    values[left], values[right]
                ),
            );
            if sum == target {
                return Ok(rec.found(
                    Payload::Pair { i: left, j: right },
                    format!("Found pair at indices {left} and {right}"),
                ));
            }
            if sum < target {
                left += 1;
            } else {
                right -= 1;
            }
        }
        Ok(rec.not_found(Payload::None, format!("No pair sums to {target}")))
    }
}

/// Maximum-sum window of a fixed size.
///
/// Each window position is one step: `Accept` when it beats the best so far,
/// `Reject` otherwise. `Done` carries the best window.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlidingWindow;

impl StepProducer for SlidingWindow {
    type Input = WindowForm;

    fn name(&self) -> &'static str {
        "sliding_window"
    }

    fn produce(&self, input: &WindowForm, limits: &Limits) -> Result<StepSequence, ValidationError> {
        let values = parse_values(&input.array, limits)?;
        let size = parse_window_size(&input.size, values.len())?;

        let mut rec = StepRecorder::start(
            Payload::Values {
                values: values.clone(),
            },
            format!("Maximum sum of {size} consecutive values"),
        );
        let mut sum = limits.checked_sum(&values[..size])?;
        let mut best = (0usize, sum);
        rec.push(
            StepKind::Accept,
            Payload::Window {
                start: 0,
                end: size - 1,
                sum,
            },
            format!("First window [0, {}] sums to {sum}", size - 1),
        );
        for end in size..values.len() {
            let start = end + 1 - size;
            sum = limits.checked_add(sum, values[end])?;
            sum = limits.checked_sub(sum, values[start - 1])?;
            let (kind, note) = if sum > best.1 {
                best = (start, sum);
                (StepKind::Accept, format!("Window [{start}, {end}] sums to {sum}: new best"))
            } else {
                (StepKind::Reject, format!("Window [{start}, {end}] sums to {sum}"))
            };
            rec.push(kind, Payload::Window { start, end, sum }, note);
        }
        let (start, sum) = best;
        let end = start + size - 1;
        Ok(rec.done(
            Payload::Window { start, end, sum },
            format!("Maximum sum {sum} in window [{start}, {end}]"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepplay_core::StepRecord;

    fn records(mut seq: StepSequence) -> Vec<StepRecord> {
        seq.materialize();
        seq.records().to_vec()
    }

    #[test]
    fn binary_search_finds_middle_in_three_steps() {
        let seq = BinarySearch
            .produce(
                &SearchForm::new("1,3,5,7,9,11,13", "7"),
                &Limits::default(),
            )
            .unwrap();
        let recs = records(seq);
        assert_eq!(recs.len(), 3);
        assert_eq!(
            recs[0].payload(),
            &Payload::Bounds {
                values: vec![1, 3, 5, 7, 9, 11, 13],
                low: 0,
                high: 6
            }
        );
        assert!(matches!(recs[1].payload(), Payload::Probe { mid: 3, value: 7, .. }));
        assert_eq!(recs[2].kind(), StepKind::Found);
        assert_eq!(recs[2].payload(), &Payload::Index { index: 3 });
    }

    #[test]
    fn binary_search_missing_target() {
        let recs = records(
            BinarySearch
                .produce(&SearchForm::new("1 3 5", "0"), &Limits::default())
                .unwrap(),
        );
        assert_eq!(recs.last().map(StepRecord::kind), Some(StepKind::NotFound));
        let recs = records(
            BinarySearch
                .produce(&SearchForm::new("1 3 5", "6"), &Limits::default())
                .unwrap(),
        );
        assert_eq!(recs.last().map(StepRecord::kind), Some(StepKind::NotFound));
    }

    #[test]
    fn binary_search_validates_in_order() {
        let limits = Limits::default();
        assert_eq!(
            BinarySearch
                .produce(&SearchForm::new("", "7"), &limits)
                .unwrap_err(),
            ValidationError::InvalidArray
        );
        assert_eq!(
            BinarySearch
                .produce(&SearchForm::new("3, 1", "7"), &limits)
                .unwrap_err(),
            ValidationError::NotSorted
        );
        assert_eq!(
            BinarySearch
                .produce(&SearchForm::new("1, 3", ""), &limits)
                .unwrap_err()
                .to_string(),
            "Please enter a valid target number."
        );
    }

    #[test]
    fn two_pointers_finds_pair() {
        let recs = records(
            TwoPointers
                .produce(&SearchForm::new("1 2 4 7 11 15", "15"), &Limits::default())
                .unwrap(),
        );
        assert_eq!(
            recs.last().map(StepRecord::payload),
            Some(&Payload::Pair { i: 2, j: 4 })
        );
    }

    #[test]
    fn two_pointers_single_value_is_not_found() {
        let recs = records(
            TwoPointers
                .produce(&SearchForm::new("5", "10"), &Limits::default())
                .unwrap(),
        );
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[1].kind(), StepKind::NotFound);
    }

    #[test]
    fn sliding_window_tracks_best() {
        let recs = records(
            SlidingWindow
                .produce(&WindowForm::new("2 1 5 1 3 2", "3"), &Limits::default())
                .unwrap(),
        );
        // start, 4 windows, done
        assert_eq!(recs.len(), 6);
        assert_eq!(
            recs.last().map(StepRecord::payload),
            Some(&Payload::Window {
                start: 2,
                end: 4,
                sum: 9
            })
        );
    }

    #[test]
    fn sliding_window_size_bounds() {
        let limits = Limits::default();
        for size in ["0", "7", "x", ""] {
            assert_eq!(
                SlidingWindow
                    .produce(&WindowForm::new("1 2 3", size), &limits)
                    .unwrap_err(),
                ValidationError::InvalidWindowSize,
                "size {size:?}"
            );
        }
    }

    #[test]
    fn sums_that_overflow_are_rejected() {
        let limits = Limits {
            max_len: 64,
            max_abs_value: i64::MAX,
        };
        let big = "9223372036854775807 9223372036854775807";
        let overflow = ValidationError::ValueOutOfRange { max: i64::MAX };
        assert_eq!(
            TwoPointers
                .produce(&SearchForm::new(big, "0"), &limits)
                .unwrap_err(),
            overflow
        );
        assert_eq!(
            SlidingWindow
                .produce(&WindowForm::new(big, "2"), &limits)
                .unwrap_err(),
            overflow
        );
        // Extreme values whose running sums stay in range still play.
        let edge = WindowForm::new("9223372036854775807 -1 -9223372036854775807", "1");
        assert_eq!(
            SlidingWindow
                .produce(&edge, &limits)
                .map(|seq| records(seq).len()),
            Ok(5)
        );
    }
}
