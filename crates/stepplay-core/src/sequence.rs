#![forbid(unsafe_code)]

//! Ordered step sequences, eager or lazily pulled.
//!
//! # Invariants
//!
//! 1. Index 0 is always a [`StepKind::Start`] record.
//! 2. Once complete, the last record is terminal and no earlier record is.
//! 3. Records are never reordered or replaced after they become visible.
//!
//! # Failure Modes
//!
//! - **Eager contract violation**: [`StepSequence::from_records`] rejects
//!   input that breaks (1) or (2) with a [`SequenceError`].
//! - **Lazy contract violation**: a lazy source cannot be rejected up front,
//!   so a missing start marker or terminal record is repaired with a
//!   synthetic record and logged at `warn`.

use std::fmt;

use crate::step::{Payload, StepKind, StepRecord};

/// Contract violations in an eagerly supplied record list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    /// No records at all.
    #[error("step sequence is empty")]
    Empty,
    /// Index 0 is not a start marker.
    #[error("step 0 must be a start marker, found {0}")]
    MissingStart(StepKind),
    /// The last record is not terminal.
    #[error("last step must be terminal, found {0}")]
    MissingTerminal(StepKind),
    /// A terminal record appears before the end.
    #[error("terminal step {kind} at index {index} is not last")]
    EarlyTerminal { index: usize, kind: StepKind },
}

type StepSource = Box<dyn Iterator<Item = StepRecord>>;

/// The ordered list of steps for one playback run.
///
/// Eager sequences are fully materialized. Lazy sequences hold a source
/// iterator and pull from it only when a caller asks for a record beyond
/// the known prefix.
pub struct StepSequence {
    records: Vec<StepRecord>,
    source: Option<StepSource>,
}

impl fmt::Debug for StepSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepSequence")
            .field("known", &self.records.len())
            .field("complete", &self.is_complete())
            .finish_non_exhaustive()
    }
}

impl StepSequence {
    /// Build an eager sequence, checking every invariant.
    pub fn from_records(records: Vec<StepRecord>) -> Result<Self, SequenceError> {
        let first = records.first().ok_or(SequenceError::Empty)?;
        if first.kind() != StepKind::Start {
            return Err(SequenceError::MissingStart(first.kind()));
        }
        let last_index = records.len() - 1;
        for (index, rec) in records.iter().enumerate() {
            if index == last_index {
                if !rec.is_terminal() {
                    return Err(SequenceError::MissingTerminal(rec.kind()));
                }
            } else if rec.is_terminal() {
                return Err(SequenceError::EarlyTerminal {
                    index,
                    kind: rec.kind(),
                });
            }
        }
        Ok(Self {
            records,
            source: None,
        })
    }

    /// Build a lazy sequence over `source`.
    ///
    /// Nothing is pulled until a record is requested. The source is fused at
    /// the first terminal record.
    pub fn lazy<I>(source: I) -> Self
    where
        I: IntoIterator<Item = StepRecord>,
        I::IntoIter: 'static,
    {
        Self {
            records: Vec::new(),
            source: Some(Box::new(source.into_iter())),
        }
    }

    /// Whether the source has been exhausted (always true for eager sequences).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.source.is_none()
    }

    /// Whether this sequence was built lazily and still has records to pull.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.source.is_some()
    }

    /// Total length, once known.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        self.is_complete().then_some(self.records.len())
    }

    /// Number of records produced so far.
    #[must_use]
    pub fn known_len(&self) -> usize {
        self.records.len()
    }

    /// True when no record is known yet and none can follow.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.is_complete()
    }

    /// The known prefix.
    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Record at `index` if it is already known.
    #[must_use]
    pub fn peek(&self, index: usize) -> Option<&StepRecord> {
        self.records.get(index)
    }

    /// Record at `index`, pulling from the source if needed.
    pub fn get(&mut self, index: usize) -> Option<&StepRecord> {
        self.fetch(index + 1);
        self.records.get(index)
    }

    /// Make records `[0, upto)` available if the sequence is that long.
    ///
    /// Returns the number of records known afterwards.
    pub fn fetch(&mut self, upto: usize) -> usize {
        while self.records.len() < upto && self.pull() {}
        self.records.len()
    }

    /// Pull every remaining record and return the total length.
    pub fn materialize(&mut self) -> usize {
        while self.pull() {}
        self.records.len()
    }

    /// Last record, if known and terminal.
    #[must_use]
    pub fn terminal(&self) -> Option<&StepRecord> {
        if !self.is_complete() {
            return None;
        }
        self.records.last().filter(|r| r.is_terminal())
    }

    fn pull(&mut self) -> bool {
        let Some(source) = self.source.as_mut() else {
            return false;
        };
        match source.next() {
            Some(rec) => {
                if self.records.is_empty() && rec.kind() != StepKind::Start {
                    tracing::warn!(
                        playback_event = "sequence_repair",
                        reason = "missing_start",
                        first = %rec.kind(),
                    );
                    self.records
                        .push(StepRecord::bare(StepKind::Start, "Start"));
                }
                let terminal = rec.is_terminal();
                self.records.push(rec);
                if terminal {
                    self.source = None;
                }
            }
            None => {
                self.source = None;
                if self.records.is_empty() {
                    tracing::warn!(playback_event = "sequence_repair", reason = "empty_source");
                    self.records
                        .push(StepRecord::bare(StepKind::Start, "Start"));
                }
                if self.records.last().is_some_and(|r| !r.is_terminal()) {
                    tracing::warn!(
                        playback_event = "sequence_repair",
                        reason = "missing_terminal",
                        known = self.records.len(),
                    );
                    self.records.push(StepRecord::bare(StepKind::Done, "Done"));
                }
            }
        }
        true
    }
}

/// Builder that producers use to emit an eager sequence.
///
/// The start marker is mandatory at construction and the sequence can only
/// be closed through one of the terminal methods, so every sequence built
/// this way satisfies the invariants by construction.
#[derive(Debug, Clone)]
pub struct StepRecorder {
    records: Vec<StepRecord>,
}

impl StepRecorder {
    /// Begin a sequence with its start marker.
    #[must_use]
    pub fn start(payload: Payload, note: impl Into<String>) -> Self {
        Self {
            records: vec![StepRecord::new(StepKind::Start, payload, note)],
        }
    }

    /// Append a non-terminal step.
    ///
    /// Terminal kinds only close a sequence through [`found`](Self::found),
    /// [`not_found`](Self::not_found), or [`done`](Self::done); one passed
    /// here is recorded as [`StepKind::Highlight`] and logged at `warn`.
    pub fn push(&mut self, kind: StepKind, payload: Payload, note: impl Into<String>) -> &mut Self {
        let kind = if kind.is_terminal() {
            tracing::warn!(
                playback_event = "sequence_repair",
                reason = "terminal_in_push",
                kind = %kind,
                index = self.records.len(),
            );
            StepKind::Highlight
        } else {
            kind
        };
        self.records.push(StepRecord::new(kind, payload, note));
        self
    }

    /// Steps recorded so far, including the start marker.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false: a recorder holds at least its start marker.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Close with a [`StepKind::Found`] record.
    #[must_use]
    pub fn found(self, payload: Payload, note: impl Into<String>) -> StepSequence {
        self.finish(StepKind::Found, payload, note)
    }

    /// Close with a [`StepKind::NotFound`] record.
    #[must_use]
    pub fn not_found(self, payload: Payload, note: impl Into<String>) -> StepSequence {
        self.finish(StepKind::NotFound, payload, note)
    }

    /// Close with a [`StepKind::Done`] record.
    #[must_use]
    pub fn done(self, payload: Payload, note: impl Into<String>) -> StepSequence {
        self.finish(StepKind::Done, payload, note)
    }

    fn finish(mut self, kind: StepKind, payload: Payload, note: impl Into<String>) -> StepSequence {
        self.records.push(StepRecord::new(kind, payload, note));
        StepSequence {
            records: self.records,
            source: None,
        }
    }
}
