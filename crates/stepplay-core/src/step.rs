#![forbid(unsafe_code)]

//! Step records: one atomic, renderable algorithm action.
//!
//! A [`StepRecord`] pairs a [`StepKind`] tag with a structured [`Payload`]
//! and a short human-readable note. Records are immutable once produced; the
//! index of a record inside its [`StepSequence`](crate::StepSequence) is its
//! only identity.
//!
//! # Invariants
//!
//! 1. `is_terminal()` is derived from the kind; only [`StepKind::Found`],
//!    [`StepKind::NotFound`] and [`StepKind::Done`] are terminal.
//! 2. Records never reference indices outside the input they were produced
//!    from (producers guarantee this, views may rely on it).

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tag describing what a step does.
///
/// The runtime only ever looks at [`is_terminal`](Self::is_terminal); every
/// other distinction exists for visual appliers and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StepKind {
    /// Start marker: always index 0 of a sequence.
    Start,
    /// Two elements (or an element and a target) are compared.
    Compare,
    /// Two elements exchange places.
    Swap,
    /// A slot is overwritten with a new value.
    Write,
    /// A sift-down pass (a batch of swaps) inside a heap.
    Sift,
    /// Slots reach their final sorted position. With a `Pair` payload the
    /// two slots are swapped first and `j` is the slot marked.
    MarkSorted,
    /// A graph node is visited.
    Visit,
    /// A node enters a FIFO frontier.
    Enqueue,
    /// A node leaves a FIFO frontier.
    Dequeue,
    /// A node enters a LIFO frontier.
    Push,
    /// A node leaves a LIFO frontier.
    Pop,
    /// Two sorted runs are combined.
    Merge,
    /// A region or edge is highlighted without changing data.
    Highlight,
    /// An edge is accepted into a result (spanning tree, ordering).
    Accept,
    /// An edge is considered and rejected.
    Reject,
    /// Search succeeded.
    Found,
    /// Search failed, or the algorithm could not complete.
    NotFound,
    /// Algorithm finished.
    Done,
}

impl StepKind {
    /// Every kind, in declaration order.
    pub const ALL: [StepKind; 18] = [
        Self::Start,
        Self::Compare,
        Self::Swap,
        Self::Write,
        Self::Sift,
        Self::MarkSorted,
        Self::Visit,
        Self::Enqueue,
        Self::Dequeue,
        Self::Push,
        Self::Pop,
        Self::Merge,
        Self::Highlight,
        Self::Accept,
        Self::Reject,
        Self::Found,
        Self::NotFound,
        Self::Done,
    ];

    /// Whether a record of this kind ends a sequence.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Found | Self::NotFound | Self::Done)
    }

    /// Class name a host UI attaches to the elements this step touches.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Compare => "comparing",
            Self::Swap | Self::Sift => "swapping",
            Self::Write | Self::Merge => "writing",
            Self::MarkSorted => "sorted",
            Self::Visit => "visited",
            Self::Enqueue | Self::Push => "frontier",
            Self::Dequeue | Self::Pop => "current",
            Self::Highlight => "highlight",
            Self::Accept => "accepted",
            Self::Reject => "rejected",
            Self::Found => "found",
            Self::NotFound => "not-found",
            Self::Done => "done",
        }
    }

    /// Stable lowercase label used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Compare => "compare",
            Self::Swap => "swap",
            Self::Write => "write",
            Self::Sift => "sift",
            Self::MarkSorted => "mark_sorted",
            Self::Visit => "visit",
            Self::Enqueue => "enqueue",
            Self::Dequeue => "dequeue",
            Self::Push => "push",
            Self::Pop => "pop",
            Self::Merge => "merge",
            Self::Highlight => "highlight",
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Found => "found",
            Self::NotFound => "not_found",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured data attached to a step.
///
/// Variants are grouped by shape rather than by algorithm so several kinds
/// can share one (a `Compare` and a `Swap` both carry a [`Payload::Pair`]).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "shape", rename_all = "snake_case"))]
pub enum Payload {
    /// No data.
    #[default]
    None,
    /// Full array contents (start markers of array algorithms).
    Values { values: Vec<i64> },
    /// Array contents with an inclusive active range (search start markers).
    Bounds {
        values: Vec<i64>,
        low: usize,
        high: usize,
    },
    /// Two slots.
    Pair { i: usize, j: usize },
    /// A single slot.
    Index { index: usize },
    /// Several slots at once.
    Indices { indices: Vec<usize> },
    /// Binary-search probe.
    Probe {
        low: usize,
        mid: usize,
        high: usize,
        value: i64,
        target: i64,
    },
    /// Overwrite `index` with `value`; `previous` keeps the old value so the
    /// write can be inverted.
    Write {
        index: usize,
        value: i64,
        previous: i64,
    },
    /// Batch of swaps applied in order.
    Swaps { swaps: Vec<(usize, usize)> },
    /// Merge of `[start, mid)` and `[mid, end)` into `values`.
    Merge {
        start: usize,
        mid: usize,
        end: usize,
        values: Vec<i64>,
        previous: Vec<i64>,
    },
    /// Radix pass: array contents before and after distributing on `digit`.
    Pass {
        digit: u32,
        values: Vec<i64>,
        previous: Vec<i64>,
    },
    /// Window `[start, end]` with its aggregate.
    Window { start: usize, end: usize, sum: i64 },
    /// Two pointers with their current aggregate.
    Pointers { left: usize, right: usize, sum: i64 },
    /// Graph nodes by index; `labels` parallel to the node table.
    Graph {
        labels: Vec<String>,
        edges: Vec<(usize, usize, i64)>,
    },
    /// A single node, with the frontier contents after the step.
    Node { node: usize, frontier: Vec<usize> },
    /// A single edge.
    Edge { from: usize, to: usize, weight: i64 },
    /// Final ordering of nodes (traversal or topological order).
    Order { order: Vec<usize> },
}

/// One immutable step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepRecord {
    kind: StepKind,
    payload: Payload,
    note: String,
}

impl StepRecord {
    /// Create a record.
    #[must_use]
    pub fn new(kind: StepKind, payload: Payload, note: impl Into<String>) -> Self {
        Self {
            kind,
            payload,
            note: note.into(),
        }
    }

    /// Create a record with no payload.
    #[must_use]
    pub fn bare(kind: StepKind, note: impl Into<String>) -> Self {
        Self::new(kind, Payload::None, note)
    }

    /// The step kind.
    #[must_use]
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// The structured payload.
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Human-readable description for the status/log line.
    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Whether this record ends its sequence.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }

    /// Class name for the elements this step touches.
    #[must_use]
    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.note.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.note)
        }
    }
}
