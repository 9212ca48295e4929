#![forbid(unsafe_code)]

//! Bounded step log with JSONL export.
//!
//! Every applied step, navigation jump, lifecycle transition, and rejected
//! `start` is appended with a monotonically increasing `seq`. When the ring
//! is full the oldest entry is dropped; `seq` keeps counting so gaps reveal
//! truncation.

use std::collections::VecDeque;

use serde::Serialize;
use stepplay_core::StepKind;

use crate::state::PlaybackState;

/// One log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEntry {
    /// A record was applied going forward.
    Step {
        seq: u64,
        pos: usize,
        kind: StepKind,
        note: String,
    },
    /// Backward step, seek, or reset.
    Navigate {
        seq: u64,
        action: &'static str,
        from: usize,
        to: usize,
    },
    /// State machine transition.
    Lifecycle {
        seq: u64,
        from: PlaybackState,
        to: PlaybackState,
        pos: usize,
    },
    /// `start`/`load` refused its input.
    Rejected { seq: u64, message: String },
}

impl LogEntry {
    #[must_use]
    pub fn seq(&self) -> u64 {
        match self {
            Self::Step { seq, .. }
            | Self::Navigate { seq, .. }
            | Self::Lifecycle { seq, .. }
            | Self::Rejected { seq, .. } => *seq,
        }
    }

    /// Render as a single JSON line (no trailing newline).
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Ring buffer of [`LogEntry`].
#[derive(Debug, Clone)]
pub struct StepLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    seq: u64,
}

impl StepLog {
    /// Create a log retaining at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            seq: 0,
        }
    }

    fn next_seq(&mut self) -> u64 {
        let s = self.seq;
        self.seq = self.seq.wrapping_add(1);
        s
    }

    fn push(&mut self, entry: LogEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn record_step(&mut self, pos: usize, kind: StepKind, note: &str) {
        let seq = self.next_seq();
        self.push(LogEntry::Step {
            seq,
            pos,
            kind,
            note: note.to_owned(),
        });
    }

    pub fn record_navigation(&mut self, action: &'static str, from: usize, to: usize) {
        let seq = self.next_seq();
        self.push(LogEntry::Navigate {
            seq,
            action,
            from,
            to,
        });
    }

    pub fn record_transition(&mut self, from: PlaybackState, to: PlaybackState, pos: usize) {
        let seq = self.next_seq();
        self.push(LogEntry::Lifecycle { seq, from, to, pos });
    }

    pub fn record_rejection(&mut self, message: impl Into<String>) {
        let seq = self.next_seq();
        self.push(LogEntry::Rejected {
            seq,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn entries(&self) -> &VecDeque<LogEntry> {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Export all retained entries, one JSON object per line.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        self.entries
            .iter()
            .map(LogEntry::to_jsonl)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Drop retained entries (keeps seq).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for StepLog {
    fn default() -> Self {
        Self::new(256)
    }
}
