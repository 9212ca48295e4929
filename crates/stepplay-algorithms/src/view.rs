#![forbid(unsafe_code)]

//! In-memory visual models.
//!
//! [`ArrayView`] and [`GraphView`] are what a page's bars and SVG nodes
//! would show, kept as plain data. Both are recompute-only: they rebuild from
//! the start marker and never receive `Direction::Backward`.
//!
//! Each view derives `PartialEq` so tests can compare whole visual states.

use std::fmt::Write as _;

use stepplay_core::{Payload, StepKind, StepRecord};
use stepplay_runtime::{Direction, VisualApplier};

/// Persistent mark on an array slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SlotMark {
    #[default]
    None,
    Sorted,
    Found,
}

impl SlotMark {
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Sorted => "sorted",
            Self::Found => "found",
        }
    }
}

/// Bars of an array algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArrayView {
    values: Vec<i64>,
    marks: Vec<SlotMark>,
    highlight: Vec<usize>,
    highlight_class: &'static str,
    range: Option<(usize, usize)>,
    pointers: Option<(usize, usize)>,
    status: String,
    outcome: Option<StepKind>,
    finished: bool,
}

impl ArrayView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    #[must_use]
    pub fn marks(&self) -> &[SlotMark] {
        &self.marks
    }

    /// Slots touched by the last applied step.
    #[must_use]
    pub fn highlighted(&self) -> &[usize] {
        &self.highlight
    }

    /// Class for slot `index`: its persistent mark, else the highlight class
    /// when the last step touched it, else empty.
    #[must_use]
    pub fn class_of(&self, index: usize) -> &'static str {
        match self.marks.get(index) {
            Some(mark) if *mark != SlotMark::None => mark.class_name(),
            _ if self.highlight.contains(&index) => self.highlight_class,
            _ => "",
        }
    }

    /// Active inclusive range (search bounds, merge run, window).
    #[must_use]
    pub fn range(&self) -> Option<(usize, usize)> {
        self.range
    }

    #[must_use]
    pub fn pointers(&self) -> Option<(usize, usize)> {
        self.pointers
    }

    /// Note of the last applied step.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Kind of the terminal step once applied.
    #[must_use]
    pub fn outcome(&self) -> Option<StepKind> {
        self.outcome
    }

    /// Whether the terminal visual has been shown.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Every slot carries the sorted mark.
    #[must_use]
    pub fn all_sorted(&self) -> bool {
        !self.marks.is_empty() && self.marks.iter().all(|m| *m == SlotMark::Sorted)
    }

    /// One-line text rendering: `(v)` highlighted, `v*` sorted, `[v]` found.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let in_range = self.range.is_some_and(|(lo, hi)| (lo..=hi).contains(&i));
            if self.range.is_some() && !in_range {
                out.push('.');
            }
            match self.marks.get(i).copied().unwrap_or_default() {
                SlotMark::Found => {
                    let _ = write!(out, "[{v}]");
                }
                SlotMark::Sorted => {
                    let _ = write!(out, "{v}*");
                }
                SlotMark::None if self.highlight.contains(&i) => {
                    let _ = write!(out, "({v})");
                }
                SlotMark::None => {
                    let _ = write!(out, "{v}");
                }
            }
        }
        if let Some((l, r)) = self.pointers {
            let _ = write!(out, "   L={l} R={r}");
        }
        out
    }

    fn swap(&mut self, i: usize, j: usize) {
        if i < self.values.len() && j < self.values.len() {
            self.values.swap(i, j);
        }
    }

    fn mark(&mut self, index: usize, mark: SlotMark) {
        if let Some(slot) = self.marks.get_mut(index) {
            *slot = mark;
        }
    }

    fn load(&mut self, values: &[i64]) {
        self.values = values.to_vec();
        self.marks = vec![SlotMark::None; values.len()];
    }
}

impl VisualApplier for ArrayView {
    fn reset(&mut self, start: &StepRecord) {
        *self = Self::default();
        match start.payload() {
            Payload::Values { values } | Payload::Bounds { values, .. } => self.load(values),
            _ => {}
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn apply(&mut self, step: &StepRecord, direction: Direction) {
        if direction == Direction::Backward {
            tracing::debug!(playback_event = "ignored_backward", view = "array");
            return;
        }
        let kind = step.kind();
        self.highlight.clear();
        self.highlight_class = kind.class_name();
        self.status = step.note().to_owned();

        match step.payload() {
            Payload::Values { values } => {
                if kind == StepKind::Done {
                    self.values.clone_from(values);
                    self.marks = vec![SlotMark::Sorted; values.len()];
                    self.range = None;
                }
            }
            Payload::Bounds { low, high, .. } => self.range = Some((*low, *high)),
            Payload::Pair { i, j } => {
                let (i, j) = (*i, *j);
                match kind {
                    StepKind::Swap => self.swap(i, j),
                    StepKind::MarkSorted => {
                        self.swap(i, j);
                        self.mark(j, SlotMark::Sorted);
                    }
                    StepKind::Found => {
                        self.mark(i, SlotMark::Found);
                        self.mark(j, SlotMark::Found);
                    }
                    _ => {}
                }
                self.highlight = vec![i, j];
            }
            Payload::Index { index } => {
                match kind {
                    StepKind::MarkSorted => self.mark(*index, SlotMark::Sorted),
                    StepKind::Found => {
                        self.mark(*index, SlotMark::Found);
                        self.range = Some((*index, *index));
                    }
                    _ => {}
                }
                self.highlight = vec![*index];
            }
            Payload::Indices { indices } => {
                if kind == StepKind::MarkSorted {
                    for &index in indices {
                        self.mark(index, SlotMark::Sorted);
                    }
                }
                self.highlight.clone_from(indices);
            }
            Payload::Probe { low, mid, high, .. } => {
                self.range = Some((*low, *high));
                self.highlight = vec![*mid];
            }
            Payload::Write { index, value, .. } => {
                if let Some(slot) = self.values.get_mut(*index) {
                    *slot = *value;
                }
                self.highlight = vec![*index];
            }
            Payload::Swaps { swaps } => {
                for &(i, j) in swaps {
                    self.swap(i, j);
                    for slot in [i, j] {
                        if !self.highlight.contains(&slot) {
                            self.highlight.push(slot);
                        }
                    }
                }
            }
            Payload::Merge {
                start, end, values, ..
            } => {
                if let Some(run) = self.values.get_mut(*start..*end) {
                    if run.len() == values.len() {
                        run.copy_from_slice(values);
                    }
                }
                self.highlight = (*start..*end).collect();
                self.range = end.checked_sub(1).map(|last| (*start, last));
            }
            Payload::Pass { values, .. } => {
                if values.len() == self.values.len() {
                    self.values.clone_from(values);
                }
            }
            Payload::Window { start, end, .. } => {
                self.range = Some((*start, *end));
                self.highlight = (*start..=*end).collect();
            }
            Payload::Pointers { left, right, .. } => {
                self.pointers = Some((*left, *right));
                self.highlight = vec![*left, *right];
            }
            Payload::None
            | Payload::Graph { .. }
            | Payload::Node { .. }
            | Payload::Edge { .. }
            | Payload::Order { .. } => {}
        }

        if kind.is_terminal() {
            self.outcome = Some(kind);
            if kind == StepKind::NotFound {
                self.range = None;
            }
        }
    }

    fn on_finished(&mut self, _terminal: &StepRecord) {
        self.finished = true;
    }
}

/// Persistent mark on a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeMark {
    #[default]
    None,
    Frontier,
    Current,
    Visited,
}

impl NodeMark {
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Frontier => "frontier",
            Self::Current => "current",
            Self::Visited => "visited",
        }
    }
}

/// Persistent mark on a graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgeMark {
    #[default]
    None,
    Accepted,
    Rejected,
    Removed,
}

impl EdgeMark {
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Removed => "removed",
        }
    }
}

/// Nodes and edges of a graph algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GraphView {
    labels: Vec<String>,
    edges: Vec<(usize, usize, i64)>,
    nodes: Vec<NodeMark>,
    edge_marks: Vec<EdgeMark>,
    highlight_edge: Option<usize>,
    order: Vec<usize>,
    frontier: Vec<usize>,
    current: Option<usize>,
    status: String,
    outcome: Option<StepKind>,
    finished: bool,
}

impl GraphView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn node_marks(&self) -> &[NodeMark] {
        &self.nodes
    }

    #[must_use]
    pub fn edge_marks(&self) -> &[EdgeMark] {
        &self.edge_marks
    }

    /// Visit (or output) order so far.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Stack or queue contents after the last node step.
    #[must_use]
    pub fn frontier(&self) -> &[usize] {
        &self.frontier
    }

    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    #[must_use]
    pub fn highlighted_edge(&self) -> Option<usize> {
        self.highlight_edge
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub fn outcome(&self) -> Option<StepKind> {
        self.outcome
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Labels of `nodes`, comma separated.
    #[must_use]
    pub fn label_list(&self, nodes: &[usize]) -> String {
        nodes
            .iter()
            .filter_map(|&n| self.labels.get(n).map(String::as_str))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Text rendering: one token per node, then order and frontier.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (label, mark) in self.labels.iter().zip(&self.nodes) {
            let _ = match mark {
                NodeMark::None => write!(out, "{label} "),
                NodeMark::Frontier => write!(out, "{label}? "),
                NodeMark::Current => write!(out, ">{label} "),
                NodeMark::Visited => write!(out, "{label}* "),
            };
        }
        let accepted = self
            .edge_marks
            .iter()
            .filter(|m| **m == EdgeMark::Accepted)
            .count();
        let _ = write!(
            out,
            "| order: [{}] frontier: [{}]",
            self.label_list(&self.order),
            self.label_list(&self.frontier)
        );
        if accepted > 0 {
            let _ = write!(out, " tree edges: {accepted}");
        }
        out
    }

    fn find_edge(&self, from: usize, to: usize, weight: i64) -> Option<usize> {
        let matches = |&(a, b, w): &(usize, usize, i64)| {
            w == weight && ((a == from && b == to) || (a == to && b == from))
        };
        self.edges
            .iter()
            .enumerate()
            .position(|(e, edge)| matches(edge) && self.edge_marks[e] == EdgeMark::None)
            .or_else(|| self.edges.iter().position(matches))
    }

    fn mark_node(&mut self, node: usize, mark: NodeMark) {
        if let Some(slot) = self.nodes.get_mut(node) {
            if *slot != NodeMark::Visited || mark == NodeMark::Visited {
                *slot = mark;
            }
        }
    }
}

impl VisualApplier for GraphView {
    fn reset(&mut self, start: &StepRecord) {
        *self = Self::default();
        if let Payload::Graph { labels, edges } = start.payload() {
            self.labels.clone_from(labels);
            self.edges.clone_from(edges);
            self.nodes = vec![NodeMark::None; labels.len()];
            self.edge_marks = vec![EdgeMark::None; edges.len()];
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn apply(&mut self, step: &StepRecord, direction: Direction) {
        if direction == Direction::Backward {
            tracing::debug!(playback_event = "ignored_backward", view = "graph");
            return;
        }
        let kind = step.kind();
        self.highlight_edge = None;
        self.status = step.note().to_owned();

        match step.payload() {
            Payload::Node { node, frontier } => {
                let node = *node;
                self.frontier.clone_from(frontier);
                if let Some(prev) = self.current.take() {
                    if self.nodes.get(prev) == Some(&NodeMark::Current) {
                        self.nodes[prev] = NodeMark::None;
                    }
                }
                match kind {
                    StepKind::Push | StepKind::Enqueue => self.mark_node(node, NodeMark::Frontier),
                    StepKind::Pop | StepKind::Dequeue | StepKind::Reject => {
                        self.mark_node(node, NodeMark::Current);
                        self.current = Some(node);
                    }
                    StepKind::Visit => {
                        self.mark_node(node, NodeMark::Visited);
                        self.order.push(node);
                        self.current = Some(node);
                    }
                    _ => {}
                }
            }
            Payload::Edge { from, to, weight } => {
                if let Some(e) = self.find_edge(*from, *to, *weight) {
                    match kind {
                        StepKind::Accept => self.edge_marks[e] = EdgeMark::Accepted,
                        StepKind::Reject => self.edge_marks[e] = EdgeMark::Rejected,
                        StepKind::Highlight => self.edge_marks[e] = EdgeMark::Removed,
                        _ => {}
                    }
                    self.highlight_edge = Some(e);
                }
            }
            Payload::Order { order } => self.order.clone_from(order),
            _ => {}
        }

        if kind.is_terminal() {
            self.outcome = Some(kind);
            self.frontier.clear();
        }
    }

    fn on_finished(&mut self, _terminal: &StepRecord) {
        self.finished = true;
    }
}
