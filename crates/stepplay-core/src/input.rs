#![forbid(unsafe_code)]

//! Raw form inputs and their parsing.
//!
//! Host pages hand over text exactly as typed. Producers parse and validate
//! it with the helpers here before emitting a single step.

use crate::error::ValidationError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bounds applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Limits {
    /// Maximum number of array values or graph nodes.
    pub max_len: usize,
    /// Maximum absolute value of a parsed number.
    pub max_abs_value: i64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_len: 64,
            max_abs_value: 1_000_000_000,
        }
    }
}

impl Limits {
    /// Largest possible magnitude of a sum over `max_len` accepted values,
    /// or `None` if it does not fit in `i64`.
    #[must_use]
    pub fn sum_bound(&self) -> Option<i64> {
        i64::try_from(self.max_len)
            .ok()?
            .checked_mul(self.max_abs_value)
    }

    /// `a + b`; overflow is reported as an out-of-range value.
    pub fn checked_add(&self, a: i64, b: i64) -> Result<i64, ValidationError> {
        a.checked_add(b).ok_or(self.out_of_range())
    }

    /// `a - b`; overflow is reported as an out-of-range value.
    pub fn checked_sub(&self, a: i64, b: i64) -> Result<i64, ValidationError> {
        a.checked_sub(b).ok_or(self.out_of_range())
    }

    /// Sum of `values`; overflow is reported as an out-of-range value.
    pub fn checked_sum(&self, values: &[i64]) -> Result<i64, ValidationError> {
        values
            .iter()
            .try_fold(0i64, |acc, &v| self.checked_add(acc, v))
    }

    fn out_of_range(&self) -> ValidationError {
        ValidationError::ValueOutOfRange {
            max: self.max_abs_value,
        }
    }
}

/// A single array field (sorting pages).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrayForm {
    pub array: String,
}

impl ArrayForm {
    #[must_use]
    pub fn new(array: impl Into<String>) -> Self {
        Self {
            array: array.into(),
        }
    }

    /// Form pre-filled from numeric values.
    #[must_use]
    pub fn from_values(values: &[i64]) -> Self {
        Self::new(join_values(values))
    }
}

/// Array plus target (search and two-pointer pages).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub array: String,
    pub target: String,
}

impl SearchForm {
    #[must_use]
    pub fn new(array: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            array: array.into(),
            target: target.into(),
        }
    }

    #[must_use]
    pub fn from_values(values: &[i64], target: i64) -> Self {
        Self::new(join_values(values), target.to_string())
    }
}

/// Array plus window size (sliding-window page).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowForm {
    pub array: String,
    pub size: String,
}

impl WindowForm {
    #[must_use]
    pub fn new(array: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            array: array.into(),
            size: size.into(),
        }
    }
}

/// Edge list plus optional start node (graph pages).
///
/// Edges are written `A-B` or `A-B:4` (weighted) and separated by commas,
/// semicolons, or whitespace. Node labels are any run of characters other
/// than separators, `-` and `:`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphForm {
    pub edges: String,
    pub start: String,
}

impl GraphForm {
    #[must_use]
    pub fn new(edges: impl Into<String>, start: impl Into<String>) -> Self {
        Self {
            edges: edges.into(),
            start: start.into(),
        }
    }
}

/// Parsed edge list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedGraph {
    /// Node labels in first-appearance order; node ids index into this.
    pub labels: Vec<String>,
    /// `(from, to, weight)` by node id; unweighted edges carry weight 1.
    pub edges: Vec<(usize, usize, i64)>,
}

impl ParsedGraph {
    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Look up a node id by label.
    #[must_use]
    pub fn node(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Adjacency lists, neighbours in edge order.
    #[must_use]
    pub fn adjacency(&self, directed: bool) -> Vec<Vec<usize>> {
        let mut adj = vec![Vec::new(); self.labels.len()];
        for &(from, to, _) in &self.edges {
            adj[from].push(to);
            if !directed {
                adj[to].push(from);
            }
        }
        adj
    }

    /// Resolve the optional start label, defaulting to the first node.
    pub fn start_node(&self, label: &str) -> Result<usize, ValidationError> {
        let label = label.trim();
        if label.is_empty() {
            return Ok(0);
        }
        self.node(label)
            .ok_or_else(|| ValidationError::UnknownStartNode {
                label: label.to_string(),
            })
    }
}

fn is_separator(c: char) -> bool {
    c == ',' || c == ';' || c.is_whitespace()
}

fn join_values(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a comma/whitespace separated list of integers.
pub fn parse_values(text: &str, limits: &Limits) -> Result<Vec<i64>, ValidationError> {
    let values = text
        .split(is_separator)
        .filter(|tok| !tok.is_empty())
        .map(|tok| tok.parse::<i64>().map_err(|_| ValidationError::InvalidArray))
        .collect::<Result<Vec<_>, _>>()?;
    if values.is_empty() {
        return Err(ValidationError::InvalidArray);
    }
    if values.len() > limits.max_len {
        return Err(ValidationError::TooManyValues {
            max: limits.max_len,
        });
    }
    if values.iter().any(|v| v.unsigned_abs() > limits.max_abs_value.unsigned_abs()) {
        return Err(ValidationError::ValueOutOfRange {
            max: limits.max_abs_value,
        });
    }
    Ok(values)
}

/// Parse a single target integer.
pub fn parse_target(text: &str, limits: &Limits) -> Result<i64, ValidationError> {
    let target = text
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidTarget)?;
    if target.unsigned_abs() > limits.max_abs_value.unsigned_abs() {
        return Err(ValidationError::ValueOutOfRange {
            max: limits.max_abs_value,
        });
    }
    Ok(target)
}

/// Parse a window size in `1..=len`.
pub fn parse_window_size(text: &str, len: usize) -> Result<usize, ValidationError> {
    match text.trim().parse::<usize>() {
        Ok(size) if (1..=len).contains(&size) => Ok(size),
        _ => Err(ValidationError::InvalidWindowSize),
    }
}

/// Parse an edge list into a node table and edge list.
pub fn parse_graph(text: &str, limits: &Limits) -> Result<ParsedGraph, ValidationError> {
    let mut graph = ParsedGraph {
        labels: Vec::new(),
        edges: Vec::new(),
    };
    for token in text.split(is_separator).filter(|t| !t.is_empty()) {
        let (pair, weight) = match token.split_once(':') {
            Some((pair, w)) => (
                pair,
                w.parse::<i64>().map_err(|_| ValidationError::InvalidGraph)?,
            ),
            None => (token, 1),
        };
        let (from, to) = pair.split_once('-').ok_or(ValidationError::InvalidGraph)?;
        if from.is_empty() || to.is_empty() || to.contains('-') {
            return Err(ValidationError::InvalidGraph);
        }
        if weight.unsigned_abs() > limits.max_abs_value.unsigned_abs() {
            return Err(ValidationError::ValueOutOfRange {
                max: limits.max_abs_value,
            });
        }
        let from = intern(&mut graph.labels, from);
        let to = intern(&mut graph.labels, to);
        graph.edges.push((from, to, weight));
    }
    if graph.edges.is_empty() {
        return Err(ValidationError::InvalidGraph);
    }
    if graph.labels.len() > limits.max_len {
        return Err(ValidationError::TooManyNodes {
            max: limits.max_len,
        });
    }
    Ok(graph)
}

fn intern(labels: &mut Vec<String>, label: &str) -> usize {
    if let Some(id) = labels.iter().position(|l| l == label) {
        return id;
    }
    labels.push(label.to_string());
    labels.len() - 1
}
