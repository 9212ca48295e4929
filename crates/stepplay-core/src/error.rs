#![forbid(unsafe_code)]

//! Input validation errors.
//!
//! Every variant renders as a fixed, user-facing sentence. Host UIs show the
//! `Display` output verbatim, so the wording is part of the public contract.

/// Rejected producer input.
///
/// Raised before any step exists; a producer never emits a partial sequence
/// and then fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Empty list, or a token that is not an integer.
    #[error("Please enter a valid array of numbers.")]
    InvalidArray,
    /// Target missing or not an integer.
    #[error("Please enter a valid target number.")]
    InvalidTarget,
    /// Window size missing, non-numeric, zero, or larger than the array.
    #[error("Please enter a valid window size.")]
    InvalidWindowSize,
    /// More values than the configured limit.
    #[error("Please enter no more than {max} numbers.")]
    TooManyValues { max: usize },
    /// A value exceeds the configured magnitude.
    #[error("Please enter numbers between -{max} and {max}.")]
    ValueOutOfRange { max: i64 },
    /// Algorithm needs ascending input.
    #[error("Please enter the array in ascending order.")]
    NotSorted,
    /// Algorithm needs non-negative input.
    #[error("Radix sort supports non-negative integers only.")]
    NegativeValue,
    /// Edge list empty or malformed.
    #[error("Please enter a valid list of edges.")]
    InvalidGraph,
    /// More nodes than the configured limit.
    #[error("Please enter no more than {max} nodes.")]
    TooManyNodes { max: usize },
    /// Start label does not name a node.
    #[error("Start node \"{label}\" is not in the graph.")]
    UnknownStartNode { label: String },
}
