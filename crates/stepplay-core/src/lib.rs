#![forbid(unsafe_code)]

//! stepplay core
//!
//! Data model for step-based algorithm playback.
//!
//! # Key Components
//!
//! - [`StepRecord`] - One atomic algorithm action ([`StepKind`] + [`Payload`] + note)
//! - [`StepSequence`] - Ordered records for one run, eager or lazy
//! - [`StepRecorder`] - Builder that enforces the start/terminal invariants
//! - [`StepProducer`] - Contract every algorithm implements
//! - [`ValidationError`] - Fixed user-facing input errors
//!
//! # Role in stepplay
//! `stepplay-core` knows nothing about time, cursors, or drawing. Producers in
//! `stepplay-algorithms` emit sequences of these records; `stepplay-runtime`
//! plays them back.

pub mod error;
pub mod input;
pub mod producer;
pub mod sequence;
pub mod step;

pub use error::ValidationError;
pub use input::{
    ArrayForm, GraphForm, Limits, ParsedGraph, SearchForm, WindowForm, parse_graph, parse_target,
    parse_values, parse_window_size,
};
pub use producer::StepProducer;
pub use sequence::{SequenceError, StepRecorder, StepSequence};
pub use step::{Payload, StepKind, StepRecord};
