#![forbid(unsafe_code)]

//! stepplay public facade crate.
//!
//! Re-exports the step model, the playback runtime and, with the default
//! `algorithms` feature, the bundled producers and visual models. Most hosts
//! only need the [`prelude`].

// --- Core re-exports -------------------------------------------------------

pub use stepplay_core::{
    ArrayForm, GraphForm, Limits, Payload, SearchForm, StepKind, StepProducer, StepRecord,
    StepSequence, ValidationError, WindowForm,
};

// --- Runtime re-exports ----------------------------------------------------

pub use stepplay_runtime::{
    BackwardStrategy, ConfigError, ControlOutcome, DeterministicClock, Direction,
    ManualStepPolicy, MonotonicClock, NoOpReason, PlaybackClock, PlaybackConfig,
    PlaybackController, PlaybackState, Progress, StepLog, TimerToken, VisualApplier,
};

// --- Algorithm re-exports --------------------------------------------------

#[cfg(feature = "algorithms")]
pub use stepplay_algorithms::{
    ArrayView, BinarySearch, BreadthFirstSearch, BubbleSort, DepthFirstSearch, GraphView,
    HeapSort, MergeSort, MinimumSpanningTree, RadixSort, SlidingWindow, TopologicalSort,
    TwoPointers,
};

/// Everything a typical host touches.
pub mod prelude {
    pub use crate::{
        ControlOutcome, DeterministicClock, MonotonicClock, PlaybackConfig, PlaybackController,
        PlaybackState, StepKind, StepProducer, StepRecord, VisualApplier,
    };

    #[cfg(feature = "algorithms")]
    pub use crate::{ArrayView, GraphView};

    pub use crate::{core, runtime};

    #[cfg(feature = "algorithms")]
    pub use crate::algorithms;
}

pub use stepplay_core as core;
pub use stepplay_runtime as runtime;

#[cfg(feature = "algorithms")]
pub use stepplay_algorithms as algorithms;
