#![forbid(unsafe_code)]

//! Test fixtures for stepplay.
//!
//! - [`RecordingApplier`]: records every applier call and the prefix it
//!   implies, with a configurable backward strategy.
//! - [`PlaybackFixture`]: controller on a deterministic clock.
//! - [`fingerprint`]: blake3 digest over a sequence's JSONL transcript.

pub mod fixture;
pub mod recording;
pub mod transcript;

pub use fixture::PlaybackFixture;
pub use recording::{ApplierCall, RecordingApplier};
pub use transcript::{FINGERPRINT_PREFIX, fingerprint, records_jsonl, sequence_fingerprint};
